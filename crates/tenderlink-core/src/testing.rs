//! Test doubles: a scripted transport and a recording browser.

use std::collections::HashMap;
use std::io;
use std::sync::Mutex;

use crate::action::ViewScope;
use crate::dispatch::{BrowserContext, OpenRequest, SaveRequest};
use crate::endpoints::Endpoints;
use crate::error::DispatchError;
use crate::http::{HttpResponse, Request, Transport, TransportError};

pub(crate) fn endpoints() -> Endpoints {
    Endpoints::new(
        "http://portal.test/api",
        "http://portal.test/api/admin",
        "http://files.test",
        "http://portal.test/login",
    )
    .unwrap()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum Method {
    Head,
    Get,
}

#[derive(Debug, Clone)]
enum Reply {
    Status(u32, Vec<u8>),
    Unreachable,
}

/// Answers from a fixed route table; unknown routes get 404. Records every call.
#[derive(Debug, Default)]
pub(crate) struct FakeTransport {
    routes: HashMap<(Method, String), Reply>,
    calls: Mutex<Vec<(Method, Request)>>,
    unmount_after: Option<(ViewScope, usize)>,
}

impl FakeTransport {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn status(self, method: Method, url: &str, status: u32) -> Self {
        self.body(method, url, status, "")
    }

    pub(crate) fn body(mut self, method: Method, url: &str, status: u32, body: &str) -> Self {
        self.routes.insert(
            (method, url.to_string()),
            Reply::Status(status, body.as_bytes().to_vec()),
        );
        self
    }

    pub(crate) fn unreachable(mut self, method: Method, url: &str) -> Self {
        self.routes.insert((method, url.to_string()), Reply::Unreachable);
        self
    }

    /// Unmounts `scope` once `calls` requests have been answered.
    pub(crate) fn unmount_after(mut self, scope: &ViewScope, calls: usize) -> Self {
        self.unmount_after = Some((scope.clone(), calls));
        self
    }

    pub(crate) fn calls(&self) -> Vec<(Method, String)> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .map(|(m, r)| (*m, r.url.clone()))
            .collect()
    }

    pub(crate) fn urls(&self) -> Vec<String> {
        self.calls().into_iter().map(|(_, u)| u).collect()
    }

    pub(crate) fn bearers(&self) -> Vec<Option<String>> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .map(|(_, r)| r.bearer.clone())
            .collect()
    }

    fn answer(&self, method: Method, req: &Request) -> Result<HttpResponse, TransportError> {
        let answered = {
            let mut calls = self.calls.lock().unwrap();
            calls.push((method, req.clone()));
            calls.len()
        };
        if let Some((scope, after)) = &self.unmount_after {
            if answered >= *after {
                scope.unmount();
            }
        }
        match self.routes.get(&(method, req.url.clone())) {
            Some(Reply::Status(status, body)) => Ok(HttpResponse {
                status: *status,
                body: body.clone(),
            }),
            Some(Reply::Unreachable) => Err(TransportError::Io(io::Error::new(
                io::ErrorKind::ConnectionRefused,
                "connection refused",
            ))),
            None => Ok(HttpResponse {
                status: 404,
                body: Vec::new(),
            }),
        }
    }
}

impl Transport for FakeTransport {
    async fn head(&self, req: &Request) -> Result<u32, TransportError> {
        self.answer(Method::Head, req).map(|r| r.status)
    }

    async fn get(&self, req: &Request) -> Result<HttpResponse, TransportError> {
        self.answer(Method::Get, req)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum BrowserEvent {
    Open(OpenRequest),
    Save(SaveRequest),
    Alert(String),
}

#[derive(Debug, Default)]
pub(crate) struct RecordingBrowser {
    events: Mutex<Vec<BrowserEvent>>,
}

impl RecordingBrowser {
    pub(crate) fn events(&self) -> Vec<BrowserEvent> {
        self.events.lock().unwrap().clone()
    }
}

impl BrowserContext for RecordingBrowser {
    fn open_in_browsing_context(&self, req: OpenRequest) -> Result<(), DispatchError> {
        self.events.lock().unwrap().push(BrowserEvent::Open(req));
        Ok(())
    }

    async fn trigger_save(&self, req: SaveRequest) -> Result<(), DispatchError> {
        self.events.lock().unwrap().push(BrowserEvent::Save(req));
        Ok(())
    }

    fn alert(&self, message: &str) {
        self.events
            .lock()
            .unwrap()
            .push(BrowserEvent::Alert(message.to_string()));
    }
}
