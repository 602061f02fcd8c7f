pub mod config;
pub mod logging;

pub mod action;
pub mod attachment;
pub mod credentials;
pub mod debounce;
pub mod dispatch;
pub mod endpoints;
pub mod error;
pub mod fetch;
pub mod http;
pub mod locator;
pub mod normalize;

#[cfg(test)]
pub(crate) mod testing;
