//! Attachment descriptor resolution.
//!
//! Turns a heterogeneous attachment record into two independent names: the
//! storage name to request from the file store, and the display name to show
//! the user and suggest when saving. The two are never conflated: an
//! original name is only used for storage when nothing else exists.

mod descriptor;
mod generated;
mod path;

pub use descriptor::{AttachmentDescriptor, NestedFile};
pub use generated::{looks_server_generated, KNOWN_EXTENSIONS};
pub use path::basename;

use serde::Serialize;

/// Names derived from one descriptor. An empty `storage_name` means the
/// attachment cannot be retrieved.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ResolvedAttachment {
    pub storage_name: String,
    pub display_name: String,
}

impl ResolvedAttachment {
    pub fn is_retrievable(&self) -> bool {
        !self.storage_name.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum NameOrigin {
    Stored,
    Original,
}

/// Name-like values in priority order, tagged with where they came from.
fn name_candidates(d: &AttachmentDescriptor) -> Vec<(NameOrigin, String)> {
    let nested = d.data.as_ref();
    let stored = [
        nested.and_then(|n| n.filename.clone()),
        nested.and_then(|n| n.file.clone()),
        d.filename.clone(),
        d.file.clone(),
        d.saved_as.clone(),
        d.generated_name.clone(),
        d.path.as_deref().and_then(basename),
        d.relative_path.as_deref().and_then(basename),
        d.url.as_deref().and_then(basename),
    ];
    let original = [
        nested.and_then(|n| n.original_name.clone()),
        d.name.clone(),
        d.original_name.clone(),
        d.original_name_snake.clone(),
    ];

    stored
        .into_iter()
        .flatten()
        .map(|s| (NameOrigin::Stored, s))
        .chain(original.into_iter().flatten().map(|s| (NameOrigin::Original, s)))
        .filter(|(_, s)| !s.trim().is_empty())
        .collect()
}

/// Resolves storage and display names. Never fails.
pub fn resolve(descriptor: &AttachmentDescriptor) -> ResolvedAttachment {
    let candidates = name_candidates(descriptor);

    let storage_name = candidates
        .iter()
        .find(|(_, name)| looks_server_generated(name))
        .or_else(|| candidates.first())
        .map(|(_, name)| name.clone())
        .unwrap_or_default();

    let display_name = candidates
        .iter()
        .find(|(origin, _)| *origin == NameOrigin::Original)
        .map(|(_, name)| name.clone())
        .unwrap_or_else(|| storage_name.clone());

    ResolvedAttachment {
        storage_name,
        display_name,
    }
}
