// file: src/registry/mod.rs
// description: client-held, server-synchronized entity registries
// reference: internal module structure

pub mod documents;
pub mod models;

pub use documents::DocumentRegistry;
pub use models::ModelRegistry;

use std::collections::HashSet;
use tracing::warn;

/// Keeps the first entry for every key so identities stay unique even if
/// the backend repeats one.
pub(crate) fn dedupe_by_key<T, F>(entries: Vec<T>, kind: &str, key: F) -> Vec<T>
where
    F: Fn(&T) -> String,
{
    let mut seen = HashSet::with_capacity(entries.len());
    entries
        .into_iter()
        .filter(|entry| {
            let id = key(entry);
            let fresh = seen.insert(id.clone());
            if !fresh {
                warn!("Backend listed {} {} more than once; keeping the first", kind, id);
            }
            fresh
        })
        .collect()
}
