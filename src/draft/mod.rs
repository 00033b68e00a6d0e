//! Draft persistence: local storage boundary, snapshot shape, autosave

pub mod autosave;
pub mod snapshot;
pub mod store;

pub use autosave::{AutosaveController, AutosaveSettings};
pub use snapshot::{DraftSnapshot, SavedDraft, DEFAULT_DRAFT_KEY};
pub use store::{DisabledDraftStore, DraftError, DraftStore, FileDraftStore, MemoryDraftStore};
