//! Server application state.

use crate::messages::Catalog;
use storage::{DocumentStore, MetaCreator};

/// Shared state handed to every request handler.
pub struct AppState {
    pub store: DocumentStore,
    pub meta_creator: MetaCreator,
    pub catalog: Catalog,
    pub ui_language: String,
    pub max_file_size: usize,
    pub max_meta_size: usize,
}

impl AppState {
    pub fn new(
        store: DocumentStore,
        meta_creator: MetaCreator,
        catalog: Catalog,
        ui_language: String,
        max_file_size: usize,
        max_meta_size: usize,
    ) -> Self {
        Self {
            store,
            meta_creator,
            catalog,
            ui_language,
            max_file_size,
            max_meta_size,
        }
    }
}
