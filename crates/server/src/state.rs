use std::sync::Arc;

use configs::StorageConfig;
use service::{storage::DocumentStore, DirectoryService, TimelineService};

/// Shared router state; cheap to clone.
#[derive(Clone)]
pub struct AppState {
    pub directory: Arc<DirectoryService>,
    pub timeline: Arc<TimelineService>,
}

impl AppState {
    pub fn new(store: Arc<dyn DocumentStore>, storage: &StorageConfig) -> Self {
        Self {
            directory: Arc::new(DirectoryService::new(Arc::clone(&store), storage.students_collection.clone())),
            timeline: Arc::new(TimelineService::new(store, storage.interactions_collection.clone())),
        }
    }
}
