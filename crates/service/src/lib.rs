//! Service layer for the dashboard API.
//! - `storage`: the document-store abstraction and its backends.
//! - `directory` / `timeline`: the two request-facing services.
//! - `seed`: mock data loader used by the `seed` binary.

pub mod directory;
pub mod errors;
pub mod seed;
pub mod storage;
#[cfg(test)]
pub mod test_support;
pub mod timeline;

pub use directory::DirectoryService;
pub use errors::ServiceError;
pub use timeline::TimelineService;
