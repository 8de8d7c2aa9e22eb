//! crates/studysync_client_core/src/ports.rs
//!
//! Defines the service contracts (traits) for the client's core logic.
//! These traits form the boundary of the hexagonal architecture, allowing the
//! core workflows to be independent of the concrete HTTP transport.

use crate::domain::{CourseFields, ModuleFields};
use async_trait::async_trait;

//=========================================================================================
// Generic Port Error and Result Types
//=========================================================================================

/// A classified error for all port operations.
///
/// Every backend call fails into exactly one of these classes; the workflows
/// key their recovery behavior (resumption, rollback) off the class alone.
#[derive(Debug, thiserror::Error)]
pub enum PortError {
    /// Caller-fixable input rejection, carrying the server's field-level message.
    #[error("Validation failed: {0}")]
    Validation(String),
    /// The session is no longer valid; the caller must re-authenticate.
    #[error("Unauthorized")]
    Unauthorized,
    /// Network-level or server-side failure; a user-initiated retry is appropriate.
    #[error("Transient failure: {0}")]
    Transient(String),
}

/// A convenience type alias for `Result<T, PortError>`.
pub type PortResult<T> = Result<T, PortError>;

//=========================================================================================
// Service Ports (Traits)
//=========================================================================================

/// The catalog backend as the client sees it: each method is a single network
/// round trip that either succeeds with a result or fails with a classified
/// [`PortError`].
#[async_trait]
pub trait CatalogService: Send + Sync {
    // --- Course Authoring ---
    async fn create_course(&self, fields: &CourseFields, publish: bool) -> PortResult<i64>;

    async fn update_course(
        &self,
        course_id: i64,
        fields: &CourseFields,
        publish: bool,
    ) -> PortResult<()>;

    // --- Module Authoring ---
    async fn create_module(&self, course_id: i64, fields: &ModuleFields) -> PortResult<i64>;

    async fn update_module(
        &self,
        course_id: i64,
        module_id: i64,
        fields: &ModuleFields,
    ) -> PortResult<()>;

    async fn delete_module(&self, course_id: i64, module_id: i64) -> PortResult<()>;

    // --- File Storage ---
    /// Stores raw media bytes and returns the URL under which they are served.
    /// Callers treat the URL as an opaque field value.
    async fn store_file(&self, file_name: &str, bytes: Vec<u8>) -> PortResult<String>;

    // --- Wishlist ---
    async fn add_to_wishlist(&self, course_id: i64) -> PortResult<()>;

    async fn remove_from_wishlist(&self, course_id: i64) -> PortResult<()>;

    /// Fetches the ids of every course currently on the actor's wishlist.
    async fn get_wishlist(&self) -> PortResult<Vec<i64>>;
}
