//! services/client/src/workflow/authoring.rs
//!
//! The resumable authoring workflow: persists an `AuthoringSession` to the
//! server with at-most-once creation per entity, even across user-initiated
//! retries after a partial failure.

use std::sync::Arc;
use studysync_client_core::domain::{AuthoringSession, MediaRef, ModuleFields};
use studysync_client_core::ports::{CatalogService, PortError};
use tracing::{info, warn};
use uuid::Uuid;

/// A typed commit failure identifying the phase that failed and, for the
/// module phase, which module.
#[derive(Debug, thiserror::Error)]
pub enum AuthoringError {
    /// The course create/update call failed; no module was attempted.
    #[error("failed to save course details: {source}")]
    Course {
        #[source]
        source: PortError,
    },

    /// A module create/update call failed. Modules before `index` keep their
    /// committed state, so a later commit resumes from this one.
    #[error("failed to save module {index}: {source}")]
    Module {
        index: usize,
        local_key: Uuid,
        #[source]
        source: PortError,
    },

    /// Deleting an already-persisted module failed; the draft stays in the list.
    #[error("failed to delete module: {source}")]
    Delete {
        local_key: Uuid,
        #[source]
        source: PortError,
    },

    /// A media upload failed before any session field was touched.
    #[error("failed to upload media: {source}")]
    Upload {
        #[source]
        source: PortError,
    },
}

/// Drives the course-then-modules save sequence, consulting the session's
/// step ledger to skip everything already committed.
///
/// There is no automatic retry anywhere in here: a failure is surfaced to the
/// caller, who re-invokes [`commit`](AuthoringOrchestrator::commit) when the
/// user asks for it. Idempotent resumption, not blind retry, is the contract.
#[derive(Clone)]
pub struct AuthoringOrchestrator {
    catalog: Arc<dyn CatalogService>,
}

impl AuthoringOrchestrator {
    pub fn new(catalog: Arc<dyn CatalogService>) -> Self {
        Self { catalog }
    }

    /// Persists the whole session and returns the course's server id.
    ///
    /// The session is borrowed exclusively for the full call, so a second
    /// commit of the same session cannot start while one is in flight. The
    /// ledger is mutated after every successful step, never batched, so a
    /// failure at module `k + 1` preserves the committed state of modules
    /// `1..k` for the next call.
    pub async fn commit(
        &self,
        session: &mut AuthoringSession,
        publish: bool,
    ) -> Result<i64, AuthoringError> {
        // Course phase: create exactly once, update unconditionally thereafter.
        // Re-sending identical fields on a retry is harmless.
        let course_id = match session.ledger().course_id() {
            None => {
                let id = self
                    .catalog
                    .create_course(&session.course_fields, publish)
                    .await
                    .map_err(|source| AuthoringError::Course { source })?;
                session.ledger_mut().record_course_created(id);
                info!(course_id = id, "course created");
                id
            }
            Some(id) => {
                self.catalog
                    .update_course(id, &session.course_fields, publish)
                    .await
                    .map_err(|source| AuthoringError::Course { source })?;
                id
            }
        };

        // Module phase, strictly in authored order. The snapshot taken here is
        // of fields only; persistence state is read from the live ledger.
        let plan: Vec<(Uuid, ModuleFields)> = session
            .modules()
            .iter()
            .map(|draft| (draft.local_key, draft.fields.clone()))
            .collect();

        for (index, (local_key, fields)) in plan.into_iter().enumerate() {
            if session.ledger().is_persisted(local_key) {
                continue;
            }
            match session.ledger().remote_id(local_key) {
                None => {
                    let remote_id = self
                        .catalog
                        .create_module(course_id, &fields)
                        .await
                        .map_err(|source| AuthoringError::Module {
                            index,
                            local_key,
                            source,
                        })?;
                    session
                        .ledger_mut()
                        .record_module_persisted(local_key, remote_id);
                }
                Some(remote_id) => {
                    // Created earlier, edited since: re-send as an update.
                    self.catalog
                        .update_module(course_id, remote_id, &fields)
                        .await
                        .map_err(|source| AuthoringError::Module {
                            index,
                            local_key,
                            source,
                        })?;
                    session
                        .ledger_mut()
                        .record_module_persisted(local_key, remote_id);
                }
            }
        }

        info!(
            course_id,
            modules = session.modules().len(),
            "authoring session committed"
        );
        Ok(course_id)
    }

    /// Removes a module from the session.
    ///
    /// A module that has reached the server is deleted there immediately, not
    /// deferred to the next commit; the draft only leaves the local list once
    /// the delete has succeeded. A never-persisted module is a pure local
    /// removal with no network call.
    pub async fn remove_module(
        &self,
        session: &mut AuthoringSession,
        local_key: Uuid,
    ) -> Result<(), AuthoringError> {
        if let (Some(course_id), Some(remote_id)) = (
            session.ledger().course_id(),
            session.ledger().remote_id(local_key),
        ) {
            self.catalog
                .delete_module(course_id, remote_id)
                .await
                .map_err(|source| AuthoringError::Delete { local_key, source })?;
        }
        if session.remove_module_local(local_key).is_none() {
            warn!(%local_key, "remove requested for a module not in the session");
        }
        Ok(())
    }

    /// Stores raw media bytes and returns the reference to place in a course
    /// or module field. The returned URL is opaque to the workflow.
    pub async fn upload_media(
        &self,
        file_name: &str,
        bytes: Vec<u8>,
    ) -> Result<MediaRef, AuthoringError> {
        let url = self
            .catalog
            .store_file(file_name, bytes)
            .await
            .map_err(|source| AuthoringError::Upload { source })?;
        Ok(MediaRef::Uploaded(url))
    }
}
