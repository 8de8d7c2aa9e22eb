//! services/client/src/workflow/state.rs
//!
//! Defines the client's shared state, created once at startup and handed to
//! every UI surface.

use crate::config::Config;
use crate::workflow::{AuthoringOrchestrator, WishlistSynchronizer};
use std::sync::Arc;
use studysync_client_core::ports::CatalogService;

/// The shared client state: the catalog port plus the two stateful workflows
/// built on top of it. Cloning is cheap; every clone shares the same
/// wishlist cache.
#[derive(Clone)]
pub struct ClientState {
    pub catalog: Arc<dyn CatalogService>,
    pub config: Arc<Config>,
    pub authoring: AuthoringOrchestrator,
    pub wishlist: WishlistSynchronizer,
}

impl ClientState {
    pub fn new(catalog: Arc<dyn CatalogService>, config: Arc<Config>) -> Self {
        Self {
            authoring: AuthoringOrchestrator::new(catalog.clone()),
            wishlist: WishlistSynchronizer::new(catalog.clone()),
            catalog,
            config,
        }
    }
}
