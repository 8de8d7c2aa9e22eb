//! services/client/src/lib.rs
//!
//! The StudySync client service: a `reqwest` adapter for the catalog API plus
//! the two stateful workflows (resumable course authoring and optimistic
//! wishlist sync) that UI surfaces drive.

pub mod adapters;
pub mod config;
pub mod error;
pub mod workflow;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Sets up the global tracing subscriber from the configured level.
pub fn init_tracing(level: tracing::Level) {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(level.to_string()))
        .with(tracing_subscriber::fmt::layer())
        .init();
}
