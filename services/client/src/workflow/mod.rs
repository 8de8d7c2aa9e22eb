pub mod authoring;
pub mod state;
pub mod wishlist;

// Re-export the two workflow entry points to make them easily accessible
// to the UI layer that drives them.
pub use authoring::{AuthoringError, AuthoringOrchestrator};
pub use state::ClientState;
pub use wishlist::{PendingDelta, WishlistCache, WishlistSynchronizer};
