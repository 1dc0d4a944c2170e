//! Production implementations of the collaborator traits.

pub mod auth_flow;
pub mod frontend;
pub mod helix;
pub mod store;

pub use auth_flow::CallbackAuthFlow;
pub use frontend::{FrontendBridge, OpenPages};
pub use helix::HelixSource;
pub use store::{DbCredentialStore, DbPreferenceStore};
