//! State Management
//!
//! Signals wrapping the `foodlens` flows, plus browser session storage.

pub mod global;
pub mod storage;

pub use global::{provide_app_state, AppState, SelectedImage};
pub use storage::LocalStorageSessionStore;
