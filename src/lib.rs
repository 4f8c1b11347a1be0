//! # FoodLens
//!
//! Client core for a food-image recognition and nutrition-logging service:
//! snap a meal, get the dish and its nutrition facts, keep a searchable log.
//!
//! ## Features
//!
//! - **Typed service contract**: [`FoodApi`] over the auth, recognition and
//!   log-storage endpoints, with a `reqwest` client on native targets
//! - **Log synchronization**: sequence-numbered refreshes, client-side
//!   search and weight filtering, local drag reordering
//! - **Explicit sessions**: a [`Session`] value plus a router [`guard`]
//!   instead of ambient global state
//!
//! ## Modules
//!
//! - [`models`]: wire types and display helpers
//! - [`filter`]: search/weight predicate
//! - [`session`]: session value, stores and routing guard
//! - [`api`]: service trait, error taxonomy, HTTP client
//! - [`flows`]: auth, recognition and log-list state machines
//! - [`dashboard`]: the flows composed for one signed-in user
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use foodlens::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let api = HttpFoodApi::new(HttpFoodApiConfig::default())?;
//!     let store = MemorySessionStore::new();
//!
//!     let mut form = AuthForm::new();
//!     let session = flows::auth::authenticate(&mut form, &api, &store, "ada", "hunter2")
//!         .await?
//!         .ok_or("login failed")?;
//!
//!     let mut dashboard = Dashboard::new(session);
//!     dashboard.search(&api, "pizza").await;
//!     for entry in dashboard.logs().visible() {
//!         println!("{} - {}", entry.display_name(), entry.nutrition);
//!     }
//!
//!     Ok(())
//! }
//! ```

pub mod api;
#[cfg(feature = "native")]
pub mod config;
pub mod dashboard;
pub mod filter;
pub mod flows;
pub mod models;
pub mod session;

// Re-export top-level types for convenience
pub use api::{ClientError, ClientResult, FoodApi, DEFAULT_API_BASE};
#[cfg(feature = "native")]
pub use api::{HttpFoodApi, HttpFoodApiConfig};

pub use dashboard::Dashboard;

pub use filter::{FilterState, WeightFilter, DEFAULT_WEIGHT, WEIGHT_OPTIONS};

pub use flows::{
    AuthForm, AuthMode, AuthRequest, Banner, BannerKind, FlowError, LogListSync,
    RecognitionFlow, RecognitionOutcome, RecognitionRequest, RefreshOutcome, RefreshTicket,
    SyncStatus,
};

pub use models::{
    AuthGrant, Credentials, FoodLogEntry, ImageUpload, LogId, Nutrition, RecognitionResult,
};

pub use session::{guard, MemorySessionStore, Route, Session, SessionError, SessionStore};
#[cfg(feature = "native")]
pub use session::FileSessionStore;

#[cfg(feature = "native")]
pub use config::{Config, ConfigError};
