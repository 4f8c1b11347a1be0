//! Client Flows
//!
//! Sans-IO state machines behind the two views:
//!
//! - **auth**: login/register toggle, validation, busy guard
//! - **recognition**: image submission, transient banners, result card
//! - **logs**: log-list synchronizer with filtering, sequence-numbered
//!   refreshes, local reordering and removal
//!
//! Each flow splits a request into `begin` (validate, mark busy, build the
//! request) and `finish`/`complete` (apply the response). The browser front-end
//! calls these around its own `spawn_local` tasks; the async helpers in each
//! module drive a whole round trip against a [`FoodApi`](crate::api::FoodApi).

pub mod auth;
pub mod logs;
pub mod recognition;

pub use auth::{AuthForm, AuthMode, AuthRequest};
pub use logs::{LogListSync, RefreshOutcome, RefreshTicket, SyncStatus};
pub use recognition::{Banner, BannerKind, RecognitionFlow, RecognitionOutcome, RecognitionRequest};

use thiserror::Error;

/// Local rejection of a user action; no request was issued
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FlowError {
    /// A request of the same kind is still in flight
    #[error("A request is already in flight")]
    Busy,

    /// Input failed local validation; the message is already on screen
    #[error("{0}")]
    Invalid(String),
}
