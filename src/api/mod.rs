//! Service API
//!
//! The recognition and log-storage services are reached through the
//! [`FoodApi`] trait so the flows can be driven by the native `reqwest`
//! client, the browser client, or an in-memory double in tests.
//!
//! # Endpoints
//!
//! ```text
//! POST   /api/login            {username, password}     -> {userId} | {error}
//! POST   /api/register         {username, password}     -> {userId} | {error}
//! GET    /api/food-logs?userId                          -> [FoodLogEntry] | {error}
//! POST   /api/recognize        multipart image,userId,weight -> RecognitionResult | {error}
//! DELETE /api/food-logs/{id}?userId                     -> any | {error}
//! ```

mod error;
#[cfg(feature = "native")]
mod http;

pub use error::{ClientError, ClientResult};
#[cfg(feature = "native")]
pub use http::{HttpFoodApi, HttpFoodApiConfig};

use async_trait::async_trait;
use serde::de::DeserializeOwned;

use crate::models::{AuthGrant, Credentials, FoodLogEntry, ImageUpload, LogId, RecognitionResult};
use crate::session::Session;

/// Default service address
pub const DEFAULT_API_BASE: &str = "http://localhost:5000";

pub const LOGIN_PATH: &str = "/api/login";
pub const REGISTER_PATH: &str = "/api/register";
pub const FOOD_LOGS_PATH: &str = "/api/food-logs";
pub const RECOGNIZE_PATH: &str = "/api/recognize";

/// Contract with the external account, recognition and log-storage services
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
pub trait FoodApi {
    async fn login(&self, credentials: &Credentials) -> ClientResult<AuthGrant>;

    async fn register(&self, credentials: &Credentials) -> ClientResult<AuthGrant>;

    /// Current entries for the session's user, in service order
    async fn food_logs(&self, session: &Session) -> ClientResult<Vec<FoodLogEntry>>;

    async fn recognize(
        &self,
        session: &Session,
        image: &ImageUpload,
        weight_grams: u32,
    ) -> ClientResult<RecognitionResult>;

    async fn delete_log(&self, session: &Session, id: LogId) -> ClientResult<()>;
}

/// `GET /api/food-logs?userId=...`
pub fn food_logs_url(base: &str, session: &Session) -> String {
    format!(
        "{}{}?userId={}",
        base.trim_end_matches('/'),
        FOOD_LOGS_PATH,
        urlencoding::encode(session.id())
    )
}

/// `DELETE /api/food-logs/{id}?userId=...`
pub fn delete_log_url(base: &str, session: &Session, id: LogId) -> String {
    format!(
        "{}{}/{}?userId={}",
        base.trim_end_matches('/'),
        FOOD_LOGS_PATH,
        id,
        urlencoding::encode(session.id())
    )
}

pub fn endpoint_url(base: &str, path: &str) -> String {
    format!("{}{}", base.trim_end_matches('/'), path)
}

/// Decode a response body.
///
/// A body carrying an `error` field is an application error whatever the
/// HTTP status was.
pub fn decode_body<T: DeserializeOwned>(body: &str) -> ClientResult<T> {
    let value: serde_json::Value =
        serde_json::from_str(body).map_err(|e| ClientError::Parse(e.to_string()))?;

    if let Some(error) = value.get("error") {
        let message = match error {
            serde_json::Value::String(s) => s.clone(),
            other => other.to_string(),
        };
        return Err(ClientError::Server(message));
    }

    serde_json::from_value(value).map_err(|e| ClientError::Parse(e.to_string()))
}

/// Decode a body whose content is irrelevant beyond an `error` field
pub fn decode_ack(body: &str) -> ClientResult<()> {
    if body.trim().is_empty() {
        return Ok(());
    }
    decode_body::<serde_json::Value>(body).map(|_| ())
}

#[cfg(test)]
pub(crate) mod testing {
    //! In-memory service double recording every call.

    use super::*;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    #[derive(Debug, Clone, PartialEq)]
    pub enum Call {
        Login(String),
        Register(String),
        FoodLogs(String),
        Recognize { user: String, file: String, weight: u32 },
        Delete(String, LogId),
    }

    #[derive(Default)]
    pub struct FakeFoodApi {
        pub calls: Mutex<Vec<Call>>,
        pub auth_replies: Mutex<VecDeque<ClientResult<AuthGrant>>>,
        pub log_replies: Mutex<VecDeque<ClientResult<Vec<FoodLogEntry>>>>,
        pub recognize_replies: Mutex<VecDeque<ClientResult<RecognitionResult>>>,
        pub delete_replies: Mutex<VecDeque<ClientResult<()>>>,
    }

    impl FakeFoodApi {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn push_auth(&self, reply: ClientResult<AuthGrant>) {
            self.auth_replies.lock().unwrap().push_back(reply);
        }

        pub fn push_logs(&self, reply: ClientResult<Vec<FoodLogEntry>>) {
            self.log_replies.lock().unwrap().push_back(reply);
        }

        pub fn push_recognize(&self, reply: ClientResult<RecognitionResult>) {
            self.recognize_replies.lock().unwrap().push_back(reply);
        }

        pub fn push_delete(&self, reply: ClientResult<()>) {
            self.delete_replies.lock().unwrap().push_back(reply);
        }

        pub fn calls(&self) -> Vec<Call> {
            self.calls.lock().unwrap().clone()
        }

        pub fn count(&self, pred: impl Fn(&Call) -> bool) -> usize {
            self.calls.lock().unwrap().iter().filter(|c| pred(c)).count()
        }

        fn record(&self, call: Call) {
            self.calls.lock().unwrap().push(call);
        }

        fn next<T>(queue: &Mutex<VecDeque<ClientResult<T>>>) -> ClientResult<T> {
            queue
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(ClientError::Transport("no scripted reply".into())))
        }
    }

    #[async_trait]
    impl FoodApi for FakeFoodApi {
        async fn login(&self, credentials: &Credentials) -> ClientResult<AuthGrant> {
            self.record(Call::Login(credentials.username.clone()));
            Self::next(&self.auth_replies)
        }

        async fn register(&self, credentials: &Credentials) -> ClientResult<AuthGrant> {
            self.record(Call::Register(credentials.username.clone()));
            Self::next(&self.auth_replies)
        }

        async fn food_logs(&self, session: &Session) -> ClientResult<Vec<FoodLogEntry>> {
            self.record(Call::FoodLogs(session.id().to_string()));
            Self::next(&self.log_replies)
        }

        async fn recognize(
            &self,
            session: &Session,
            image: &ImageUpload,
            weight_grams: u32,
        ) -> ClientResult<RecognitionResult> {
            self.record(Call::Recognize {
                user: session.id().to_string(),
                file: image.file_name.clone(),
                weight: weight_grams,
            });
            Self::next(&self.recognize_replies)
        }

        async fn delete_log(&self, session: &Session, id: LogId) -> ClientResult<()> {
            self.record(Call::Delete(session.id().to_string(), id));
            Self::next(&self.delete_replies)
        }
    }
}
