//! HTTP API Client
//!
//! [`FoodApi`] over `gloo-net` fetch requests.

use std::cell::Cell;
use std::rc::Rc;

use async_trait::async_trait;
use gloo_net::http::{Request, RequestBuilder};
use gloo_timers::callback::Timeout;
use wasm_bindgen::JsValue;

use foodlens::api::{
    decode_ack, decode_body, delete_log_url, endpoint_url, food_logs_url, LOGIN_PATH,
    RECOGNIZE_PATH, REGISTER_PATH,
};
use foodlens::{
    AuthGrant, ClientError, ClientResult, Credentials, FoodApi, FoodLogEntry, ImageUpload,
    LogId, RecognitionResult, Session, DEFAULT_API_BASE,
};

const API_URL_KEY: &str = "foodlens_api_url";

/// Requests slower than this are aborted
pub const REQUEST_TIMEOUT_MS: u32 = 30_000;

/// Get the API base URL from local storage or use default
pub fn get_api_base() -> String {
    let url = web_sys::window()
        .and_then(|window| window.local_storage().ok().flatten())
        .and_then(|storage| storage.get_item(API_URL_KEY).ok().flatten())
        .filter(|url| !url.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_API_BASE.to_string());
    // Normalize: remove trailing slash
    url.trim_end_matches('/').to_string()
}

/// Set the API base URL in local storage
pub fn set_api_base(url: &str) {
    if let Some(window) = web_sys::window() {
        if let Ok(Some(storage)) = window.local_storage() {
            let _ = storage.set_item(API_URL_KEY, url);
        }
    }
}

/// Fetch-based client; reads the base URL once at construction
#[derive(Debug, Clone)]
pub struct GlooFoodApi {
    base: String,
    timeout_ms: u32,
}

impl Default for GlooFoodApi {
    fn default() -> Self {
        Self::new(get_api_base())
    }
}

impl GlooFoodApi {
    pub fn new(base: impl Into<String>) -> Self {
        Self {
            base: base.into().trim_end_matches('/').to_string(),
            timeout_ms: REQUEST_TIMEOUT_MS,
        }
    }

    async fn post_credentials(
        &self,
        path: &str,
        credentials: &Credentials,
    ) -> ClientResult<AuthGrant> {
        let deadline = Deadline::new(self.timeout_ms);
        let request = deadline
            .attach(Request::post(&endpoint_url(&self.base, path)))
            .json(credentials)
            .map_err(|e| ClientError::Transport(e.to_string()))?;

        let body = deadline.text(request.send().await).await?;
        decode_body(&body)
    }
}

#[async_trait(?Send)]
impl FoodApi for GlooFoodApi {
    async fn login(&self, credentials: &Credentials) -> ClientResult<AuthGrant> {
        self.post_credentials(LOGIN_PATH, credentials).await
    }

    async fn register(&self, credentials: &Credentials) -> ClientResult<AuthGrant> {
        self.post_credentials(REGISTER_PATH, credentials).await
    }

    async fn food_logs(&self, session: &Session) -> ClientResult<Vec<FoodLogEntry>> {
        let deadline = Deadline::new(self.timeout_ms);
        let response = deadline
            .attach(Request::get(&food_logs_url(&self.base, session)))
            .send()
            .await;

        let body = deadline.text(response).await?;
        decode_body(&body)
    }

    async fn recognize(
        &self,
        session: &Session,
        image: &ImageUpload,
        weight_grams: u32,
    ) -> ClientResult<RecognitionResult> {
        let form = multipart(session, image, weight_grams).map_err(js_error)?;

        let deadline = Deadline::new(self.timeout_ms);
        let request = deadline
            .attach(Request::post(&endpoint_url(&self.base, RECOGNIZE_PATH)))
            .body(form)
            .map_err(|e| ClientError::Transport(e.to_string()))?;

        let body = deadline.text(request.send().await).await?;
        decode_body(&body)
    }

    async fn delete_log(&self, session: &Session, id: LogId) -> ClientResult<()> {
        let deadline = Deadline::new(self.timeout_ms);
        let response = deadline
            .attach(Request::delete(&delete_log_url(&self.base, session, id)))
            .send()
            .await;

        let body = deadline.text(response).await?;
        decode_ack(&body)
    }
}

/// `image`, `userId` and `weight` parts; the browser sets the boundary
fn multipart(
    session: &Session,
    image: &ImageUpload,
    weight_grams: u32,
) -> Result<web_sys::FormData, JsValue> {
    let bytes = js_sys::Uint8Array::from(image.bytes.as_slice());
    let parts = js_sys::Array::of1(&bytes);

    let options = web_sys::BlobPropertyBag::new();
    options.set_type(&image.mime_type);
    let blob = web_sys::Blob::new_with_u8_array_sequence_and_options(&parts, &options)?;

    let form = web_sys::FormData::new()?;
    form.append_with_blob_and_filename("image", &blob, &image.file_name)?;
    form.append_with_str("userId", session.id())?;
    form.append_with_str("weight", &weight_grams.to_string())?;
    Ok(form)
}

fn js_error(value: JsValue) -> ClientError {
    ClientError::Transport(value.as_string().unwrap_or_else(|| format!("{:?}", value)))
}

/// Aborts the attached fetch when the timer fires. Dropping it cancels the
/// timer.
struct Deadline {
    controller: Option<web_sys::AbortController>,
    expired: Rc<Cell<bool>>,
    _timer: Option<Timeout>,
}

impl Deadline {
    fn new(timeout_ms: u32) -> Self {
        let expired = Rc::new(Cell::new(false));
        let controller = web_sys::AbortController::new().ok();

        let timer = controller.clone().map(|controller| {
            let expired = expired.clone();
            Timeout::new(timeout_ms, move || {
                expired.set(true);
                controller.abort();
            })
        });

        Self {
            controller,
            expired,
            _timer: timer,
        }
    }

    fn attach(&self, builder: RequestBuilder) -> RequestBuilder {
        match &self.controller {
            Some(controller) => builder.abort_signal(Some(&controller.signal())),
            None => builder,
        }
    }

    /// Read the body regardless of status; the `error` field decides
    async fn text(
        &self,
        response: Result<gloo_net::http::Response, gloo_net::Error>,
    ) -> ClientResult<String> {
        let response = response.map_err(|e| self.failure(e))?;
        let status = response.status();
        let ok = response.ok();
        let body = response.text().await.map_err(|e| self.failure(e))?;

        // An error status without a JSON body is a transport failure
        if !ok && serde_json::from_str::<serde_json::Value>(&body).is_err() {
            return Err(ClientError::Transport(format!("HTTP {}", status)));
        }
        Ok(body)
    }

    fn failure(&self, error: gloo_net::Error) -> ClientError {
        if self.expired.get() {
            ClientError::Timeout
        } else {
            ClientError::Transport(error.to_string())
        }
    }
}
