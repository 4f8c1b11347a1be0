//! Auth Flow
//!
//! Credentials form with a login/register toggle.

use crate::api::{ClientError, ClientResult, FoodApi, LOGIN_PATH, REGISTER_PATH};
use crate::models::{AuthGrant, Credentials};
use crate::session::{Session, SessionStore};

use super::FlowError;

pub const MISSING_CREDENTIALS: &str = "Enter your credentials, explorer!";
pub const TRANSPORT_FAILURE: &str = "Cosmic error detected!";
pub const BUSY_LABEL: &str = "Launching...";

/// Which endpoint the form submits to
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AuthMode {
    #[default]
    Login,
    Register,
}

impl AuthMode {
    pub fn toggled(self) -> Self {
        match self {
            AuthMode::Login => AuthMode::Register,
            AuthMode::Register => AuthMode::Login,
        }
    }

    pub fn endpoint(self) -> &'static str {
        match self {
            AuthMode::Login => LOGIN_PATH,
            AuthMode::Register => REGISTER_PATH,
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            AuthMode::Login => "Enter the Verse",
            AuthMode::Register => "Forge Your Path",
        }
    }

    pub fn button_label(self) -> &'static str {
        match self {
            AuthMode::Login => "Launch",
            AuthMode::Register => "Forge",
        }
    }

    /// Text in front of the toggle link
    pub fn toggle_prompt(self) -> &'static str {
        match self {
            AuthMode::Login => "New Explorer?",
            AuthMode::Register => "Returning?",
        }
    }

    /// Label of the toggle link: the title of the other mode
    pub fn toggle_link(self) -> &'static str {
        self.toggled().title()
    }
}

/// A validated submission
#[derive(Debug, Clone, PartialEq)]
pub struct AuthRequest {
    pub mode: AuthMode,
    pub credentials: Credentials,
}

/// State of the auth form
#[derive(Debug, Clone, Default)]
pub struct AuthForm {
    mode: AuthMode,
    busy: bool,
    error: Option<String>,
}

impl AuthForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode(&self) -> AuthMode {
        self.mode
    }

    pub fn is_busy(&self) -> bool {
        self.busy
    }

    /// Inline error text, if any
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn title(&self) -> &'static str {
        self.mode.title()
    }

    pub fn button_label(&self) -> &'static str {
        if self.busy {
            BUSY_LABEL
        } else {
            self.mode.button_label()
        }
    }

    /// Flip between login and register and clear any prior error
    pub fn toggle(&mut self) {
        self.mode = self.mode.toggled();
        self.error = None;
    }

    /// Validate the fields and mark the form busy.
    ///
    /// Both fields must be non-empty after trimming.
    pub fn begin(&mut self, username: &str, password: &str) -> Result<AuthRequest, FlowError> {
        if self.busy {
            return Err(FlowError::Busy);
        }

        let username = username.trim();
        let password = password.trim();
        if username.is_empty() || password.is_empty() {
            self.error = Some(MISSING_CREDENTIALS.to_string());
            return Err(FlowError::Invalid(MISSING_CREDENTIALS.to_string()));
        }

        self.busy = true;
        Ok(AuthRequest {
            mode: self.mode,
            credentials: Credentials {
                username: username.to_string(),
                password: password.to_string(),
            },
        })
    }

    /// Apply the service response. Returns the new session on success.
    pub fn finish(&mut self, result: ClientResult<AuthGrant>) -> Option<Session> {
        self.busy = false;

        match result {
            Ok(grant) => match Session::new(grant.user_id) {
                Some(session) => {
                    self.error = None;
                    tracing::info!(mode = ?self.mode, "Authenticated");
                    Some(session)
                }
                None => {
                    self.error = Some(TRANSPORT_FAILURE.to_string());
                    None
                }
            },
            Err(ClientError::Server(message)) => {
                tracing::info!(mode = ?self.mode, %message, "Auth rejected");
                self.error = Some(message);
                None
            }
            Err(e) => {
                tracing::error!(mode = ?self.mode, error = %e, "Auth request failed");
                self.error = Some(TRANSPORT_FAILURE.to_string());
                None
            }
        }
    }
}

/// Send a validated request to the endpoint its mode selects
pub async fn send<A>(api: &A, request: &AuthRequest) -> ClientResult<AuthGrant>
where
    A: FoodApi + ?Sized,
{
    match request.mode {
        AuthMode::Login => api.login(&request.credentials).await,
        AuthMode::Register => api.register(&request.credentials).await,
    }
}

/// Full round trip: validate, call the service, persist the session.
///
/// Rejections and failures leave their message in [`AuthForm::error`].
pub async fn authenticate<A>(
    form: &mut AuthForm,
    api: &A,
    store: &dyn SessionStore,
    username: &str,
    password: &str,
) -> Result<Option<Session>, FlowError>
where
    A: FoodApi + ?Sized,
{
    let request = form.begin(username, password)?;
    let result = send(api, &request).await;

    let Some(session) = form.finish(result) else {
        return Ok(None);
    };

    if let Err(e) = store.save(&session) {
        tracing::error!(error = %e, "Failed to persist session");
        form.error = Some(TRANSPORT_FAILURE.to_string());
        return Ok(None);
    }

    Ok(Some(session))
}
