//! Global Application State
//!
//! Reactive state using Leptos signals. Every request follows the same
//! shape: `begin` on the flow inside a signal update, await the
//! [`GlooFoodApi`] call in `spawn_local`, then `finish`/`complete` inside a
//! second update. Completions therefore never hold a borrow across an await.

use leptos::*;

use foodlens::flows::auth;
use foodlens::{
    AuthForm, FoodApi, ImageUpload, LogId, LogListSync, RecognitionFlow, RefreshOutcome,
    RefreshTicket, Session, SessionStore, WeightFilter, DEFAULT_WEIGHT,
};

use crate::api::GlooFoodApi;
use crate::state::storage::LocalStorageSessionStore;

/// Global application state provided to all components
#[derive(Clone, Copy)]
pub struct AppState {
    /// Signed-in user, `None` on the auth view
    pub session: RwSignal<Option<Session>>,
    pub auth: RwSignal<AuthForm>,
    pub logs: RwSignal<LogListSync>,
    pub recognition: RwSignal<RecognitionFlow>,
    /// Portion weight sent with the next analysis
    pub weight_grams: RwSignal<u32>,
    pub selected_image: RwSignal<Option<SelectedImage>>,
    /// Error message for the toast
    pub error: RwSignal<Option<String>>,
}

/// Image picked in the file input, with its preview URL
#[derive(Clone, Debug, PartialEq)]
pub struct SelectedImage {
    pub upload: ImageUpload,
    pub preview_url: String,
}

/// Provide global state to the component tree
pub fn provide_app_state() {
    let session = match LocalStorageSessionStore.load() {
        Ok(session) => session,
        Err(e) => {
            web_sys::console::error_1(&format!("Failed to read session: {}", e).into());
            None
        }
    };

    provide_context(AppState::new(session));
}

impl AppState {
    pub fn new(session: Option<Session>) -> Self {
        Self {
            session: create_rw_signal(session),
            auth: create_rw_signal(AuthForm::new()),
            logs: create_rw_signal(LogListSync::new()),
            recognition: create_rw_signal(RecognitionFlow::new()),
            weight_grams: create_rw_signal(DEFAULT_WEIGHT),
            selected_image: create_rw_signal(None),
            error: create_rw_signal(None),
        }
    }

    /// Submit the auth form in its current mode
    pub fn submit_auth(&self, username: String, password: String) {
        let begun = self.auth.try_update(|form| form.begin(&username, &password));
        let Some(Ok(request)) = begun else {
            return;
        };

        let state = *self;
        spawn_local(async move {
            let result = auth::send(&GlooFoodApi::default(), &request).await;
            if let Some(session) = state.auth.try_update(|form| form.finish(result)).flatten() {
                state.sign_in(session);
            }
        });
    }

    fn sign_in(&self, session: Session) {
        if let Err(e) = LocalStorageSessionStore.save(&session) {
            self.show_error(&e.to_string());
        }
        self.reset_dashboard();
        self.session.set(Some(session));
    }

    pub fn sign_out(&self) {
        if let Err(e) = LocalStorageSessionStore.clear() {
            web_sys::console::error_1(&format!("Failed to clear session: {}", e).into());
        }
        self.reset_dashboard();
        self.auth.set(AuthForm::new());
        self.session.set(None);
    }

    fn reset_dashboard(&self) {
        self.logs.set(LogListSync::new());
        self.recognition.set(RecognitionFlow::new());
        self.selected_image.set(None);
        self.weight_grams.set(DEFAULT_WEIGHT);
    }

    /// Fetch the full log set. A newer refresh makes this one stale.
    pub fn refresh_logs(&self) {
        // No session, no request: leave the list untouched
        let Some(session) = self.session.get_untracked() else {
            return;
        };
        let Some(ticket) = self.logs.try_update(|sync| sync.begin_refresh()) else {
            return;
        };
        self.complete_refresh(session, ticket);
    }

    pub fn retry_logs(&self) {
        let Some(session) = self.session.get_untracked() else {
            return;
        };
        let Some(ticket) = self.logs.try_update(|sync| sync.retry()) else {
            return;
        };
        self.complete_refresh(session, ticket);
    }

    fn complete_refresh(&self, session: Session, ticket: RefreshTicket) {
        let logs = self.logs;
        spawn_local(async move {
            let result = GlooFoodApi::default().food_logs(&session).await;
            logs.update(|sync| {
                if let RefreshOutcome::Failed { message } = sync.complete_refresh(ticket, result) {
                    web_sys::console::error_1(&format!("Error loading logs: {}", message).into());
                }
            });
        });
    }

    pub fn set_search(&self, text: String) {
        if self.logs.try_update(|sync| sync.set_search(text)) == Some(true) {
            self.refresh_logs();
        }
    }

    pub fn set_weight_filter(&self, weight_filter: WeightFilter) {
        if self.logs.try_update(|sync| sync.set_weight_filter(weight_filter)) == Some(true) {
            self.refresh_logs();
        }
    }

    /// Delete an entry, then resynchronize whatever the outcome
    pub fn remove_log(&self, id: LogId) {
        let Some(session) = self.session.get_untracked() else {
            return;
        };

        let state = *self;
        spawn_local(async move {
            if let Err(e) = GlooFoodApi::default().delete_log(&session, id).await {
                state.show_error(&format!("Remove failed: {}", e));
            }
            state.refresh_logs();
        });
    }

    pub fn reorder_logs(&self, from: usize, to: usize) {
        self.logs.update(|sync| {
            sync.reorder_visible(from, to);
        });
    }

    /// Analyze the selected image at the current weight
    pub fn analyze(&self) {
        let Some(session) = self.session.get_untracked() else {
            return;
        };
        let image = self.selected_image.get_untracked().map(|s| s.upload);
        let weight = self.weight_grams.get_untracked();

        let begun = self
            .recognition
            .try_update(|flow| flow.begin(image, &session, weight));
        self.schedule_banner_expiry();
        let Some(Ok(request)) = begun else {
            return;
        };

        let state = *self;
        spawn_local(async move {
            let response = GlooFoodApi::default()
                .recognize(&request.session, &request.image, request.weight_grams)
                .await;
            let outcome = state.recognition.try_update(|flow| flow.finish(response));
            state.schedule_banner_expiry();

            if outcome.is_some_and(|o| o.refreshes_logs()) {
                state.refresh_logs();
            }
        });
    }

    /// Clear the current banner after its display time, unless a newer one
    /// replaced it first
    fn schedule_banner_expiry(&self) {
        let Some((generation, after)) = self.recognition.with_untracked(|flow| {
            flow.banner()
                .and_then(|b| b.clear_after.map(|after| (b.generation, after)))
        }) else {
            return;
        };

        let recognition = self.recognition;
        gloo_timers::callback::Timeout::new(after.as_millis() as u32, move || {
            recognition.update(|flow| {
                flow.expire_banner(generation);
            });
        })
        .forget();
    }

    /// Show an error message (auto-clears after timeout)
    pub fn show_error(&self, message: &str) {
        self.error.set(Some(message.to_string()));

        let error_signal = self.error;
        gloo_timers::callback::Timeout::new(5000, move || {
            error_signal.set(None);
        })
        .forget();
    }
}
