//! Dashboard
//!
//! Composes the recognition flow and the log-list synchronizer for one
//! session. A `Dashboard` can only be built from a [`Session`], so every
//! operation on it runs on behalf of an authenticated user.

use crate::api::{ClientError, FoodApi};
use crate::filter::{FilterState, WeightFilter, DEFAULT_WEIGHT};
use crate::flows::logs::{self, LogListSync, RefreshOutcome};
use crate::flows::recognition::{self, RecognitionFlow, RecognitionOutcome};
use crate::flows::FlowError;
use crate::models::{ImageUpload, LogId};
use crate::session::{guard, Route, Session, SessionError, SessionStore};

pub struct Dashboard {
    session: Session,
    logs: LogListSync,
    recognition: RecognitionFlow,
    weight_grams: u32,
}

impl Dashboard {
    pub fn new(session: Session) -> Self {
        Self {
            session,
            logs: LogListSync::new(),
            recognition: RecognitionFlow::new(),
            weight_grams: DEFAULT_WEIGHT,
        }
    }

    /// Open the dashboard for the stored session, or `None` when the guard
    /// routes to the auth view instead
    pub fn open(store: &dyn SessionStore) -> Result<Option<Self>, SessionError> {
        let session = store.load()?;
        match guard(Route::Dashboard, session.as_ref()) {
            Route::Dashboard => Ok(session.map(Self::new)),
            Route::Auth => Ok(None),
        }
    }

    pub fn with_recognition(mut self, recognition: RecognitionFlow) -> Self {
        self.recognition = recognition;
        self
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn logs(&self) -> &LogListSync {
        &self.logs
    }

    pub fn recognition(&self) -> &RecognitionFlow {
        &self.recognition
    }

    /// Portion weight sent with the next analysis
    pub fn weight_grams(&self) -> u32 {
        self.weight_grams
    }

    pub fn set_weight_grams(&mut self, weight_grams: u32) {
        self.weight_grams = weight_grams;
    }

    /// Initial load
    pub async fn load<A: FoodApi + ?Sized>(&mut self, api: &A) -> RefreshOutcome {
        logs::refresh(&mut self.logs, api, &self.session).await
    }

    pub async fn retry<A: FoodApi + ?Sized>(&mut self, api: &A) -> RefreshOutcome {
        logs::retry(&mut self.logs, api, &self.session).await
    }

    /// Replace the filter. A change re-fetches the full set; an unchanged
    /// filter returns `None` without a request.
    pub async fn apply_filter<A: FoodApi + ?Sized>(
        &mut self,
        api: &A,
        filter: FilterState,
    ) -> Option<RefreshOutcome> {
        let changed = self.logs.set_filter(filter);
        self.refresh_if(changed, api).await
    }

    pub async fn search<A: FoodApi + ?Sized>(
        &mut self,
        api: &A,
        text: &str,
    ) -> Option<RefreshOutcome> {
        let changed = self.logs.set_search(text);
        self.refresh_if(changed, api).await
    }

    pub async fn filter_weight<A: FoodApi + ?Sized>(
        &mut self,
        api: &A,
        weight_filter: WeightFilter,
    ) -> Option<RefreshOutcome> {
        let changed = self.logs.set_weight_filter(weight_filter);
        self.refresh_if(changed, api).await
    }

    async fn refresh_if<A: FoodApi + ?Sized>(
        &mut self,
        changed: bool,
        api: &A,
    ) -> Option<RefreshOutcome> {
        if !changed {
            return None;
        }
        Some(logs::refresh(&mut self.logs, api, &self.session).await)
    }

    /// Submit an image at the current portion weight. A recognized dish
    /// triggers exactly one log refresh.
    pub async fn analyze<A: FoodApi + ?Sized>(
        &mut self,
        api: &A,
        image: Option<ImageUpload>,
    ) -> Result<RecognitionOutcome, FlowError> {
        let request = self
            .recognition
            .begin(image, &self.session, self.weight_grams)?;
        let outcome = recognition::analyze(&mut self.recognition, api, &request).await;

        if outcome.refreshes_logs() {
            logs::refresh(&mut self.logs, api, &self.session).await;
        }
        Ok(outcome)
    }

    pub async fn remove<A: FoodApi + ?Sized>(
        &mut self,
        api: &A,
        id: LogId,
    ) -> Result<RefreshOutcome, ClientError> {
        logs::remove(&mut self.logs, api, &self.session, id).await
    }

    pub fn reorder(&mut self, from: usize, to: usize) -> bool {
        self.logs.reorder_visible(from, to)
    }

    /// Clear the session and route back to the auth view
    pub fn logout(self, store: &dyn SessionStore) -> Result<Route, SessionError> {
        store.clear()?;
        tracing::info!("Logged out");
        Ok(guard(Route::Dashboard, None))
    }
}
