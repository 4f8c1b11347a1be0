//! Log List Synchronizer
//!
//! Keeps the on-screen meal list consistent with the service-held set for
//! the session and with the current [`FilterState`].
//!
//! Every refresh is stamped with a [`RefreshTicket`]. Only the completion of
//! the most recently issued ticket is applied; anything older is stale and
//! dropped, so out-of-order network completions never overwrite newer data.

use crate::api::{ClientError, ClientResult, FoodApi};
use crate::filter::{FilterState, WeightFilter};
use crate::models::{FoodLogEntry, LogId};
use crate::session::Session;

/// Sequence number of one issued refresh
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RefreshTicket(u64);

impl RefreshTicket {
    pub fn sequence(&self) -> u64 {
        self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncStatus {
    Idle,
    Refreshing,
    /// Last refresh failed; the previous entries are still shown
    Failed { message: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// New entries were applied; `visible` of them pass the filter
    Applied { visible: usize },
    /// A newer refresh was issued in the meantime
    Stale,
    Failed { message: String },
}

/// Cached entry set plus filter, for one session
#[derive(Debug, Clone)]
pub struct LogListSync {
    entries: Vec<FoodLogEntry>,
    filter: FilterState,
    issued: u64,
    applied: u64,
    status: SyncStatus,
}

impl Default for LogListSync {
    fn default() -> Self {
        Self::new()
    }
}

impl LogListSync {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            filter: FilterState::default(),
            issued: 0,
            applied: 0,
            status: SyncStatus::Idle,
        }
    }

    pub fn filter(&self) -> &FilterState {
        &self.filter
    }

    pub fn status(&self) -> &SyncStatus {
        &self.status
    }

    pub fn is_refreshing(&self) -> bool {
        self.status == SyncStatus::Refreshing
    }

    /// Error text for the retry affordance
    pub fn failure(&self) -> Option<&str> {
        match &self.status {
            SyncStatus::Failed { message } => Some(message),
            _ => None,
        }
    }

    /// Whether any refresh has been applied yet
    pub fn has_loaded(&self) -> bool {
        self.applied > 0
    }

    /// Full fetched set, in service order (or local drag order)
    pub fn entries(&self) -> &[FoodLogEntry] {
        &self.entries
    }

    pub fn entry(&self, id: LogId) -> Option<&FoodLogEntry> {
        self.entries.iter().find(|e| e.id == id)
    }

    /// Entries passing the current filter, in display order
    pub fn visible(&self) -> Vec<&FoodLogEntry> {
        self.filter.apply(&self.entries)
    }

    /// Replace the filter. Returns whether it changed; callers refresh when
    /// it did.
    pub fn set_filter(&mut self, filter: FilterState) -> bool {
        if self.filter == filter {
            return false;
        }
        self.filter = filter;
        true
    }

    pub fn set_search(&mut self, search_text: impl Into<String>) -> bool {
        let filter = FilterState {
            search_text: search_text.into(),
            weight_filter: self.filter.weight_filter,
        };
        self.set_filter(filter)
    }

    pub fn set_weight_filter(&mut self, weight_filter: WeightFilter) -> bool {
        let filter = FilterState {
            search_text: self.filter.search_text.clone(),
            weight_filter,
        };
        self.set_filter(filter)
    }

    /// Issue a new refresh. Any refresh still in flight becomes stale.
    pub fn begin_refresh(&mut self) -> RefreshTicket {
        self.issued += 1;
        self.status = SyncStatus::Refreshing;
        tracing::debug!(ticket = self.issued, "Refreshing food logs");
        RefreshTicket(self.issued)
    }

    /// Issue a refresh after a failure
    pub fn retry(&mut self) -> RefreshTicket {
        if let SyncStatus::Failed { message } = &self.status {
            tracing::info!(%message, "Retrying food log refresh");
        }
        self.begin_refresh()
    }

    /// Apply the completion of `ticket`
    pub fn complete_refresh(
        &mut self,
        ticket: RefreshTicket,
        result: ClientResult<Vec<FoodLogEntry>>,
    ) -> RefreshOutcome {
        if ticket.0 != self.issued || ticket.0 <= self.applied {
            tracing::debug!(
                ticket = ticket.0,
                latest = self.issued,
                "Dropping stale food log response"
            );
            return RefreshOutcome::Stale;
        }
        self.applied = ticket.0;

        match result {
            Ok(entries) => {
                self.entries = entries;
                self.status = SyncStatus::Idle;
                let visible = self.visible().len();
                tracing::debug!(
                    total = self.entries.len(),
                    visible,
                    "Food logs refreshed"
                );
                RefreshOutcome::Applied { visible }
            }
            Err(e) => {
                tracing::warn!(error = %e, "Error loading logs");
                let message = e.to_string();
                self.status = SyncStatus::Failed {
                    message: message.clone(),
                };
                RefreshOutcome::Failed { message }
            }
        }
    }

    /// Move the visible entry at `from` to position `to`.
    ///
    /// Purely local: the service keeps its own order and the next refresh
    /// restores it. Entries hidden by the filter keep their slots.
    pub fn reorder_visible(&mut self, from: usize, to: usize) -> bool {
        let slots: Vec<usize> = self
            .entries
            .iter()
            .enumerate()
            .filter(|(_, e)| self.filter.matches(e))
            .map(|(i, _)| i)
            .collect();

        if from >= slots.len() || to >= slots.len() || from == to {
            return false;
        }

        let mut order: Vec<FoodLogEntry> = slots.iter().map(|&i| self.entries[i].clone()).collect();
        let moved = order.remove(from);
        order.insert(to, moved);

        for (slot, entry) in slots.into_iter().zip(order) {
            self.entries[slot] = entry;
        }

        tracing::debug!(from, to, "Log order updated");
        true
    }
}

/// Fetch the full entry set for `session` and apply it
pub async fn refresh<A>(sync: &mut LogListSync, api: &A, session: &Session) -> RefreshOutcome
where
    A: FoodApi + ?Sized,
{
    let ticket = sync.begin_refresh();
    fetch(sync, api, session, ticket).await
}

/// Refresh again after a failure
pub async fn retry<A>(sync: &mut LogListSync, api: &A, session: &Session) -> RefreshOutcome
where
    A: FoodApi + ?Sized,
{
    let ticket = sync.retry();
    fetch(sync, api, session, ticket).await
}

async fn fetch<A>(
    sync: &mut LogListSync,
    api: &A,
    session: &Session,
    ticket: RefreshTicket,
) -> RefreshOutcome
where
    A: FoodApi + ?Sized,
{
    let result = api.food_logs(session).await;
    sync.complete_refresh(ticket, result)
}

/// Delete one entry, then resynchronize.
///
/// The list is refreshed once the deletion completes, whether or not the
/// service accepted it; a rejected deletion is returned after the refresh.
pub async fn remove<A>(
    sync: &mut LogListSync,
    api: &A,
    session: &Session,
    id: LogId,
) -> Result<RefreshOutcome, ClientError>
where
    A: FoodApi + ?Sized,
{
    let deleted = api.delete_log(session, id).await;
    if let Err(e) = &deleted {
        tracing::warn!(id, error = %e, "Failed to remove log entry");
    }

    let outcome = refresh(sync, api, session).await;
    deleted.map(|()| outcome)
}
