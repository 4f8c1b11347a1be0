//! Dashboard Page
//!
//! Analysis panel on top, the food log below.

use leptos::*;

use crate::components::{FoodLogList, Nav, RecognitionPanel};
use crate::state::AppState;

#[component]
pub fn DashboardPage() -> impl IntoView {
    let state = use_context::<AppState>().expect("AppState not found");

    // Initial load on mount
    create_effect(move |_| {
        state.refresh_logs();
    });

    view! {
        <div class="space-y-8">
            <Nav />
            <RecognitionPanel />
            <FoodLogList />
        </div>
    }
}
