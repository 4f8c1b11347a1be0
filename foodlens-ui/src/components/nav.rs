//! Navigation Component
//!
//! Header with brand and logout.

use leptos::*;

use crate::state::AppState;

/// Navigation header component
#[component]
pub fn Nav() -> impl IntoView {
    let state = use_context::<AppState>().expect("AppState not found");

    // The route guard redirects once the session is gone
    let logout = move |_| state.sign_out();

    view! {
        <nav class="bg-gray-800 border-b border-gray-700 rounded-xl">
            <div class="px-4">
                <div class="flex items-center justify-between h-16">
                    <div class="flex items-center space-x-3">
                        <span class="text-2xl">"🍱"</span>
                        <span class="text-xl font-bold text-white">"FoodLens"</span>
                    </div>

                    <button
                        on:click=logout
                        class="px-4 py-2 rounded-lg text-gray-300 hover:text-white hover:bg-gray-700 transition-colors"
                    >
                        "Logout"
                    </button>
                </div>
            </div>
        </nav>
    }
}
