//! App Root Component
//!
//! Routing with the session guard and global providers.

use leptos::*;
use leptos_router::*;

use foodlens::{guard, Route as AppRoute};

use crate::components::Toast;
use crate::pages::{AuthPage, DashboardPage};
use crate::state::{provide_app_state, AppState};

/// Root application component
#[component]
pub fn App() -> impl IntoView {
    provide_app_state();

    view! {
        <Router>
            <div class="min-h-screen bg-gray-900 text-white flex flex-col">
                <main class="flex-1 container mx-auto px-4 py-8">
                    <Routes>
                        <Route path="/" view=|| view! { <Guarded route=AppRoute::Auth /> } />
                        <Route path="/dashboard" view=|| view! { <Guarded route=AppRoute::Dashboard /> } />
                        <Route path="/*any" view=NotFound />
                    </Routes>
                </main>

                <Toast />
            </div>
        </Router>
    }
}

/// Renders `route` if the session allows it, otherwise redirects to where
/// the guard sends the user. Re-evaluated on every session change.
#[component]
fn Guarded(route: AppRoute) -> impl IntoView {
    let state = use_context::<AppState>().expect("AppState not found");

    move || {
        let target = state.session.with(|session| guard(route, session.as_ref()));
        if target != route {
            return view! { <Redirect path=target.path() /> }.into_view();
        }

        match route {
            AppRoute::Auth => view! { <AuthPage /> }.into_view(),
            AppRoute::Dashboard => view! { <DashboardPage /> }.into_view(),
        }
    }
}

/// 404 Not Found page
#[component]
fn NotFound() -> impl IntoView {
    view! {
        <div class="flex flex-col items-center justify-center min-h-[60vh] text-center">
            <div class="text-6xl mb-4">"🍽"</div>
            <h1 class="text-3xl font-bold mb-2">"Page Not Found"</h1>
            <p class="text-gray-400 mb-6">"Nothing on this plate."</p>
            <A
                href="/"
                class="px-6 py-3 bg-primary-600 hover:bg-primary-700 rounded-lg font-medium transition-colors"
            >
                "Back to start"
            </A>
        </div>
    }
}
