//! Auth Page
//!
//! Login and registration share one form; the link below it flips modes.

use leptos::*;

use crate::api::{get_api_base, set_api_base};
use crate::state::AppState;

#[component]
pub fn AuthPage() -> impl IntoView {
    let state = use_context::<AppState>().expect("AppState not found");

    let (username, set_username) = create_signal(String::new());
    let (password, set_password) = create_signal(String::new());

    let on_submit = move |ev: ev::SubmitEvent| {
        ev.prevent_default();
        state.submit_auth(username.get_untracked(), password.get_untracked());
    };

    let (api_url, set_api_url) = create_signal(get_api_base());
    let save_api_url = move |_| {
        let url = api_url.get_untracked();
        set_api_base(url.trim());
        set_api_url.set(get_api_base());
    };

    let toggle = move |ev: ev::MouseEvent| {
        ev.prevent_default();
        state.auth.update(|form| form.toggle());
    };

    view! {
        <div class="flex items-center justify-center min-h-[70vh]">
            <form
                on:submit=on_submit
                class="w-full max-w-sm bg-gray-800 rounded-xl p-8 space-y-4 shadow-lg"
            >
                <h1 class="text-3xl font-bold text-center">
                    {move || state.auth.with(|form| form.title())}
                </h1>

                <input
                    type="text"
                    placeholder="Username"
                    class="w-full px-4 py-2 bg-gray-700 rounded-lg focus:ring-2 focus:ring-primary-500 outline-none"
                    prop:value=username
                    on:input=move |ev| set_username.set(event_target_value(&ev))
                />
                <input
                    type="password"
                    placeholder="Password"
                    class="w-full px-4 py-2 bg-gray-700 rounded-lg focus:ring-2 focus:ring-primary-500 outline-none"
                    prop:value=password
                    on:input=move |ev| set_password.set(event_target_value(&ev))
                />

                <button
                    type="submit"
                    disabled=move || state.auth.with(|form| form.is_busy())
                    class="w-full py-2 bg-primary-600 hover:bg-primary-700 disabled:bg-gray-600
                           rounded-lg font-medium transition-colors"
                >
                    {move || state.auth.with(|form| form.button_label())}
                </button>

                {move || {
                    state.auth.with(|form| form.error().map(str::to_string)).map(|message| view! {
                        <p class="text-sm text-red-400 text-center">{message}</p>
                    })
                }}

                <p class="text-sm text-gray-400 text-center">
                    {move || state.auth.with(|form| form.mode().toggle_prompt())}
                    " "
                    <a href="#" on:click=toggle class="text-primary-400 hover:underline">
                        {move || state.auth.with(|form| form.mode().toggle_link())}
                    </a>
                </p>

                <details class="text-sm text-gray-400">
                    <summary class="cursor-pointer">"Service URL"</summary>
                    <div class="flex gap-2 mt-2">
                        <input
                            type="url"
                            class="flex-1 px-3 py-1 bg-gray-700 rounded-lg outline-none"
                            prop:value=api_url
                            on:input=move |ev| set_api_url.set(event_target_value(&ev))
                        />
                        <button
                            type="button"
                            on:click=save_api_url
                            class="px-3 py-1 bg-gray-700 hover:bg-gray-600 rounded-lg"
                        >
                            "Save"
                        </button>
                    </div>
                </details>
            </form>
        </div>
    }
}
