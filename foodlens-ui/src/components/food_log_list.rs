//! Food Log List
//!
//! Search box, weight filter, the visible entries (drag to reorder) and the
//! retry affordance after a failed refresh.

use leptos::*;

use foodlens::{FoodLogEntry, WeightFilter, WEIGHT_OPTIONS};

use crate::components::ListSkeleton;
use crate::state::AppState;

#[component]
pub fn FoodLogList() -> impl IntoView {
    let state = use_context::<AppState>().expect("AppState not found");

    let dragging = create_rw_signal(None::<usize>);

    let on_search = move |ev: web_sys::Event| state.set_search(event_target_value(&ev));

    let on_weight = move |ev: web_sys::Event| {
        if let Ok(filter) = event_target_value(&ev).parse::<WeightFilter>() {
            state.set_weight_filter(filter);
        }
    };

    view! {
        <section class="bg-gray-800 rounded-xl p-6 space-y-4">
            <div class="flex flex-col md:flex-row md:items-center md:justify-between gap-3">
                <h2 class="text-xl font-semibold">"Food Log"</h2>

                <div class="flex gap-3">
                    <input
                        type="search"
                        placeholder="Search dishes"
                        class="px-4 py-2 bg-gray-700 rounded-lg"
                        prop:value=move || state.logs.with(|sync| sync.filter().search_text.clone())
                        on:input=on_search
                    />
                    <select
                        on:change=on_weight
                        class="px-4 py-2 bg-gray-700 rounded-lg"
                        prop:value=move || state.logs.with(|sync| sync.filter().weight_filter.to_string())
                    >
                        <option value="all">"All weights"</option>
                        {WEIGHT_OPTIONS.iter().map(|grams| view! {
                            <option value=grams.to_string()>{format!("{}g", grams)}</option>
                        }).collect_view()}
                    </select>
                </div>
            </div>

            {move || state.logs.with(|sync| sync.failure().map(str::to_string)).map(|message| view! {
                <div class="flex items-center justify-between p-3 bg-red-900/40 rounded-lg text-sm">
                    <span class="text-red-300">{format!("Could not load logs: {}", message)}</span>
                    <button
                        on:click=move |_| state.retry_logs()
                        class="px-3 py-1 bg-gray-600 hover:bg-gray-500 rounded-lg"
                    >
                        "Retry"
                    </button>
                </div>
            })}

            {move || {
                let (loaded, visible, total) = state.logs.with(|sync| {
                    let visible: Vec<FoodLogEntry> = sync.visible().into_iter().cloned().collect();
                    (sync.has_loaded(), visible, sync.entries().len())
                });

                if !loaded {
                    return view! { <ListSkeleton /> }.into_view();
                }
                if visible.is_empty() {
                    let message = if total == 0 {
                        "No meals logged yet. Analyze a photo to start."
                    } else {
                        "No meals match the current filter"
                    };
                    return view! { <p class="text-gray-400 text-center py-6">{message}</p> }.into_view();
                }

                visible
                    .into_iter()
                    .enumerate()
                    .map(|(index, entry)| view! { <LogRow entry=entry index=index dragging=dragging /> })
                    .collect_view()
            }}
        </section>
    }
}

#[component]
fn LogRow(entry: FoodLogEntry, index: usize, dragging: RwSignal<Option<usize>>) -> impl IntoView {
    let state = use_context::<AppState>().expect("AppState not found");
    let id = entry.id;

    let logged = entry
        .timestamp
        .map(|ts| ts.format("%b %d, %H:%M").to_string())
        .unwrap_or_default();

    view! {
        <div
            draggable="true"
            on:dragstart=move |_| dragging.set(Some(index))
            on:dragover=move |ev: web_sys::DragEvent| ev.prevent_default()
            on:drop=move |ev: web_sys::DragEvent| {
                ev.prevent_default();
                if let Some(from) = dragging.get_untracked() {
                    state.reorder_logs(from, index);
                }
                dragging.set(None);
            }
            on:dragend=move |_| dragging.set(None)
            class="flex items-center justify-between p-4 bg-gray-700 rounded-lg cursor-move"
        >
            <div>
                <h3 class="font-semibold capitalize">{entry.display_name()}</h3>
                <p class="text-sm text-gray-400">
                    {format!("{} | {} | {}", entry.confidence_label(), entry.weight_label(), entry.nutrition)}
                </p>
                <p class="text-xs text-gray-500">{logged}</p>
            </div>
            <button
                on:click=move |_| state.remove_log(id)
                class="px-3 py-1 text-sm text-red-300 hover:text-white hover:bg-red-600 rounded-lg transition-colors"
            >
                "Remove"
            </button>
        </div>
    }
}
