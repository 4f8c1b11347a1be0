//! Recognition Panel
//!
//! Image picker with preview, portion weight, analyze button, the transient
//! banner and the result card.

use leptos::*;
use wasm_bindgen::JsCast;

use foodlens::{BannerKind, ImageUpload, RecognitionResult, WEIGHT_OPTIONS};

use crate::components::InlineLoading;
use crate::state::{AppState, SelectedImage};

#[component]
pub fn RecognitionPanel() -> impl IntoView {
    let state = use_context::<AppState>().expect("AppState not found");

    let handle_file = move |ev: web_sys::Event| {
        let Some(input) = ev
            .target()
            .and_then(|t| t.dyn_into::<web_sys::HtmlInputElement>().ok())
        else {
            return;
        };

        match input.files().and_then(|files| files.get(0)) {
            Some(file) => read_image(state, file),
            None => replace_selection(state, None),
        }
    };

    let on_weight = move |ev: web_sys::Event| {
        if let Ok(grams) = event_target_value(&ev).parse() {
            state.weight_grams.set(grams);
        }
    };

    let in_flight = move || state.recognition.with(|flow| flow.is_in_flight());

    view! {
        <section class="bg-gray-800 rounded-xl p-6 space-y-4">
            <h2 class="text-xl font-semibold">"What's on your plate?"</h2>

            <div class="flex flex-col md:flex-row gap-4">
                <label
                    class="flex-1 flex items-center justify-center px-4 py-3 bg-gray-700
                           hover:bg-gray-600 rounded-lg cursor-pointer transition-colors
                           border-2 border-dashed border-gray-500 hover:border-primary-500"
                >
                    <input type="file" accept="image/*" class="hidden" on:change=handle_file />
                    <span>
                        {move || state.selected_image.with(|s| match s {
                            Some(image) => image.upload.file_name.clone(),
                            None => "Choose a photo".to_string(),
                        })}
                    </span>
                </label>

                <select
                    on:change=on_weight
                    class="px-4 py-2 bg-gray-700 rounded-lg"
                    prop:value=move || state.weight_grams.get().to_string()
                >
                    {WEIGHT_OPTIONS.iter().map(|grams| view! {
                        <option value=grams.to_string()>{format!("{}g", grams)}</option>
                    }).collect_view()}
                </select>

                <button
                    on:click=move |_| state.analyze()
                    disabled=in_flight
                    class="px-6 py-2 bg-primary-600 hover:bg-primary-700 disabled:bg-gray-600
                           rounded-lg font-medium transition-colors"
                >
                    {move || if in_flight() {
                        view! { <InlineLoading /> }.into_view()
                    } else {
                        "Analyze".into_view()
                    }}
                </button>
            </div>

            {move || state.selected_image.with(|s| s.as_ref().map(|image| image.preview_url.clone())).map(|url| view! {
                <img src=url alt="Selected dish" class="max-h-64 rounded-lg mx-auto" />
            })}

            <Banner />

            {move || state.recognition.with(|flow| flow.result().cloned()).map(|result| view! {
                <ResultCard result=result />
            })}
        </section>
    }
}

/// Loading or error line; result banners are rendered by the card instead
#[component]
fn Banner() -> impl IntoView {
    let state = use_context::<AppState>().expect("AppState not found");

    move || {
        let banner = state.recognition.with(|flow| flow.banner().cloned())?;
        let class = match banner.kind {
            BannerKind::Loading => "text-primary-400",
            BannerKind::Error => "text-red-400",
            BannerKind::Result => return None,
        };
        Some(view! { <p class=format!("text-center font-medium {}", class)>{banner.message}</p> })
    }
}

#[component]
fn ResultCard(result: RecognitionResult) -> impl IntoView {
    let summary = (!result.summary.is_empty()).then(|| {
        let heading = result.summary_heading();
        let text = result.summary.clone();
        view! {
            <div class="mt-4">
                <h4 class="font-semibold">{heading}</h4>
                <p class="text-sm text-gray-300">{text}</p>
            </div>
        }
    });

    view! {
        <div class="bg-gray-700 rounded-lg p-4">
            <h3 class="text-2xl font-bold capitalize">{result.display_name()}</h3>
            <p class="text-gray-400">"Confidence: " {result.confidence_label()}</p>
            <p class="mt-2">{result.nutrition.to_string()}</p>
            {summary}
        </div>
    }
}

/// Read the picked file into memory and make it the current selection
fn read_image(state: AppState, file: web_sys::File) {
    let reader = match web_sys::FileReader::new() {
        Ok(reader) => reader,
        Err(e) => {
            web_sys::console::error_1(&e);
            return;
        }
    };

    let onload = {
        let reader = reader.clone();
        let file = file.clone();
        wasm_bindgen::closure::Closure::wrap(Box::new(move |_: web_sys::Event| {
            let Some(buffer) = reader
                .result()
                .ok()
                .and_then(|r| r.dyn_into::<js_sys::ArrayBuffer>().ok())
            else {
                return;
            };

            let bytes = js_sys::Uint8Array::new(&buffer).to_vec();
            let name = file.name();
            let mime = match file.type_() {
                t if t.is_empty() => ImageUpload::mime_for(&name).to_string(),
                t => t,
            };
            let preview_url = web_sys::Url::create_object_url_with_blob(&file).unwrap_or_default();

            replace_selection(
                state,
                Some(SelectedImage {
                    upload: ImageUpload::new(name, mime, bytes),
                    preview_url,
                }),
            );
        }) as Box<dyn FnMut(_)>)
    };

    reader.set_onload(Some(onload.as_ref().unchecked_ref()));
    onload.forget();

    if let Err(e) = reader.read_as_array_buffer(&file) {
        web_sys::console::error_1(&e);
    }
}

fn replace_selection(state: AppState, selection: Option<SelectedImage>) {
    if let Some(previous) = state.selected_image.get_untracked() {
        let _ = web_sys::Url::revoke_object_url(&previous.preview_url);
    }
    state.selected_image.set(selection);
}
