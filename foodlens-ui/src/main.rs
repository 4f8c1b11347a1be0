//! FoodLens Web
//!
//! Browser front-end for FoodLens built with Leptos (WASM).
//!
//! # Views
//!
//! - `/`: login / registration
//! - `/dashboard`: image analysis plus the searchable food log
//!
//! # Architecture
//!
//! Client-side rendered (CSR) Leptos application compiled to WebAssembly.
//! All request/response state lives in the `foodlens` flows; components
//! hold them in signals and drive them through [`api::GlooFoodApi`].

use leptos::*;

mod api;
mod app;
mod components;
mod pages;
mod state;

fn main() {
    // Set up panic hook for better error messages in WASM
    console_error_panic_hook::set_once();

    mount_to_body(|| view! { <app::App /> });
}
