//! Browser API client

pub mod client;

pub use client::{get_api_base, set_api_base, GlooFoodApi};
