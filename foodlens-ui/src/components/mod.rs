//! UI Components
//!
//! Leptos components for the dashboard.

pub mod food_log_list;
pub mod loading;
pub mod nav;
pub mod recognition_panel;
pub mod toast;

pub use food_log_list::FoodLogList;
pub use loading::{InlineLoading, ListSkeleton};
pub use nav::Nav;
pub use recognition_panel::RecognitionPanel;
pub use toast::Toast;
