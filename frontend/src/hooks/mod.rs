//! Custom Yew hooks for the frontend application.

mod use_history;

pub use use_history::use_history;
