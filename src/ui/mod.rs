//! egui paint step.
//!
//! Panels read the controller and view model and report clicks as
//! [`UiEvent`]s; nothing here mutates session state directly.

pub mod cards;
pub mod chat;
pub mod event;
pub mod upload;

pub use event::UiEvent;
