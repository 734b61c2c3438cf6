//! `ratatui-phone-input-core` provides the event-loop agnostic building blocks behind
//! `ratatui-phone-input`.
//!
//! ## Design goals
//!
//! - Event-loop agnostic: you drive input + rendering from your app.
//! - No async runtime: all components run on the main thread.
//! - Widgets report what happened through returned action enums instead of callbacks.
//!
//! Useful entry points:
//! - [`line_input::LineInput`]: single-line editor with placeholder and horizontal scrolling.
//! - [`virtual_list::VirtualListView`]: large list virtualization with keyboard/mouse navigation.
//! - [`help::HelpBar`]: key hint footer rendered from [`keymap::Binding`]s.
pub mod theme;

#[cfg(feature = "crossterm")]
pub mod crossterm_input;

pub mod render;
pub mod viewport;

pub mod help;
pub mod input;
pub mod keymap;
pub mod line_input;
pub mod virtual_list;
