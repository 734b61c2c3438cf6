//! `ratatui-phone-input` is a phone number field for ratatui apps: a flag + calling-code selector
//! that opens a searchable country picker, next to an input that only accepts digits.
//!
//! The widget is controlled. The app owns the selected [`country::Country`] and the national
//! number string, passes both into [`phone_input::PhoneInput::handle_event`] and
//! [`phone_input::PhoneInput::render`], and applies the returned
//! [`phone_input::PhoneInputAction`]s.
//!
//! Useful entry points:
//! - [`phone_input::PhoneInput`]: the composed row plus picker overlay.
//! - [`picker::CountryPicker`]: the modal picker on its own.
//! - [`country::builtin`] / [`country::from_toml_str`]: country datasets.
//! - [`config::PhoneInputConfig`]: TOML-backed options.
//!
//! Enable the `crossterm` feature for [`crossterm_input`] event conversion.
pub use ratatui_phone_input_core::help;
pub use ratatui_phone_input_core::input;
pub use ratatui_phone_input_core::keymap;
pub use ratatui_phone_input_core::line_input;
pub use ratatui_phone_input_core::render;
pub use ratatui_phone_input_core::theme;
pub use ratatui_phone_input_core::viewport;
pub use ratatui_phone_input_core::virtual_list;

#[cfg(feature = "crossterm")]
pub use ratatui_phone_input_core::crossterm_input;

pub mod config;
pub mod country;
pub mod error;
pub mod filter;
pub mod flag;
pub mod sanitize;

pub mod phone_input;
pub mod picker;
