//! File-backed settings for [`PhoneInput`](crate::phone_input::PhoneInput).
//!
//! Only the behavioural and textual knobs are configurable here. Styles stay in code through
//! [`PhoneInputOptions`] and [`Theme`](ratatui_phone_input_core::theme::Theme).

use crate::error::ConfigError;
use crate::phone_input::PhoneInputOptions;
use crate::picker::CountryPickerOptions;
use serde::Deserialize;
use serde::Serialize;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhoneInputConfig {
    pub placeholder: String,
    pub auto_strip_leading_zero: bool,
    pub fallback_flag: String,
    pub picker_title: String,
    pub search_placeholder: String,
    pub picker_max_width: u16,
    pub picker_max_height: u16,
    /// ISO 3166-1 alpha-2 code of the country selected at startup.
    pub default_country: Option<String>,
}

impl Default for PhoneInputConfig {
    fn default() -> Self {
        let options = PhoneInputOptions::default();
        let picker = options.picker;
        Self {
            placeholder: options.placeholder,
            auto_strip_leading_zero: options.auto_strip_leading_zero,
            fallback_flag: picker.fallback_flag,
            picker_title: picker.title,
            search_placeholder: picker.search_placeholder,
            picker_max_width: picker.max_width,
            picker_max_height: picker.max_height,
            default_country: None,
        }
    }
}

impl PhoneInputConfig {
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(s)?;
        if config.fallback_flag.trim().is_empty() {
            return Err(ConfigError::EmptyFallbackFlag);
        }
        Ok(config)
    }

    pub fn into_options(self) -> PhoneInputOptions {
        let defaults = PhoneInputOptions::default();
        PhoneInputOptions {
            placeholder: self.placeholder,
            auto_strip_leading_zero: self.auto_strip_leading_zero,
            picker: CountryPickerOptions {
                title: self.picker_title,
                search_placeholder: self.search_placeholder,
                fallback_flag: self.fallback_flag,
                max_width: self.picker_max_width,
                max_height: self.picker_max_height,
                ..defaults.picker
            },
            ..defaults
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_gives_defaults() {
        let config = PhoneInputConfig::from_toml_str("").unwrap();
        assert_eq!(config, PhoneInputConfig::default());
        assert_eq!(config.placeholder, "Phone number");
        assert!(config.auto_strip_leading_zero);
    }

    #[test]
    fn overrides_flow_into_options() {
        let config = PhoneInputConfig::from_toml_str(
            r#"
            placeholder = "Số điện thoại"
            auto_strip_leading_zero = false
            picker_title = "Chọn quốc gia"
            default_country = "VN"
            "#,
        )
        .unwrap();
        assert_eq!(config.default_country.as_deref(), Some("VN"));
        let options = config.into_options();
        assert_eq!(options.placeholder, "Số điện thoại");
        assert!(!options.auto_strip_leading_zero);
        assert_eq!(options.picker.title, "Chọn quốc gia");
        assert_eq!(options.picker.search_placeholder, "Search country...");
    }

    #[test]
    fn rejects_blank_fallback_flag() {
        let err = PhoneInputConfig::from_toml_str("fallback_flag = \" \"").unwrap_err();
        assert!(matches!(err, ConfigError::EmptyFallbackFlag));
    }

    #[test]
    fn reports_parse_errors() {
        let err = PhoneInputConfig::from_toml_str("auto_strip_leading_zero = \"yes\"").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }
}
