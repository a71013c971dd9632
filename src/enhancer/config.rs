use crate::selector::parse_selector_groups;
use crate::{Error, Result};

pub const DEFAULT_CONFIRM_MESSAGE: &str =
    "Are you sure you want to delete this item? This action cannot be undone.";

/// Controls with this attribute value close the banner that contains them.
pub const DISMISS_SELECTOR: &str = "[data-dismiss=\"alert\"]";

/// Selector for controls recognized by their inline handler text.
pub const LEGACY_CONFIRM_SELECTOR: &str = "button[onclick*=\"confirm\"], input[onclick*=\"confirm\"]";

/// What happens to an error annotation once its field is valid again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AnnotationPolicy {
    /// The annotation stays in the document; stylesheets hide it once the
    /// field loses its invalid class.
    #[default]
    Persist,
    /// The annotation is detached whenever the invalid mark is cleared.
    RemoveWhenValid,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnhancerConfig {
    pub invalid_class: String,
    pub feedback_class: String,
    pub alert_selector: String,
    pub shown_class: String,
    pub alert_hide_delay_ms: i64,
    pub alert_remove_delay_ms: i64,
    pub confirm_attribute: String,
    pub confirm_message: String,
    /// Also guard controls whose inline `onclick` mentions `confirm`. The
    /// match is a plain substring test, so unrelated handlers that happen
    /// to contain the word are guarded too.
    pub legacy_inline_confirm: bool,
    pub annotation_policy: AnnotationPolicy,
}

impl Default for EnhancerConfig {
    fn default() -> Self {
        Self {
            invalid_class: "is-invalid".to_string(),
            feedback_class: "invalid-feedback".to_string(),
            alert_selector: ".alert".to_string(),
            shown_class: "show".to_string(),
            alert_hide_delay_ms: 5000,
            alert_remove_delay_ms: 150,
            confirm_attribute: "data-confirm".to_string(),
            confirm_message: DEFAULT_CONFIRM_MESSAGE.to_string(),
            legacy_inline_confirm: false,
            annotation_policy: AnnotationPolicy::Persist,
        }
    }
}

impl EnhancerConfig {
    pub fn validate(&self) -> Result<()> {
        for (field, value) in [
            ("invalid_class", &self.invalid_class),
            ("feedback_class", &self.feedback_class),
            ("shown_class", &self.shown_class),
        ] {
            if value.is_empty() || value.chars().any(char::is_whitespace) {
                return Err(Error::InvalidConfig(format!(
                    "{field} must be a single class name, got {value:?}"
                )));
            }
        }

        parse_selector_groups(&self.alert_selector).map_err(|err| {
            Error::InvalidConfig(format!(
                "alert_selector {:?} is not usable: {err}",
                self.alert_selector
            ))
        })?;

        for (field, value) in [
            ("alert_hide_delay_ms", self.alert_hide_delay_ms),
            ("alert_remove_delay_ms", self.alert_remove_delay_ms),
        ] {
            if value < 0 {
                return Err(Error::InvalidConfig(format!(
                    "{field} must be non-negative, got {value}"
                )));
            }
        }

        if self.confirm_attribute.trim().is_empty() {
            return Err(Error::InvalidConfig(
                "confirm_attribute must not be empty".into(),
            ));
        }
        parse_selector_groups(&self.confirm_selector()).map_err(|_| {
            Error::InvalidConfig(format!(
                "confirm_attribute {:?} is not an attribute name",
                self.confirm_attribute
            ))
        })?;
        if self.confirm_message.trim().is_empty() {
            return Err(Error::InvalidConfig(
                "confirm_message must not be empty".into(),
            ));
        }
        Ok(())
    }

    /// Selector for controls guarded by a confirmation prompt.
    pub fn confirm_selector(&self) -> String {
        let declarative = format!("[{}]", self.confirm_attribute);
        if self.legacy_inline_confirm {
            format!("{declarative}, {LEGACY_CONFIRM_SELECTOR}")
        } else {
            declarative
        }
    }

    /// The prompt text for a guarded control: its non-empty marker value,
    /// or the configured message.
    pub fn prompt_for<'a>(&'a self, marker_value: Option<&'a str>) -> &'a str {
        marker_value
            .map(str::trim)
            .filter(|value| !value.is_empty() && *value != "true")
            .unwrap_or(&self.confirm_message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_validate() -> Result<()> {
        let config = EnhancerConfig::default();
        config.validate()?;
        assert_eq!(config.alert_hide_delay_ms, 5000);
        assert_eq!(config.alert_remove_delay_ms, 150);
        assert_eq!(config.confirm_selector(), "[data-confirm]");
        Ok(())
    }

    #[test]
    fn rejects_blank_or_spaced_class_names() {
        let config = EnhancerConfig {
            invalid_class: "is invalid".into(),
            ..EnhancerConfig::default()
        };
        assert!(matches!(config.validate(), Err(Error::InvalidConfig(_))));

        let config = EnhancerConfig {
            shown_class: String::new(),
            ..EnhancerConfig::default()
        };
        assert!(matches!(config.validate(), Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn rejects_negative_delays_and_bad_selector() {
        let config = EnhancerConfig {
            alert_remove_delay_ms: -1,
            ..EnhancerConfig::default()
        };
        assert!(matches!(config.validate(), Err(Error::InvalidConfig(_))));

        let config = EnhancerConfig {
            alert_selector: "div:hover".into(),
            ..EnhancerConfig::default()
        };
        assert!(matches!(config.validate(), Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn legacy_mode_extends_confirm_selector() {
        let config = EnhancerConfig {
            legacy_inline_confirm: true,
            ..EnhancerConfig::default()
        };
        assert_eq!(
            config.confirm_selector(),
            "[data-confirm], button[onclick*=\"confirm\"], input[onclick*=\"confirm\"]"
        );
    }

    #[test]
    fn marker_value_overrides_prompt() {
        let config = EnhancerConfig::default();
        assert_eq!(config.prompt_for(Some("Remove user?")), "Remove user?");
        assert_eq!(config.prompt_for(Some("")), DEFAULT_CONFIRM_MESSAGE);
        assert_eq!(config.prompt_for(Some("true")), DEFAULT_CONFIRM_MESSAGE);
        assert_eq!(config.prompt_for(None), DEFAULT_CONFIRM_MESSAGE);
    }
}
