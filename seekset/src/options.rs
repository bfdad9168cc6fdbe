//! Pagination options.
//!
//! Defaults match a typical HTTP API: page size 20, at most 100 rows per
//! page, and clients may not pick their own page size.
//!
//! Options can be loaded from TOML:
//!
//! ```
//! use seekset::PaginationOptions;
//!
//! let options = PaginationOptions::from_toml_str(
//!     r#"
//!     default_size = 25
//!     max_size = 50
//!     can_change_size_from_query = true
//!     "#,
//! )
//! .unwrap();
//!
//! assert_eq!(options.default_size, 25);
//! assert_eq!(options.after_query_parameter_name, "after");
//! ```
//!
//! # Environment variables
//!
//! | Variable                  | Field                        |
//! |---------------------------|------------------------------|
//! | `SEEKSET_DEFAULT_SIZE`    | `default_size`               |
//! | `SEEKSET_MAX_SIZE`        | `max_size`                   |
//! | `SEEKSET_SIZE_FROM_QUERY` | `can_change_size_from_query` |

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Default page size.
pub const DEFAULT_PAGE_SIZE: u32 = 20;

/// Default upper bound on the page size.
pub const DEFAULT_MAX_PAGE_SIZE: u32 = 100;

/// Environment variable overriding [`PaginationOptions::default_size`].
pub const ENV_DEFAULT_SIZE: &str = "SEEKSET_DEFAULT_SIZE";

/// Environment variable overriding [`PaginationOptions::max_size`].
pub const ENV_MAX_SIZE: &str = "SEEKSET_MAX_SIZE";

/// Environment variable overriding [`PaginationOptions::can_change_size_from_query`].
pub const ENV_SIZE_FROM_QUERY: &str = "SEEKSET_SIZE_FROM_QUERY";

/// Page-size policy and query parameter names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PaginationOptions {
    /// Name of the first-page flag (default `first`).
    pub first_query_parameter_name: String,
    /// Name of the before-reference parameter (default `before`).
    pub before_query_parameter_name: String,
    /// Name of the after-reference parameter (default `after`).
    pub after_query_parameter_name: String,
    /// Name of the last-page flag (default `last`).
    pub last_query_parameter_name: String,
    /// Name of the offset page number (default `page`).
    pub page_query_parameter_name: String,
    /// Name of the page size parameter (default `size`).
    pub size_query_parameter_name: String,
    /// Page size used when none is requested, or a non-positive one is.
    pub default_size: u32,
    /// Requested sizes above this are clamped.
    pub max_size: u32,
    /// Whether the `size` query parameter is honored.
    pub can_change_size_from_query: bool,
}

impl Default for PaginationOptions {
    fn default() -> Self {
        Self {
            first_query_parameter_name: "first".to_string(),
            before_query_parameter_name: "before".to_string(),
            after_query_parameter_name: "after".to_string(),
            last_query_parameter_name: "last".to_string(),
            page_query_parameter_name: "page".to_string(),
            size_query_parameter_name: "size".to_string(),
            default_size: DEFAULT_PAGE_SIZE,
            max_size: DEFAULT_MAX_PAGE_SIZE,
            can_change_size_from_query: false,
        }
    }
}

impl PaginationOptions {
    /// Parse and validate options from a TOML document.
    ///
    /// Missing fields take their defaults.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let options: Self = toml::from_str(s)?;
        options.validate()?;
        Ok(options)
    }

    /// Apply the `SEEKSET_*` environment overrides.
    ///
    /// Unset or unparsable variables leave the field unchanged. The result
    /// is not validated; call [`PaginationOptions::validate`], or let the
    /// paginator reject it before issuing any query.
    #[must_use]
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides(|key| std::env::var(key).ok())
    }

    fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(v) = lookup(ENV_DEFAULT_SIZE).and_then(|v| v.trim().parse().ok()) {
            self.default_size = v;
        }
        if let Some(v) = lookup(ENV_MAX_SIZE).and_then(|v| v.trim().parse().ok()) {
            self.max_size = v;
        }
        if let Some(v) = lookup(ENV_SIZE_FROM_QUERY).and_then(|v| parse_flag(&v)) {
            self.can_change_size_from_query = v;
        }
        self
    }

    /// Check the options for consistency.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.default_size == 0 {
            return Err(ConfigError::Invalid("default_size must be at least 1".into()));
        }
        if self.max_size == 0 {
            return Err(ConfigError::Invalid("max_size must be at least 1".into()));
        }
        if self.default_size > self.max_size {
            return Err(ConfigError::Invalid(format!(
                "default_size ({}) exceeds max_size ({})",
                self.default_size, self.max_size
            )));
        }

        let names = self.parameter_names();
        for (i, name) in names.iter().enumerate() {
            if name.is_empty() {
                return Err(ConfigError::Invalid("query parameter names must not be empty".into()));
            }
            if names.iter().take(i).any(|earlier| earlier == name) {
                return Err(ConfigError::Invalid(format!(
                    "query parameter name `{name}` is used more than once"
                )));
            }
        }
        Ok(())
    }

    fn parameter_names(&self) -> [&str; 6] {
        [
            &self.first_query_parameter_name,
            &self.before_query_parameter_name,
            &self.after_query_parameter_name,
            &self.last_query_parameter_name,
            &self.page_query_parameter_name,
            &self.size_query_parameter_name,
        ]
    }

    /// Resolve a requested page size.
    ///
    /// `None` or a non-positive size gives `default_size`; anything above
    /// `max_size` is clamped.
    #[must_use]
    pub fn resolve_size(&self, requested: Option<i64>) -> u64 {
        let max = u64::from(self.max_size);
        match requested {
            Some(size) if size > 0 => size.unsigned_abs().min(max),
            _ => u64::from(self.default_size).min(max),
        }
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = PaginationOptions::default();
        assert_eq!(options.default_size, 20);
        assert_eq!(options.max_size, 100);
        assert!(!options.can_change_size_from_query);
        assert!(options.validate().is_ok());
    }

    #[test]
    fn test_resolve_size() {
        let options = PaginationOptions::default();
        assert_eq!(options.resolve_size(None), 20);
        assert_eq!(options.resolve_size(Some(0)), 20);
        assert_eq!(options.resolve_size(Some(-5)), 20);
        assert_eq!(options.resolve_size(Some(7)), 7);
        assert_eq!(options.resolve_size(Some(100)), 100);
        assert_eq!(options.resolve_size(Some(1000)), 100);
    }

    #[test]
    fn test_from_toml_partial() {
        let options = PaginationOptions::from_toml_str(
            r#"
            max_size = 10
            default_size = 5
            after_query_parameter_name = "cursor"
            "#,
        )
        .unwrap();
        assert_eq!(options.max_size, 10);
        assert_eq!(options.default_size, 5);
        assert_eq!(options.after_query_parameter_name, "cursor");
        assert_eq!(options.before_query_parameter_name, "before");
    }

    #[test]
    fn test_from_toml_rejects_bad_input() {
        let err = PaginationOptions::from_toml_str("max_size = \"many\"").unwrap_err();
        assert!(matches!(err, ConfigError::Toml(_)));

        let err = PaginationOptions::from_toml_str("default_size = 50\nmax_size = 10").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_validate_parameter_names() {
        let options = PaginationOptions {
            last_query_parameter_name: "first".into(),
            ..PaginationOptions::default()
        };
        let err = options.validate().unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid pagination options: query parameter name `first` is used more than once"
        );

        let options = PaginationOptions {
            page_query_parameter_name: String::new(),
            ..PaginationOptions::default()
        };
        assert!(options.validate().is_err());

        let options = PaginationOptions {
            max_size: 0,
            default_size: 0,
            ..PaginationOptions::default()
        };
        assert!(options.validate().is_err());
    }

    #[test]
    fn test_overrides() {
        let env = |key: &str| match key {
            ENV_DEFAULT_SIZE => Some("15".to_string()),
            ENV_MAX_SIZE => Some("not a number".to_string()),
            ENV_SIZE_FROM_QUERY => Some("TRUE".to_string()),
            _ => None,
        };
        let options = PaginationOptions::default().with_overrides(env);
        assert_eq!(options.default_size, 15);
        assert_eq!(options.max_size, 100);
        assert!(options.can_change_size_from_query);
    }

    #[test]
    fn test_overrides_are_not_validated() {
        let env = |key: &str| (key == ENV_MAX_SIZE).then(|| "5".to_string());
        let options = PaginationOptions::default().with_overrides(env);
        assert_eq!(options.max_size, 5);
        assert!(matches!(options.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_env_overrides_keep_parameter_names() {
        let options = PaginationOptions {
            after_query_parameter_name: "cursor".into(),
            ..PaginationOptions::default()
        }
        .with_env_overrides();
        assert_eq!(options.after_query_parameter_name, "cursor");
        assert_eq!(options.first_query_parameter_name, "first");
    }
}
