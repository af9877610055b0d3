//! Back-office settings loaded via OrthoConfig.
//!
//! Values come from `ADMIN_*` environment variables, configuration files
//! and command-line flags, in OrthoConfig's usual precedence.

use std::num::NonZeroU32;
use std::path::PathBuf;

use ortho_config::OrthoConfig;
use serde::Deserialize;
use thiserror::Error;

use crate::domain::grid::{DEFAULT_PAGE_SIZE, GridDefaults, MAX_PAGE_SIZE};
use crate::domain::store::store_messages;
use crate::domain::{MessageTable, MessageTableError};

/// Settings rejected after loading.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SettingsError {
    /// Page sizes must be positive and the default must not exceed the
    /// maximum.
    #[error("invalid page sizes: default {default}, max {max}")]
    PageSizes {
        /// Configured default page size.
        default: u32,
        /// Configured maximum page size.
        max: u32,
    },
    /// The message override file could not be used.
    #[error(transparent)]
    Messages(#[from] MessageTableError),
}

/// Configuration of the back-office screens.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "ADMIN")]
pub struct AdminSettings {
    /// Rows per page when a listing request names none.
    #[ortho_config(default = DEFAULT_PAGE_SIZE)]
    pub default_page_size: u32,
    /// Largest page size a listing request may ask for.
    #[ortho_config(default = MAX_PAGE_SIZE)]
    pub max_page_size: u32,
    /// JSON file whose entries replace the built-in failure messages.
    pub messages_path: Option<PathBuf>,
    /// Text shown for failures without a message.
    pub fallback_message: Option<String>,
}

impl AdminSettings {
    /// Page size bounds for listing grids.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::PageSizes`] when either size is zero or the
    /// default exceeds the maximum.
    pub fn grid_defaults(&self) -> Result<GridDefaults, SettingsError> {
        let (default, max) = (self.default_page_size, self.max_page_size);
        match (NonZeroU32::new(default), NonZeroU32::new(max)) {
            (Some(default_page_size), Some(max_page_size))
                if default_page_size <= max_page_size =>
            {
                Ok(GridDefaults {
                    default_page_size,
                    max_page_size,
                })
            }
            _ => Err(SettingsError::PageSizes { default, max }),
        }
    }

    /// The store message table with any configured overrides applied.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::Messages`] when `messages_path` is set but
    /// cannot be read or parsed.
    pub fn message_table(&self) -> Result<MessageTable, SettingsError> {
        let mut table = store_messages();
        if let Some(path) = &self.messages_path {
            table = table.merged_with(MessageTable::from_json_file(path)?);
        }
        if let Some(fallback) = &self.fallback_message {
            table = table.with_fallback(fallback.clone());
        }
        Ok(table)
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for back-office configuration parsing.

    use super::*;
    use std::ffi::OsString;

    use env_lock::lock_env;
    use rstest::rstest;

    use crate::domain::{DEFAULT_FALLBACK_MESSAGE, DomainFailure, MessageTableError};

    const VARS: [&str; 4] = [
        "ADMIN_DEFAULT_PAGE_SIZE",
        "ADMIN_MAX_PAGE_SIZE",
        "ADMIN_MESSAGES_PATH",
        "ADMIN_FALLBACK_MESSAGE",
    ];

    fn load_from_empty_args() -> AdminSettings {
        AdminSettings::load_from_iter([OsString::from("backoffice")])
            .expect("config should load")
    }

    fn settings(default: u32, max: u32) -> AdminSettings {
        AdminSettings {
            default_page_size: default,
            max_page_size: max,
            messages_path: None,
            fallback_message: None,
        }
    }

    #[rstest]
    fn default_values_are_used_when_missing() {
        let _guard = lock_env(VARS.map(|name| (name, None::<String>)));

        let settings = load_from_empty_args();

        assert_eq!(settings.default_page_size, DEFAULT_PAGE_SIZE);
        assert_eq!(settings.max_page_size, MAX_PAGE_SIZE);
        assert_eq!(
            settings.grid_defaults().expect("valid defaults"),
            GridDefaults::default()
        );
        assert_eq!(
            settings
                .message_table()
                .expect("built-in messages")
                .fallback(),
            DEFAULT_FALLBACK_MESSAGE
        );
    }

    #[rstest]
    fn environment_overrides_are_respected() {
        let _guard = lock_env([
            ("ADMIN_DEFAULT_PAGE_SIZE", Some("20".to_owned())),
            ("ADMIN_MAX_PAGE_SIZE", Some("200".to_owned())),
            ("ADMIN_MESSAGES_PATH", None),
            ("ADMIN_FALLBACK_MESSAGE", Some("Please retry.".to_owned())),
        ]);

        let settings = load_from_empty_args();
        let defaults = settings.grid_defaults().expect("valid sizes");
        let table = settings.message_table().expect("messages");

        assert_eq!(defaults.default_page_size.get(), 20);
        assert_eq!(defaults.max_page_size.get(), 200);
        assert_eq!(table.resolve(&DomainFailure::unknown()), "Please retry.");
    }

    #[rstest]
    #[case(0, MAX_PAGE_SIZE)]
    #[case(DEFAULT_PAGE_SIZE, 0)]
    #[case(100, 10)]
    fn rejects_unusable_page_sizes(#[case] default: u32, #[case] max: u32) {
        let err = settings(default, max)
            .grid_defaults()
            .expect_err("sizes are rejected");

        assert!(matches!(err, SettingsError::PageSizes { .. }));
    }

    #[rstest]
    fn unreadable_message_file_is_reported() {
        let settings = AdminSettings {
            messages_path: Some(PathBuf::from("/nonexistent/backoffice/messages.json")),
            ..settings(DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE)
        };

        let err = settings.message_table().expect_err("file is missing");

        assert!(matches!(
            err,
            SettingsError::Messages(MessageTableError::Io { .. })
        ));
    }
}
