//! Failure taxonomy shared by commands, bulk actions and listings.
//!
//! Three kinds of failure exist, each with its own type:
//!
//! - [`ValidationFailure`]: malformed or empty input, rejected before any
//!   command is dispatched.
//! - [`DomainFailure`]: a business-rule rejection raised while a handler
//!   ran. Always resolvable to a user message through a
//!   [`MessageTable`](crate::domain::MessageTable).
//! - [`ConfigurationError`]: the command bus is mis-wired. Never shown to
//!   end users and never recovered.

use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

macro_rules! define_tag {
    (
        $(#[$outer:meta])*
        pub struct $name:ident;
    ) => {
        $(#[$outer])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Cow<'static, str>);

        impl $name {
            /// Build a tag from any string.
            pub fn new(tag: impl Into<Cow<'static, str>>) -> Self {
                Self(tag.into())
            }

            /// The tag as written in message tables.
            pub fn as_str(&self) -> &str {
                self.0.as_ref()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl From<&'static str> for $name {
            fn from(value: &'static str) -> Self {
                Self(Cow::Borrowed(value))
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                Self(Cow::Owned(value))
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                self.as_str()
            }
        }
    };
}

define_tag! {
    /// Failure category, e.g. `cannot-delete` or `not-found`.
    pub struct FailureKind;
}

define_tag! {
    /// Disambiguates failures within one [`FailureKind`], e.g.
    /// `failed-single-delete` versus `failed-bulk-delete`.
    pub struct SubCode;
}

impl FailureKind {
    /// Deleting an entity was rejected.
    pub const CANNOT_DELETE: Self = Self(Cow::Borrowed("cannot-delete"));
    /// Changing an entity's status was rejected.
    pub const CANNOT_TOGGLE_STATUS: Self = Self(Cow::Borrowed("cannot-toggle-status"));
    /// The target entity does not exist.
    pub const NOT_FOUND: Self = Self(Cow::Borrowed("not-found"));
    /// Input failed validation.
    pub const VALIDATION: Self = Self(Cow::Borrowed("validation"));
    /// A failure no mapping recognised.
    pub const UNKNOWN: Self = Self(Cow::Borrowed("unknown"));
}

impl SubCode {
    /// Deleting a single entity failed.
    pub const FAILED_SINGLE_DELETE: Self = Self(Cow::Borrowed("failed-single-delete"));
    /// Deleting an entity as part of a bulk selection failed.
    pub const FAILED_BULK_DELETE: Self = Self(Cow::Borrowed("failed-bulk-delete"));
    /// Updating the status of a bulk selection failed.
    pub const FAILED_BULK_STATUS_UPDATE: Self = Self(Cow::Borrowed("failed-bulk-status-update"));
}

/// A business-rule rejection raised while a command handler ran.
///
/// ## Invariants
/// - Every value resolves to a user message: either through its `kind`
///   (and `sub_code`) in a message table, or through the table fallback.
///
/// # Examples
/// ```
/// use backoffice::domain::{DomainFailure, FailureKind, SubCode};
///
/// let failure = DomainFailure::new(FailureKind::CANNOT_DELETE)
///     .with_sub_code(SubCode::FAILED_SINGLE_DELETE)
///     .with_context("storeId", "7");
/// assert_eq!(failure.to_string(), "cannot-delete (failed-single-delete)");
/// assert_eq!(failure.context_value("storeId"), Some("7"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DomainFailure {
    kind: FailureKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    sub_code: Option<SubCode>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    context: BTreeMap<String, String>,
}

impl DomainFailure {
    /// Failure of the given kind with no sub-code and empty context.
    pub fn new(kind: FailureKind) -> Self {
        Self {
            kind,
            sub_code: None,
            context: BTreeMap::new(),
        }
    }

    /// `cannot-delete` with the given sub-code.
    pub fn cannot_delete(sub_code: SubCode) -> Self {
        Self::new(FailureKind::CANNOT_DELETE).with_sub_code(sub_code)
    }

    /// `cannot-toggle-status`.
    pub fn cannot_toggle_status() -> Self {
        Self::new(FailureKind::CANNOT_TOGGLE_STATUS)
    }

    /// `not-found`.
    pub fn not_found() -> Self {
        Self::new(FailureKind::NOT_FOUND)
    }

    /// `unknown`, used when nothing recognised the underlying error.
    pub fn unknown() -> Self {
        Self::new(FailureKind::UNKNOWN)
    }

    /// Attach or replace the sub-code.
    pub fn with_sub_code(mut self, sub_code: SubCode) -> Self {
        self.sub_code = Some(sub_code);
        self
    }

    /// Attach a context entry, replacing any previous value for `key`.
    pub fn with_context(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.context.insert(key.into(), value.into());
        self
    }

    /// Failure category.
    pub fn kind(&self) -> &FailureKind {
        &self.kind
    }

    /// Optional sub-code.
    pub fn sub_code(&self) -> Option<&SubCode> {
        self.sub_code.as_ref()
    }

    /// Structured context for logs.
    pub fn context(&self) -> &BTreeMap<String, String> {
        &self.context
    }

    /// Look up a single context value.
    pub fn context_value(&self, key: &str) -> Option<&str> {
        self.context.get(key).map(String::as_str)
    }
}

impl fmt::Display for DomainFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.sub_code {
            Some(sub_code) => write!(f, "{} ({sub_code})", self.kind),
            None => write!(f, "{}", self.kind),
        }
    }
}

impl std::error::Error for DomainFailure {}

/// Input rejected before any command was dispatched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationFailure {
    /// A bulk action was submitted with nothing selected.
    #[error("no entities were selected")]
    EmptySelection,
    /// A submitted identifier is not a positive integer.
    #[error("`{value}` is not a valid entity identifier")]
    InvalidIdentifier {
        /// The raw value as submitted.
        value: String,
    },
    /// Page numbers start at 1.
    #[error("page must be at least 1, got {page}")]
    InvalidPage {
        /// The submitted page number.
        page: u32,
    },
    /// Page size is zero or above the configured maximum.
    #[error("page size must be between 1 and {max}, got {page_size}")]
    InvalidPageSize {
        /// The submitted page size.
        page_size: u32,
        /// Largest accepted page size.
        max: u32,
    },
    /// Sort direction is neither `asc` nor `desc`.
    #[error("`{value}` is not a sort direction")]
    InvalidSortDirection {
        /// The raw value as submitted.
        value: String,
    },
}

impl ValidationFailure {
    /// Stable reason tag, also used as the sub-code when converted into a
    /// [`DomainFailure`].
    pub const fn reason(&self) -> &'static str {
        match self {
            Self::EmptySelection => "empty-selection",
            Self::InvalidIdentifier { .. } => "invalid-identifier",
            Self::InvalidPage { .. } => "invalid-page",
            Self::InvalidPageSize { .. } => "invalid-page-size",
            Self::InvalidSortDirection { .. } => "invalid-sort-direction",
        }
    }

    /// The offending raw value, when there is one.
    pub fn value(&self) -> Option<String> {
        match self {
            Self::EmptySelection => None,
            Self::InvalidIdentifier { value } | Self::InvalidSortDirection { value } => {
                Some(value.clone())
            }
            Self::InvalidPage { page } => Some(page.to_string()),
            Self::InvalidPageSize { page_size, .. } => Some(page_size.to_string()),
        }
    }
}

impl From<ValidationFailure> for DomainFailure {
    fn from(value: ValidationFailure) -> Self {
        let failure =
            Self::new(FailureKind::VALIDATION).with_sub_code(SubCode::new(value.reason()));
        match value.value() {
            Some(raw) => failure.with_context("value", raw),
            None => failure,
        }
    }
}

/// The command bus is mis-wired.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigurationError {
    /// A command was dispatched with no handler registered for its type.
    #[error("no handler registered for command `{command}`")]
    MissingHandler {
        /// Name of the command type.
        command: &'static str,
    },
    /// Startup validation found commands without handlers.
    #[error("no handlers registered for commands: {}", .commands.join(", "))]
    MissingHandlers {
        /// Names of every unregistered command type.
        commands: Vec<&'static str>,
    },
    /// A second handler was registered for the same command type.
    #[error("a handler for command `{command}` is already registered")]
    DuplicateHandler {
        /// Name of the command type.
        command: &'static str,
    },
}
