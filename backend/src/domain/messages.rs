//! Failure-to-message resolution.
//!
//! A [`MessageTable`] maps each [`FailureKind`] either to one message or to
//! a nested mapping keyed by [`SubCode`]. The nested form lets one kind
//! carry different texts for, say, a single delete and a bulk delete.
//! Resolution never fails: anything the table does not cover resolves to
//! the table's fallback text.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use super::{DomainFailure, FailureKind, SubCode};

/// Text returned when a failure is not covered by the table.
pub const DEFAULT_FALLBACK_MESSAGE: &str = "An unexpected error occurred.";

/// One message table entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MessageEntry {
    /// Message used for every failure of the kind.
    Message(String),
    /// Message chosen by the failure's sub-code.
    BySubCode(BTreeMap<SubCode, String>),
}

/// Errors raised while loading a message table.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MessageTableError {
    /// The file could not be read.
    #[error("failed to read message table at '{path}': {message}")]
    Io {
        /// Path to the message table file.
        path: PathBuf,
        /// Description of the I/O error.
        message: String,
    },
    /// The JSON does not follow the message-table shape.
    #[error("invalid message table JSON: {message}")]
    Parse {
        /// Description of the parse error.
        message: String,
    },
}

/// Declarative mapping from failures to user-facing messages.
///
/// # Examples
/// ```
/// use backoffice::domain::{DomainFailure, FailureKind, MessageTable, SubCode};
///
/// let table = MessageTable::builder()
///     .message(FailureKind::CANNOT_TOGGLE_STATUS, "Could not update the status.")
///     .sub_code_message(FailureKind::CANNOT_DELETE, SubCode::FAILED_SINGLE_DELETE, "Could not delete.")
///     .sub_code_message(FailureKind::CANNOT_DELETE, SubCode::FAILED_BULK_DELETE, "Could not delete the selection.")
///     .build();
///
/// let bulk = DomainFailure::cannot_delete(SubCode::FAILED_BULK_DELETE);
/// assert_eq!(table.resolve(&bulk), "Could not delete the selection.");
/// assert_eq!(table.resolve(&DomainFailure::unknown()), "An unexpected error occurred.");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageTable {
    entries: BTreeMap<FailureKind, MessageEntry>,
    fallback: String,
}

impl Default for MessageTable {
    fn default() -> Self {
        Self {
            entries: BTreeMap::new(),
            fallback: DEFAULT_FALLBACK_MESSAGE.to_owned(),
        }
    }
}

impl MessageTable {
    /// Start an empty table with the default fallback.
    pub fn builder() -> MessageTableBuilder {
        MessageTableBuilder::default()
    }

    /// Parse a table in the
    /// `{"kind": "message", "kind": {"sub-code": "message"}}` shape.
    ///
    /// # Errors
    ///
    /// Returns [`MessageTableError::Parse`] when the JSON is malformed or an
    /// entry is neither a string nor a map of strings.
    pub fn from_json(json: &str) -> Result<Self, MessageTableError> {
        let entries: BTreeMap<FailureKind, MessageEntry> =
            serde_json::from_str(json).map_err(|err| MessageTableError::Parse {
                message: err.to_string(),
            })?;
        Ok(Self {
            entries,
            ..Self::default()
        })
    }

    /// Read and parse a table from disk.
    ///
    /// # Errors
    ///
    /// Returns [`MessageTableError::Io`] when the file cannot be read and
    /// [`MessageTableError::Parse`] when its content is invalid.
    pub fn from_json_file(path: &Path) -> Result<Self, MessageTableError> {
        let json = fs::read_to_string(path).map_err(|err| MessageTableError::Io {
            path: path.to_path_buf(),
            message: err.to_string(),
        })?;
        Self::from_json(&json)
    }

    /// Replace the fallback text.
    pub fn with_fallback(mut self, fallback: impl Into<String>) -> Self {
        self.fallback = fallback.into();
        self
    }

    /// Layer `overrides` on top of this table. Entries replace whole kinds;
    /// the fallback is kept from `self`.
    pub fn merged_with(mut self, overrides: Self) -> Self {
        self.entries.extend(overrides.entries);
        self
    }

    /// Resolve the message for `failure`.
    ///
    /// Looks up the kind; a flat entry answers directly, a nested entry is
    /// looked up by sub-code. Anything else yields the fallback.
    pub fn resolve(&self, failure: &DomainFailure) -> &str {
        let found = match self.entries.get(failure.kind()) {
            Some(MessageEntry::Message(message)) => Some(message),
            Some(MessageEntry::BySubCode(by_code)) => {
                failure.sub_code().and_then(|code| by_code.get(code))
            }
            None => None,
        };
        found.map_or_else(
            || {
                debug!(%failure, "no message mapped for failure; using fallback");
                self.fallback.as_str()
            },
            String::as_str,
        )
    }

    /// The text returned for unmapped failures.
    pub fn fallback(&self) -> &str {
        self.fallback.as_str()
    }

    /// Entry for `kind`, if any.
    pub fn entry(&self, kind: &FailureKind) -> Option<&MessageEntry> {
        self.entries.get(kind)
    }
}

/// Incremental [`MessageTable`] construction.
#[derive(Debug, Default)]
pub struct MessageTableBuilder {
    table: MessageTable,
}

impl MessageTableBuilder {
    /// Map every failure of `kind` to `message`.
    pub fn message(mut self, kind: FailureKind, message: impl Into<String>) -> Self {
        self.table
            .entries
            .insert(kind, MessageEntry::Message(message.into()));
        self
    }

    /// Map failures of `kind` carrying `sub_code` to `message`.
    ///
    /// A flat entry previously set for `kind` is replaced by a nested one.
    pub fn sub_code_message(
        mut self,
        kind: FailureKind,
        sub_code: SubCode,
        message: impl Into<String>,
    ) -> Self {
        let entry = self
            .table
            .entries
            .entry(kind)
            .or_insert_with(|| MessageEntry::BySubCode(BTreeMap::new()));
        if let MessageEntry::BySubCode(by_code) = entry {
            by_code.insert(sub_code, message.into());
        } else {
            *entry = MessageEntry::BySubCode(BTreeMap::from([(sub_code, message.into())]));
        }
        self
    }

    /// Replace the fallback text.
    pub fn fallback(mut self, fallback: impl Into<String>) -> Self {
        self.table.fallback = fallback.into();
        self
    }

    /// Finish the table.
    pub fn build(self) -> MessageTable {
        self.table
    }
}

/// Free-function form of [`MessageTable::resolve`].
pub fn resolve<'a>(failure: &DomainFailure, table: &'a MessageTable) -> &'a str {
    table.resolve(failure)
}

#[cfg(test)]
mod tests;
