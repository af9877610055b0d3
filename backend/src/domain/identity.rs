//! Entity identifiers and bulk-selection identity sets.
//!
//! A bulk action arrives as a flat form payload: one field holding every
//! selected row id as a string. [`IdentitySet::extract`] turns that field
//! into a validated, deduplicated, order-preserving list of [`EntityId`]s,
//! rejecting the whole batch on the first bad value.

use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::num::NonZeroU64;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::ValidationFailure;

/// Positive integer identifier of a stored entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(NonZeroU64);

impl EntityId {
    /// Wrap a raw identifier, returning `None` for zero.
    pub const fn new(raw: u64) -> Option<Self> {
        match NonZeroU64::new(raw) {
            Some(id) => Some(Self(id)),
            None => None,
        }
    }

    /// The raw integer value.
    pub const fn get(self) -> u64 {
        self.0.get()
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for EntityId {
    type Err = ValidationFailure;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        raw.parse::<u64>()
            .ok()
            .and_then(Self::new)
            .ok_or_else(|| ValidationFailure::InvalidIdentifier {
                value: raw.to_owned(),
            })
    }
}

/// Raw bulk-action payload: field name to the list of submitted strings.
///
/// # Examples
/// ```
/// use backoffice::domain::BulkPayload;
///
/// let payload = BulkPayload::from_pairs([("store_bulk[]", "3"), ("store_bulk[]", "1")]);
/// assert_eq!(payload.values("store_bulk"), ["3", "1"]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BulkPayload(BTreeMap<String, Vec<String>>);

impl BulkPayload {
    /// Build from an already grouped mapping.
    pub fn new(fields: BTreeMap<String, Vec<String>>) -> Self {
        Self(fields)
    }

    /// Group repeated form pairs by field name.
    ///
    /// A trailing `[]` on a field name is stripped, so `store_bulk[]` and
    /// `store_bulk` land in the same list.
    pub fn from_pairs<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut fields: BTreeMap<String, Vec<String>> = BTreeMap::new();
        for (key, value) in pairs {
            let raw_key = key.as_ref();
            let name = raw_key.strip_suffix("[]").unwrap_or(raw_key);
            fields.entry(name.to_owned()).or_default().push(value.into());
        }
        Self(fields)
    }

    /// Raw values submitted under `field`; empty when the field is absent.
    pub fn values(&self, field: &str) -> &[String] {
        self.0.get(field).map_or(&[][..], Vec::as_slice)
    }
}

/// Non-empty, deduplicated, ordered set of entity identifiers.
///
/// ## Invariants
/// - Holds at least one identifier.
/// - Holds no duplicates; iteration follows first-seen order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct IdentitySet(Vec<EntityId>);

impl IdentitySet {
    /// Parse the identifiers submitted under `field`.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationFailure::InvalidIdentifier`] citing the first
    /// value that is not a positive integer (the whole batch is rejected),
    /// or [`ValidationFailure::EmptySelection`] when nothing was submitted.
    ///
    /// # Examples
    /// ```
    /// use backoffice::domain::{BulkPayload, EntityId, IdentitySet};
    ///
    /// let payload = BulkPayload::from_pairs([
    ///     ("store_bulk", "3"),
    ///     ("store_bulk", "1"),
    ///     ("store_bulk", "3"),
    ///     ("store_bulk", "2"),
    /// ]);
    /// let ids = IdentitySet::extract(&payload, "store_bulk").expect("valid selection");
    /// let raw: Vec<u64> = ids.iter().map(EntityId::get).collect();
    /// assert_eq!(raw, [3, 1, 2]);
    /// ```
    pub fn extract(payload: &BulkPayload, field: &str) -> Result<Self, ValidationFailure> {
        let parsed = payload
            .values(field)
            .iter()
            .map(|raw| raw.parse::<EntityId>())
            .collect::<Result<Vec<_>, _>>()?;
        Self::try_from_ids(parsed)
    }

    /// Deduplicate already parsed identifiers, keeping first-seen order.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationFailure::EmptySelection`] when `ids` is empty.
    pub fn try_from_ids(ids: impl IntoIterator<Item = EntityId>) -> Result<Self, ValidationFailure> {
        let mut seen = HashSet::new();
        let unique: Vec<EntityId> = ids.into_iter().filter(|id| seen.insert(*id)).collect();
        if unique.is_empty() {
            return Err(ValidationFailure::EmptySelection);
        }
        Ok(Self(unique))
    }

    /// Identifiers in first-seen order.
    pub fn iter(&self) -> impl Iterator<Item = EntityId> + '_ {
        self.0.iter().copied()
    }

    /// Identifiers as a slice.
    pub fn as_slice(&self) -> &[EntityId] {
        self.0.as_slice()
    }

    /// Number of identifiers; never zero.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always `false`; kept for API symmetry with collections.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Whether `id` is part of the selection.
    pub fn contains(&self, id: EntityId) -> bool {
        self.0.contains(&id)
    }
}

impl<'a> IntoIterator for &'a IdentitySet {
    type Item = EntityId;
    type IntoIter = std::iter::Copied<std::slice::Iter<'a, EntityId>>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter().copied()
    }
}

/// Free-function form of [`IdentitySet::extract`].
///
/// # Errors
///
/// See [`IdentitySet::extract`].
pub fn extract(payload: &BulkPayload, field: &str) -> Result<IdentitySet, ValidationFailure> {
    IdentitySet::extract(payload, field)
}
