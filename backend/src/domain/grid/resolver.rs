//! Builds the [`FilterSpec`] for a listing request.
//!
//! Precedence: parameters on the request (persisted as the user's new
//! last-used filters), then the user's persisted filters, then defaults.
//! Preference storage problems never fail a listing.

use std::sync::Arc;

use tracing::warn;

use crate::domain::ports::FilterPreferencesRepository;
use crate::domain::{EntityId, ValidationFailure};

use super::{FilterParams, FilterSpec, GridDefaults};

/// Resolves request and persisted filters into a [`FilterSpec`].
pub struct FilterSpecResolver<P> {
    preferences: Arc<P>,
    defaults: GridDefaults,
}

impl<P> FilterSpecResolver<P>
where
    P: FilterPreferencesRepository,
{
    /// Build a resolver over `preferences` using `defaults` for missing
    /// page sizes.
    pub fn new(preferences: Arc<P>, defaults: GridDefaults) -> Self {
        Self {
            preferences,
            defaults,
        }
    }

    /// Page size bounds in effect.
    pub fn defaults(&self) -> GridDefaults {
        self.defaults
    }

    /// Resolve the filters `owner` sees on `grid_id`.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationFailure`] when the request parameters are
    /// invalid. Invalid persisted parameters are discarded in favour of
    /// defaults instead.
    pub async fn resolve(
        &self,
        owner: EntityId,
        grid_id: &str,
        request: FilterParams,
    ) -> Result<FilterSpec, ValidationFailure> {
        if !request.is_empty() {
            let spec = request.into_spec(&self.defaults)?;
            if let Err(err) = self
                .preferences
                .save(owner, grid_id, &spec.to_params())
                .await
            {
                warn!(%owner, grid = grid_id, error = %err, "failed to persist grid filters");
            }
            return Ok(spec);
        }

        match self.preferences.load(owner, grid_id).await {
            Ok(Some(saved)) => match saved.into_spec(&self.defaults) {
                Ok(spec) => return Ok(spec),
                Err(err) => {
                    warn!(%owner, grid = grid_id, error = %err, "discarding invalid saved filters");
                }
            },
            Ok(None) => {}
            Err(err) => {
                warn!(%owner, grid = grid_id, error = %err, "failed to load saved grid filters");
            }
        }

        FilterParams::default().into_spec(&self.defaults)
    }
}
