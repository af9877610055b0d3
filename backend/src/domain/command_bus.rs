//! Routes commands to their single registered handler.
//!
//! The handler registry is built once with [`CommandBusBuilder`] and is
//! read-only afterwards, so a shared `CommandBus` serves concurrent
//! dispatches without locking. Every handler error or panic is turned into
//! a [`DomainFailure`] at the dispatch boundary; only a missing handler
//! surfaces as a [`ConfigurationError`].

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures_util::FutureExt;
use thiserror::Error;
use tracing::{Instrument, debug, debug_span, error, field, warn};

use super::{
    Command, CommandHandler, CommandKey, ConfigurationError, DomainFailure, HandlerError, TraceId,
};

/// Why a dispatch produced no output.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DispatchError {
    /// The handler ran and rejected the command.
    #[error("command failed: {0}")]
    Failed(#[from] DomainFailure),
    /// The bus is mis-wired; not recoverable per request.
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),
}

impl DispatchError {
    /// The domain failure, when the handler ran.
    pub fn failure(&self) -> Option<&DomainFailure> {
        match self {
            Self::Failed(failure) => Some(failure),
            Self::Configuration(_) => None,
        }
    }

    /// Split into the recoverable failure or the configuration error.
    ///
    /// # Errors
    ///
    /// Returns the [`ConfigurationError`] when the bus is mis-wired.
    pub fn into_failure(self) -> Result<DomainFailure, ConfigurationError> {
        match self {
            Self::Failed(failure) => Ok(failure),
            Self::Configuration(err) => Err(err),
        }
    }
}

/// Outcome of one dispatch.
pub type CommandResult<T> = Result<T, DispatchError>;

type FailureMapper =
    Box<dyn Fn(&(dyn std::error::Error + Send + Sync + 'static)) -> Option<DomainFailure> + Send + Sync>;

struct Registration {
    name: &'static str,
    handler: Box<dyn Any + Send + Sync>,
}

/// Collects handler registrations and failure mappers.
#[derive(Default)]
pub struct CommandBusBuilder {
    registrations: HashMap<TypeId, Registration>,
    mappers: Vec<FailureMapper>,
}

impl CommandBusBuilder {
    /// Register `handler` as the handler for `C`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError::DuplicateHandler`] if `C` already has
    /// a handler.
    pub fn register<C, H>(mut self, handler: H) -> Result<Self, ConfigurationError>
    where
        C: Command,
        H: CommandHandler<C> + 'static,
    {
        let key = TypeId::of::<C>();
        if self.registrations.contains_key(&key) {
            return Err(ConfigurationError::DuplicateHandler { command: C::NAME });
        }
        let handler: Arc<dyn CommandHandler<C>> = Arc::new(handler);
        self.registrations.insert(
            key,
            Registration {
                name: C::NAME,
                handler: Box::new(handler),
            },
        );
        Ok(self)
    }

    /// Classify handler errors of type `E` with `map`.
    ///
    /// Mappers are tried in registration order after the bus has checked
    /// for a [`DomainFailure`].
    pub fn map_failure<E>(mut self, map: fn(&E) -> DomainFailure) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        self.mappers.push(Box::new(
            move |err: &(dyn std::error::Error + Send + Sync + 'static)| {
                err.downcast_ref::<E>().map(map)
            },
        ));
        self
    }

    /// Freeze the registry.
    pub fn build(self) -> CommandBus {
        CommandBus {
            registrations: self.registrations,
            mappers: self.mappers,
        }
    }
}

/// Immutable command dispatcher.
pub struct CommandBus {
    registrations: HashMap<TypeId, Registration>,
    mappers: Vec<FailureMapper>,
}

impl CommandBus {
    /// Start building a bus.
    pub fn builder() -> CommandBusBuilder {
        CommandBusBuilder::default()
    }

    /// Whether `C` has a handler.
    pub fn is_registered<C: Command>(&self) -> bool {
        self.registrations.contains_key(&TypeId::of::<C>())
    }

    /// Names of every registered command, sorted.
    pub fn registered_commands(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.registrations.values().map(|reg| reg.name).collect();
        names.sort_unstable();
        names
    }

    /// Startup check that every command in `required` has a handler.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError::MissingHandlers`] naming every
    /// command without a handler, once each, in `required` order.
    pub fn verify(&self, required: &[CommandKey]) -> Result<(), ConfigurationError> {
        let mut missing: Vec<&'static str> = Vec::new();
        for key in required {
            if !self.registrations.contains_key(&key.type_id()) && !missing.contains(&key.name()) {
                missing.push(key.name());
            }
        }
        if missing.is_empty() {
            return Ok(());
        }
        error!(commands = ?missing, "command handlers missing");
        Err(ConfigurationError::MissingHandlers { commands: missing })
    }

    /// Run `command` through its handler.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError::Failed`] when the handler returns an error
    /// or panics, and [`DispatchError::Configuration`] when `C` has no
    /// handler.
    pub async fn dispatch<C: Command>(&self, command: C) -> CommandResult<C::Output> {
        let Some(handler) = self.handler::<C>() else {
            error!(command = C::NAME, "no handler registered");
            return Err(ConfigurationError::MissingHandler { command: C::NAME }.into());
        };

        let span = debug_span!("command", command = C::NAME, trace_id = field::Empty);
        if let Some(trace_id) = TraceId::current() {
            span.record("trace_id", field::display(trace_id));
        }

        async move {
            debug!(?command, "dispatching");
            match AssertUnwindSafe(handler.handle(command)).catch_unwind().await {
                Ok(Ok(output)) => {
                    debug!("command succeeded");
                    Ok(output)
                }
                Ok(Err(err)) => {
                    let failure = self.normalise(err);
                    warn!(%failure, context = ?failure.context(), "command failed");
                    Err(DispatchError::Failed(failure))
                }
                Err(payload) => {
                    let failure = stamp(
                        DomainFailure::unknown().with_context("detail", panic_message(&*payload)),
                    );
                    warn!(%failure, context = ?failure.context(), "command handler panicked");
                    Err(DispatchError::Failed(failure))
                }
            }
        }
        .instrument(span)
        .await
    }

    fn handler<C: Command>(&self) -> Option<&Arc<dyn CommandHandler<C>>> {
        self.registrations
            .get(&TypeId::of::<C>())
            .and_then(|reg| reg.handler.downcast_ref::<Arc<dyn CommandHandler<C>>>())
    }

    fn normalise(&self, err: HandlerError) -> DomainFailure {
        let failure = match err.downcast::<DomainFailure>() {
            Ok(failure) => *failure,
            Err(err) => self
                .mappers
                .iter()
                .find_map(|map| map(err.as_ref()))
                .unwrap_or_else(|| DomainFailure::unknown().with_context("detail", err.to_string())),
        };
        stamp(failure)
    }
}

fn stamp(failure: DomainFailure) -> DomainFailure {
    match TraceId::current() {
        Some(trace_id) => failure.with_context("traceId", trace_id.to_string()),
        None => failure,
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    payload
        .downcast_ref::<&str>()
        .map(|msg| (*msg).to_owned())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "handler panicked".to_owned())
}

#[cfg(test)]
mod tests;
