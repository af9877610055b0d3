//! Commands, their handlers and type keys.

use std::any::TypeId;
use std::fmt;

use async_trait::async_trait;

/// An immutable description of one intended mutation.
///
/// Each command type is routed to exactly one [`CommandHandler`]. Commands
/// are consumed by dispatch.
pub trait Command: fmt::Debug + Send + Sync + 'static {
    /// Stable name used in logs and configuration errors.
    const NAME: &'static str;

    /// Value produced when the command succeeds.
    type Output: Send + 'static;
}

/// Error type handlers return; normalised into a
/// [`DomainFailure`](crate::domain::DomainFailure) by the command bus.
pub type HandlerError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Logic bound to one command type.
#[async_trait]
pub trait CommandHandler<C>: Send + Sync
where
    C: Command,
{
    /// Perform the mutation described by `command`.
    ///
    /// Return a boxed [`DomainFailure`](crate::domain::DomainFailure) for
    /// business-rule rejections; any other error is classified by the
    /// bus's failure mappers.
    async fn handle(&self, command: C) -> Result<C::Output, HandlerError>;
}

/// Names a command type, e.g. for startup validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CommandKey {
    type_id: TypeId,
    name: &'static str,
}

impl CommandKey {
    /// Key for command type `C`.
    pub fn of<C: Command>() -> Self {
        Self {
            type_id: TypeId::of::<C>(),
            name: C::NAME,
        }
    }

    /// Command name.
    pub const fn name(&self) -> &'static str {
        self.name
    }

    pub(crate) const fn type_id(&self) -> TypeId {
        self.type_id
    }
}

impl fmt::Display for CommandKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}
