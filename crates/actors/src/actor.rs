use core::fmt;
use std::any::Any;
use std::error::Error;

use tokio::sync::oneshot;

use crate::mailbox::Mailbox;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SupervisionStrategy {
    /// Replace the actor's state with a fresh instance from its factory.
    Restart,
    /// Keep the current state and continue with the next message.
    Resume,
    Stop,
}

pub trait Actor: Send + Sync + 'static {
    /// Called when a handler on the actor panics. The return value represents the
    /// supervision strategy used to handle the panic.
    /// NOTE: If this method panics, the actor can not recover from the panic.
    #[allow(unused_variables)]
    fn on_fail(&mut self, error: Box<dyn Any + Send>) -> SupervisionStrategy {
        SupervisionStrategy::Restart
    }
}

pub enum ActorError<A, M>
where
    A: Actor,
    M: Mailbox<A>,
{
    /// The actor has stopped and its mailbox is closed.
    SendError(M::Error),
    /// The actor dropped the request without answering, usually because the
    /// handler panicked.
    ReceiveAnswerError(oneshot::error::RecvError),
}

impl<A, M> fmt::Debug for ActorError<A, M>
where
    A: Actor,
    M: Mailbox<A>,
{
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::SendError(why) => write!(f, "SendError: {:?}", why),
            Self::ReceiveAnswerError(why) => write!(f, "ReceiveError: {:?}", why),
        }
    }
}

impl<A, M> fmt::Display for ActorError<A, M>
where
    A: Actor,
    M: Mailbox<A>,
{
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::SendError(_) => write!(f, "actor mailbox is closed"),
            Self::ReceiveAnswerError(_) => write!(f, "actor did not answer"),
        }
    }
}

impl<A, M> Error for ActorError<A, M>
where
    A: Actor,
    M: Mailbox<A>,
{
}
