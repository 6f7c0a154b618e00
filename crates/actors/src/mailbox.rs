use std::fmt::Debug;

use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::{handler::MessageHandler, Actor};

#[async_trait]
pub trait Mailbox<A>
where
    A: Actor,
{
    type Error: Debug;

    async fn send<M>(&self, message: M) -> Result<(), Self::Error>
    where
        M: MessageHandler<A> + 'static;
}

#[async_trait]
pub trait MailboxReceiver<A>
where
    A: Actor,
{
    async fn recv(&mut self) -> Option<Box<dyn MessageHandler<A>>>;
}

pub struct BoundedMailbox<A>(mpsc::Sender<Box<dyn MessageHandler<A>>>);

// derived `Clone` would require `A: Clone`
impl<A> Clone for BoundedMailbox<A> {
    fn clone(&self) -> Self {
        Self(self.0.clone())
    }
}

/// Sending only fails once the receiving actor is gone; the rejected message
/// is not handed back.
#[derive(Debug, Clone, Copy)]
pub struct MailboxClosed;

#[async_trait]
impl<A> Mailbox<A> for BoundedMailbox<A>
where
    A: Actor,
{
    type Error = MailboxClosed;

    async fn send<M>(&self, message: M) -> Result<(), Self::Error>
    where
        M: MessageHandler<A> + 'static,
    {
        self.0
            .send(Box::new(message))
            .await
            .map_err(|_| MailboxClosed)
    }
}

pub struct BoundedMailboxReceiver<A>(mpsc::Receiver<Box<dyn MessageHandler<A>>>);

#[async_trait]
impl<A> MailboxReceiver<A> for BoundedMailboxReceiver<A>
where
    A: Actor,
{
    async fn recv(&mut self) -> Option<Box<dyn MessageHandler<A>>> {
        self.0.recv().await
    }
}

pub fn bounded_mailbox<A>(buffer: usize) -> (BoundedMailbox<A>, BoundedMailboxReceiver<A>)
where
    A: Actor,
{
    let (tx, rx) = mpsc::channel(buffer);
    (BoundedMailbox(tx), BoundedMailboxReceiver(rx))
}
