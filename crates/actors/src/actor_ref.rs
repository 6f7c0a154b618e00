use tokio::sync::oneshot;

use crate::{
    actor::{Actor, ActorError},
    handler::{ActorMessage, Handler, Message},
    mailbox::{BoundedMailbox, Mailbox},
};

pub type ActorResult<A, T> = Result<T, ActorError<A, BoundedMailbox<A>>>;

pub struct ActorRef<A: Actor> {
    sender: BoundedMailbox<A>,
}

impl<A: Actor> Clone for ActorRef<A> {
    fn clone(&self) -> Self {
        Self {
            sender: self.sender.clone(),
        }
    }
}

impl<A: Actor> ActorRef<A> {
    pub(crate) fn new(sender: BoundedMailbox<A>) -> Self {
        Self { sender }
    }

    /// Delivers a message without waiting for it to be handled.
    pub async fn tell<M>(&self, msg: M) -> ActorResult<A, ()>
    where
        M: Message,
        A: Handler<M>,
    {
        let message = ActorMessage::<M, A>::new(msg, None);
        self.sender
            .send(message)
            .await
            .map_err(ActorError::SendError)
    }

    /// Delivers a message and waits for the handler's response.
    pub async fn ask<M>(&self, msg: M) -> ActorResult<A, M::Response>
    where
        M: Message,
        A: Handler<M>,
    {
        let (response_tx, response_rx) = oneshot::channel();
        let message = ActorMessage::<M, A>::new(msg, Some(response_tx));
        self.sender
            .send(message)
            .await
            .map_err(ActorError::SendError)?;
        response_rx.await.map_err(ActorError::ReceiveAnswerError)
    }
}
