use std::panic::AssertUnwindSafe;

use actor::{Actor, SupervisionStrategy};
use actor_ref::ActorRef;
use futures::FutureExt;
use mailbox::{bounded_mailbox, MailboxReceiver};

pub mod actor;
pub mod actor_ref;
pub mod handler;
pub mod mailbox;

/// Mailbox size used by [`run`].
pub const DEFAULT_MAILBOX_CAPACITY: usize = 32;

/// Creates and runs an actor. If the actor panics, it is either restared, resumed
/// or stoped acording to the behavior specified by `Actor::on_fail()`.
pub fn run<A, F>(actor_factory: F) -> ActorRef<A>
where
    A: Actor,
    F: 'static + Send + Fn() -> A,
{
    run_with_capacity(DEFAULT_MAILBOX_CAPACITY, actor_factory)
}

/// Like [`run`], with a mailbox holding up to `capacity` pending messages.
/// Senders wait while the mailbox is full.
pub fn run_with_capacity<A, F>(capacity: usize, actor_factory: F) -> ActorRef<A>
where
    A: Actor,
    F: 'static + Send + Fn() -> A,
{
    let (tx, mut rx) = bounded_mailbox(capacity);
    let mut actor = actor_factory();
    let actor_ref = ActorRef::new(tx);

    // run actor
    tokio::spawn(async move {
        while let Some(mut message) = rx.recv().await {
            // handle message
            let result = AssertUnwindSafe(message.handle(&mut actor))
                .catch_unwind()
                .await;
            // handler paniced?
            if let Err(why) = result {
                log::error!("actor paniced: {:?}", why);
                match actor.on_fail(why) {
                    SupervisionStrategy::Restart => {
                        actor = actor_factory();
                    }
                    SupervisionStrategy::Resume => {}
                    SupervisionStrategy::Stop => {
                        break;
                    }
                };
            }
        }
        log::debug!("actor stopped");
    });

    actor_ref
}

#[cfg(test)]
mod tests {
    use std::any::Any;

    use async_trait::async_trait;

    use super::*;
    use crate::handler::{Handler, Message};

    struct Increment(i64);

    impl Message for Increment {
        type Response = ();
    }

    struct GetValue;

    impl Message for GetValue {
        type Response = i64;
    }

    struct Explode;

    impl Message for Explode {
        type Response = ();
    }

    struct Counter {
        count: i64,
        strategy: SupervisionStrategy,
    }

    impl Actor for Counter {
        fn on_fail(&mut self, _: Box<dyn Any + Send>) -> SupervisionStrategy {
            self.strategy
        }
    }

    #[async_trait]
    impl Handler<Increment> for Counter {
        async fn handle(&mut self, message: Increment) {
            self.count += message.0;
        }
    }

    #[async_trait]
    impl Handler<GetValue> for Counter {
        async fn handle(&mut self, _: GetValue) -> i64 {
            self.count
        }
    }

    #[async_trait]
    impl Handler<Explode> for Counter {
        async fn handle(&mut self, _: Explode) {
            panic!("boom");
        }
    }

    fn counter(strategy: SupervisionStrategy) -> ActorRef<Counter> {
        run(move || Counter { count: 0, strategy })
    }

    #[tokio::test]
    async fn messages_are_handled_in_order() {
        let actor_ref = counter(SupervisionStrategy::Resume);
        actor_ref.tell(Increment(1)).await.unwrap();
        actor_ref.tell(Increment(5)).await.unwrap();
        actor_ref.tell(Increment(-2)).await.unwrap();
        assert_eq!(actor_ref.ask(GetValue).await.unwrap(), 4);
    }

    #[tokio::test]
    async fn resume_keeps_state_after_panic() {
        let actor_ref = counter(SupervisionStrategy::Resume);
        actor_ref.tell(Increment(3)).await.unwrap();
        assert!(actor_ref.ask(Explode).await.is_err());
        assert_eq!(actor_ref.ask(GetValue).await.unwrap(), 3);
    }

    #[tokio::test]
    async fn restart_resets_state_after_panic() {
        let actor_ref = counter(SupervisionStrategy::Restart);
        actor_ref.tell(Increment(3)).await.unwrap();
        assert!(actor_ref.ask(Explode).await.is_err());
        assert_eq!(actor_ref.ask(GetValue).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn stop_closes_the_mailbox() {
        let actor_ref = counter(SupervisionStrategy::Stop);
        assert!(actor_ref.ask(Explode).await.is_err());
        // the actor task may still be shutting down; wait for the mailbox to close
        let mut result = actor_ref.tell(Increment(1)).await;
        for _ in 0..100 {
            if result.is_err() {
                break;
            }
            tokio::task::yield_now().await;
            result = actor_ref.tell(Increment(1)).await;
        }
        assert!(result.is_err());
    }
}
