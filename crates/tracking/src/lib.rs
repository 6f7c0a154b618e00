use std::{error::Error, fmt};

use actors::{
    actor::{Actor, ActorError},
    mailbox::Mailbox,
};

pub mod collector;
pub mod server;
pub mod store;
pub mod vessels;

#[derive(Debug)]
pub enum TrackingError {
    /// The vessel cache actor stopped or dropped the request.
    CacheUnavailable(String),
}

impl fmt::Display for TrackingError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::CacheUnavailable(why) => write!(f, "Vessel cache unavailable: {}", why),
        }
    }
}

impl Error for TrackingError {}

impl<A, M> From<ActorError<A, M>> for TrackingError
where
    A: Actor,
    M: Mailbox<A>,
{
    fn from(why: ActorError<A, M>) -> Self {
        Self::CacheUnavailable(why.to_string())
    }
}

pub type TrackingResult<O> = Result<O, TrackingError>;
