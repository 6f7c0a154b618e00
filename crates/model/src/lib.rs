use std::fmt::Debug;

use schemars::JsonSchema;
use serde::Serialize;
pub use serde_with;
use utility::id::{HasId, Id};

pub mod celestial;
pub mod flight;
pub mod geojson;
pub mod satellite;
pub mod vessel;
pub mod volcano;

pub trait ExampleData {
    fn example_data() -> Self;
}

#[derive(Debug, Clone, Serialize, JsonSchema)]
pub struct WithId<V>
where
    V: HasId,
    V::IdType: Serialize + Debug + Clone + JsonSchema,
{
    pub id: Id<V>,
    #[serde(flatten)]
    pub content: V,
}

impl<V> WithId<V>
where
    V: HasId,
    V::IdType: Serialize + Debug + Clone + JsonSchema,
{
    pub fn new(id: Id<V>, content: V) -> Self {
        Self { id, content }
    }
}
