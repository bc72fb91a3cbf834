use std::sync::Arc;

use serde_json::{Map, Value};

use crate::access::AsModel;
use crate::class::Class;
use crate::error::MapError;
use crate::model::Model;
use crate::options::Options;

/// A typed domain façade over a [`Model`] of one class.
///
/// Implementors supply the class and the model accessors; typed getters and
/// setters live on the implementing type.
pub trait Entity: Sized {
    fn class() -> Arc<Class>;

    fn from_model(model: Model) -> Self;

    fn model(&self) -> &Model;

    fn model_mut(&mut self) -> &mut Model;

    fn new(options: Options) -> Self {
        Self::from_model(Model::new(Self::class(), options))
    }

    fn from_wire(wire: &Map<String, Value>, options: Options) -> Self {
        let mut model = Model::new(Self::class(), options);
        model.parse(wire);
        Self::from_model(model)
    }

    fn to_wire(&self, reference: Option<&Self>) -> Result<Map<String, Value>, MapError> {
        self.model()
            .serialize(reference.map(|r| r.model() as &dyn AsModel))
    }

    fn wire_clone(&self) -> Result<Self, MapError> {
        self.model().wire_clone().map(Self::from_model)
    }
}
