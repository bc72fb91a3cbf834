//! Transparent access layer.
//!
//! [`Wrapped`] stands in for a model at call sites that want to observe or
//! intercept field access. Nested models (and lists whose first element is a
//! model) read through a wrapper come back wrapped with the same
//! [`Interceptor`]; writes pass through to the underlying model unless the
//! interceptor handles them.

use std::borrow::BorrowMut;
use std::sync::Arc;

use serde_json::{Map, Value};

use crate::error::MapError;
use crate::model::Model;
use crate::slot::Slot;

/// Anything that can stand in for a model: the model itself or a wrapper.
pub trait AsModel {
    /// The underlying model. Idempotent: a plain model returns itself.
    fn as_model(&self) -> &Model;

    fn is_wrapper(&self) -> bool {
        false
    }
}

impl AsModel for Model {
    fn as_model(&self) -> &Model {
        self
    }
}

/// Outcome of [`Interceptor::write`].
#[derive(Debug)]
pub enum Write {
    /// The interceptor consumed the write.
    Handled,
    /// Continue with the default write, possibly with a replaced value.
    Forward(Slot),
}

/// Read/write hooks consulted before the default wrapper behavior.
pub trait Interceptor: Send + Sync {
    /// `Some` short-circuits the read.
    fn read(&self, _target: &Model, _field: &str) -> Option<Slot> {
        None
    }

    fn write(&self, _target: &mut Model, _field: &str, value: Slot) -> Write {
        Write::Forward(value)
    }
}

/// A pass-through wrapper over an owned model or a `&mut Model`.
pub struct Wrapped<T> {
    target: T,
    interceptor: Option<Arc<dyn Interceptor>>,
}

/// Result of reading a field through a wrapper.
pub enum Access<'a> {
    Object(Wrapped<&'a mut Model>),
    List(Vec<Access<'a>>),
    Value(&'a Slot),
    Intercepted(Slot),
}

impl<'a> Access<'a> {
    pub fn is_wrapper(&self) -> bool {
        matches!(self, Access::Object(_))
    }

    pub fn into_object(self) -> Option<Wrapped<&'a mut Model>> {
        match self {
            Access::Object(w) => Some(w),
            _ => None,
        }
    }

    pub fn into_list(self) -> Option<Vec<Access<'a>>> {
        match self {
            Access::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_slot(&self) -> Option<&Slot> {
        match self {
            Access::Value(slot) => Some(slot),
            Access::Intercepted(slot) => Some(slot),
            _ => None,
        }
    }
}

impl<T: BorrowMut<Model>> Wrapped<T> {
    pub fn new(target: T) -> Self {
        Self {
            target,
            interceptor: None,
        }
    }

    pub fn with_interceptor(target: T, interceptor: Arc<dyn Interceptor>) -> Self {
        Self {
            target,
            interceptor: Some(interceptor),
        }
    }

    pub fn unwrap(&self) -> &Model {
        self.target.borrow()
    }

    pub fn unwrap_mut(&mut self) -> &mut Model {
        self.target.borrow_mut()
    }

    pub fn into_inner(self) -> T {
        self.target
    }

    pub fn interceptor(&self) -> Option<&Arc<dyn Interceptor>> {
        self.interceptor.as_ref()
    }

    pub fn get(&mut self, field: &str) -> Option<Access<'_>> {
        let interceptor = self.interceptor.clone();
        let target: &mut Model = self.target.borrow_mut();
        if let Some(hooks) = &interceptor {
            if let Some(slot) = hooks.read(target, field) {
                return Some(Access::Intercepted(slot));
            }
        }
        let slot = target.get_mut(field)?;
        Some(wrap_slot(slot, interceptor))
    }

    pub fn set(&mut self, field: &str, value: impl Into<Slot>) -> Result<(), MapError> {
        let mut value = value.into();
        let target: &mut Model = self.target.borrow_mut();
        if let Some(hooks) = &self.interceptor {
            match hooks.write(target, field, value) {
                Write::Handled => return Ok(()),
                Write::Forward(forwarded) => value = forwarded,
            }
        }
        target.set(field, value)?;
        Ok(())
    }

    pub fn serialize(
        &self,
        reference: Option<&dyn AsModel>,
    ) -> Result<Map<String, Value>, MapError> {
        self.unwrap().serialize(reference)
    }

    /// Clones the underlying model through the wire and wraps the result with
    /// the same interceptor.
    pub fn wire_clone(&self) -> Result<Wrapped<Model>, MapError> {
        Ok(Wrapped {
            target: self.unwrap().wire_clone()?,
            interceptor: self.interceptor.clone(),
        })
    }
}

impl<T: BorrowMut<Model>> AsModel for Wrapped<T> {
    fn as_model(&self) -> &Model {
        self.unwrap()
    }

    fn is_wrapper(&self) -> bool {
        true
    }
}

fn wrap_slot(slot: &mut Slot, interceptor: Option<Arc<dyn Interceptor>>) -> Access<'_> {
    let wraps = match &*slot {
        Slot::Object(_) => true,
        Slot::List(items) => matches!(items.first(), Some(Slot::Object(_))),
        Slot::Value(_) => false,
    };
    if !wraps {
        return Access::Value(slot);
    }
    match slot {
        Slot::Object(model) => Access::Object(Wrapped {
            target: model,
            interceptor,
        }),
        Slot::List(items) => Access::List(
            items
                .iter_mut()
                .map(|item| wrap_slot(item, interceptor.clone()))
                .collect(),
        ),
        other => Access::Value(other),
    }
}

impl Model {
    pub fn wrap(self) -> Wrapped<Model> {
        Wrapped::new(self)
    }

    pub fn wrap_mut(&mut self) -> Wrapped<&mut Model> {
        Wrapped::new(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::class::{Class, Kind};
    use crate::options::Options;
    use serde_json::json;

    fn light() -> Model {
        let color = Class::builder("Color")
            .field("hue", Kind::Number)
            .declare_key("hue", "h")
            .build()
            .unwrap();
        let class = Class::builder("Light")
            .field("label", Kind::String)
            .object("color", &color)
            .build()
            .unwrap();
        let mut m = Model::new(class, Options::default());
        m.parse(json!({"label": "desk", "color": {"h": 120}}).as_object().unwrap());
        m
    }

    #[test]
    fn unwrap_returns_the_same_instance() {
        let mut m = light();
        let addr: *const Model = &m;
        let w = m.wrap_mut();
        assert!(w.is_wrapper());
        assert!(std::ptr::eq(w.unwrap(), addr));
        assert!(std::ptr::eq(w.as_model(), addr));
        assert!(!light().is_wrapper());
    }

    #[test]
    fn plain_reads_pass_through() {
        let mut w = light().wrap();
        let label = w.get("label").unwrap();
        assert!(!label.is_wrapper());
        assert_eq!(label.as_slot().and_then(Slot::as_str), Some("desk"));
        assert!(w.get("missing").is_none());
    }

    #[test]
    fn nested_writes_reach_the_target() {
        let mut m = light();
        {
            let mut w = m.wrap_mut();
            let mut color = w.get("color").unwrap().into_object().unwrap();
            color.set("hue", 240).unwrap();
        }
        assert_eq!(m.get_model("color").unwrap().get_i64("hue"), Some(240));
    }

    #[test]
    fn wrapped_serialize_and_clone() {
        let w = light().wrap();
        let copy = w.wire_clone().unwrap();
        assert!(copy.is_wrapper());
        assert_eq!(
            Value::Object(copy.serialize(Some(&w)).unwrap()),
            json!({})
        );
        assert_eq!(
            Value::Object(w.serialize(None).unwrap()),
            json!({"label": "desk"})
        );
    }

    #[test]
    fn slots_wrap_by_shape() {
        let item = Class::builder("Zone").field("n", Kind::Number).build().unwrap();
        let class = Class::builder("Strip")
            .field("levels", Kind::List)
            .field("empty", Kind::List)
            .list_of("zones", &item)
            .build()
            .unwrap();
        let mut m = Model::new(class, Options::default());
        m.parse(
            json!({"levels": [1, 2], "empty": [], "zones": [{"n": 1}, {"n": 2}]})
                .as_object()
                .unwrap(),
        );
        let mut w = m.wrap_mut();

        let levels = w.get("levels").unwrap();
        assert!(!levels.is_wrapper());
        assert_eq!(levels.as_slot(), Some(&Slot::from(vec![1, 2])));

        let empty = w.get("empty").unwrap();
        assert_eq!(empty.as_slot().and_then(Slot::as_list).map(<[Slot]>::len), Some(0));

        let zones = w.get("zones").unwrap().into_list().unwrap();
        assert_eq!(zones.len(), 2);
        assert!(zones.iter().all(Access::is_wrapper));
    }

    #[test]
    fn unwrap_mut_and_into_inner() {
        let mut w = light().wrap();
        w.unwrap_mut().set("label", "hall").unwrap();
        let m = w.into_inner();
        assert_eq!(m.get_str("label"), Some("hall"));
    }
}
