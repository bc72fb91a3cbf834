//! In-memory field values.

use serde_json::Value;

use crate::error::MapError;
use crate::model::Model;

/// The value held by one model field: a wire primitive (or raw structure), a
/// nested model, or an ordered list of either.
#[derive(Debug, Clone)]
pub enum Slot {
    Value(Value),
    Object(Model),
    List(Vec<Slot>),
}

impl Slot {
    pub fn null() -> Self {
        Slot::Value(Value::Null)
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Slot::Value(Value::Null))
    }

    pub fn as_value(&self) -> Option<&Value> {
        match self {
            Slot::Value(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        self.as_value()?.as_bool()
    }

    pub fn as_f64(&self) -> Option<f64> {
        self.as_value()?.as_f64()
    }

    pub fn as_i64(&self) -> Option<i64> {
        self.as_value()?.as_i64()
    }

    pub fn as_str(&self) -> Option<&str> {
        self.as_value()?.as_str()
    }

    pub fn as_model(&self) -> Option<&Model> {
        match self {
            Slot::Object(m) => Some(m),
            _ => None,
        }
    }

    pub fn as_model_mut(&mut self) -> Option<&mut Model> {
        match self {
            Slot::Object(m) => Some(m),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Slot]> {
        match self {
            Slot::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_list_mut(&mut self) -> Option<&mut Vec<Slot>> {
        match self {
            Slot::List(items) => Some(items),
            _ => None,
        }
    }

    /// Lowers the slot to its wire form. Nested models serialize against no
    /// reference.
    pub fn to_wire(&self) -> Result<Value, MapError> {
        match self {
            Slot::Value(v) => Ok(v.clone()),
            Slot::Object(m) => m.serialize(None).map(Value::Object),
            Slot::List(items) => items
                .iter()
                .map(Slot::to_wire)
                .collect::<Result<Vec<_>, _>>()
                .map(Value::Array),
        }
    }
}

impl PartialEq for Slot {
    fn eq(&self, other: &Self) -> bool {
        crate::equal::slot_equal(self, other)
    }
}

impl From<Value> for Slot {
    fn from(v: Value) -> Self {
        Slot::Value(v)
    }
}

impl From<bool> for Slot {
    fn from(v: bool) -> Self {
        Slot::Value(Value::Bool(v))
    }
}

impl From<i64> for Slot {
    fn from(v: i64) -> Self {
        Slot::Value(Value::from(v))
    }
}

impl From<u64> for Slot {
    fn from(v: u64) -> Self {
        Slot::Value(Value::from(v))
    }
}

impl From<i32> for Slot {
    fn from(v: i32) -> Self {
        Slot::Value(Value::from(v))
    }
}

impl From<f64> for Slot {
    fn from(v: f64) -> Self {
        Slot::Value(Value::from(v))
    }
}

impl From<&str> for Slot {
    fn from(v: &str) -> Self {
        Slot::Value(Value::from(v))
    }
}

impl From<String> for Slot {
    fn from(v: String) -> Self {
        Slot::Value(Value::String(v))
    }
}

impl From<Model> for Slot {
    fn from(m: Model) -> Self {
        Slot::Object(m)
    }
}

impl<T: Into<Slot>> From<Vec<T>> for Slot {
    fn from(items: Vec<T>) -> Self {
        Slot::List(items.into_iter().map(Into::into).collect())
    }
}
