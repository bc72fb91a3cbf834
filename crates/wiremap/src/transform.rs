//! Transform engine: transform resolution and the parse-side dispatch over
//! arrays, nested structures and primitives.

use std::sync::{Arc, OnceLock};

use serde_json::Value;

use crate::class::{Class, FieldDecl, Kind};
use crate::model::Model;
use crate::slot::Slot;

/// A conversion `(value, owner) -> value`.
pub type TransformFn = Arc<dyn Fn(Slot, &Model) -> Slot + Send + Sync>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Serialize,
    Deserialize,
}

/// A directional field conversion.
///
/// `never_skip` transforms run even when the owner's options request raw
/// values. With `split_arrays` (the default) list values are transformed
/// element by element; otherwise the whole list is passed at once.
#[derive(Clone)]
pub struct Transform {
    func: TransformFn,
    never_skip: bool,
    split_arrays: bool,
}

impl std::fmt::Debug for Transform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Transform")
            .field("never_skip", &self.never_skip)
            .field("split_arrays", &self.split_arrays)
            .finish()
    }
}

impl Transform {
    pub fn new<F>(func: F) -> Self
    where
        F: Fn(Slot, &Model) -> Slot + Send + Sync + 'static,
    {
        Self {
            func: Arc::new(func),
            never_skip: false,
            split_arrays: true,
        }
    }

    /// A transform over wire values.
    ///
    /// A whole list (see [`Transform::whole_arrays`]) reaches `func` as a wire
    /// array. Nested models pass through.
    pub fn value<F>(func: F) -> Self
    where
        F: Fn(&Value, &Model) -> Value + Send + Sync + 'static,
    {
        Self::new(move |slot, owner| match slot {
            Slot::Value(v) => Slot::Value(func(&v, owner)),
            Slot::List(_) => match slot.to_wire() {
                Ok(array) => Slot::Value(func(&array, owner)),
                Err(_) => slot,
            },
            other => other,
        })
    }

    /// Parses a wire object into a new model of `class`, inheriting the
    /// owner's options.
    pub fn nested(class: &Arc<Class>) -> Self {
        let class = Arc::clone(class);
        Self::new(move |slot, owner| match slot {
            Slot::Value(Value::Object(map)) => {
                let mut model = Model::new(Arc::clone(&class), owner.options().clone());
                model.parse(&map);
                Slot::Object(model)
            }
            other => other,
        })
    }

    pub fn never_skip(mut self) -> Self {
        self.never_skip = true;
        self
    }

    /// Passes list values to the transform whole.
    pub fn whole_arrays(mut self) -> Self {
        self.split_arrays = false;
        self
    }

    pub fn is_never_skip(&self) -> bool {
        self.never_skip
    }

    pub fn splits_arrays(&self) -> bool {
        self.split_arrays
    }

    pub fn apply(&self, value: Slot, owner: &Model) -> Slot {
        (self.func)(value, owner)
    }

    /// `true`/`false` to `1`/`0`.
    pub fn bool_serializer() -> Self {
        Self::value(|v, _| match v {
            Value::Bool(b) => Value::from(u8::from(*b)),
            other => other.clone(),
        })
        .never_skip()
    }

    /// `1`, `"true"`, `"on"` and `true` to `true`; anything else to `false`.
    pub fn bool_deserializer() -> Self {
        Self::value(|v, _| Value::Bool(truthy(v))).never_skip()
    }
}

fn truthy(v: &Value) -> bool {
    match v {
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64() == Some(1.0),
        Value::String(s) => s == "true" || s == "on",
        _ => false,
    }
}

fn default_transform(kind: Kind, direction: Direction) -> Option<&'static Transform> {
    static BOOL_SER: OnceLock<Transform> = OnceLock::new();
    static BOOL_DE: OnceLock<Transform> = OnceLock::new();
    match (kind, direction) {
        (Kind::Bool, Direction::Serialize) => {
            Some(BOOL_SER.get_or_init(Transform::bool_serializer))
        }
        (Kind::Bool, Direction::Deserialize) => {
            Some(BOOL_DE.get_or_init(Transform::bool_deserializer))
        }
        _ => None,
    }
}

/// The declared serialize transform, else the kind's default.
pub fn resolve_serialize_transform(decl: &FieldDecl) -> Option<&Transform> {
    decl.transform(Direction::Serialize)
        .or_else(|| default_transform(decl.kind(), Direction::Serialize))
}

/// The declared deserialize transform, else the kind's default.
pub fn resolve_deserialize_transform(decl: &FieldDecl) -> Option<&Transform> {
    decl.transform(Direction::Deserialize)
        .or_else(|| default_transform(decl.kind(), Direction::Deserialize))
}

/// Converts one raw wire value for `field` of `owner`.
///
/// Returns `None` when the value must be dropped: nested structures are never
/// assigned untransformed.
pub(crate) fn apply_during_parse(
    owner: &Model,
    field: &str,
    raw: &Value,
    transform: Option<&Transform>,
    split_arrays: bool,
) -> Option<Slot> {
    match raw {
        Value::Array(items) if split_arrays => Some(Slot::List(
            items
                .iter()
                .map(|item| {
                    apply_during_parse(owner, field, item, transform, split_arrays)
                        .unwrap_or_else(Slot::null)
                })
                .collect(),
        )),
        Value::Array(_) | Value::Object(_) => match transform {
            Some(t) => Some(t.apply(Slot::Value(raw.clone()), owner)),
            None => {
                tracing::warn!(
                    class = owner.class().name(),
                    field,
                    "no deserializer for nested structure, dropping field"
                );
                None
            }
        },
        _ => Some(match owner.options().applicable(transform) {
            Some(t) => t.apply(Slot::Value(raw.clone()), owner),
            None => Slot::Value(raw.clone()),
        }),
    }
}
