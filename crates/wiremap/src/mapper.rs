//! Object mapper: `parse`, `serialize`, `merge` and `wire_clone` over whole
//! models.

use std::sync::Arc;

use serde_json::{Map, Value};

use crate::access::AsModel;
use crate::class::FieldDecl;
use crate::equal::slot_equal;
use crate::error::MapError;
use crate::model::Model;
use crate::slot::Slot;
use crate::transform::{
    apply_during_parse, resolve_deserialize_transform, resolve_serialize_transform, Transform,
};

impl Model {
    /// Assigns every recognised entry of a wire object.
    ///
    /// A key is first tried as a field name carrying a deserialize transform,
    /// then as a wire key. Unknown keys are logged and skipped.
    pub fn parse(&mut self, wire: &Map<String, Value>) -> &mut Self {
        for (key, raw) in wire {
            self.parse_entry(key, raw);
        }
        self
    }

    pub fn parse_value(&mut self, wire: &Value) -> Result<&mut Self, MapError> {
        match wire {
            Value::Object(map) => Ok(self.parse(map)),
            _ => Err(MapError::NotAnObject),
        }
    }

    pub fn parse_str(&mut self, text: &str) -> Result<&mut Self, MapError> {
        let wire: Value = serde_json::from_str(text)?;
        self.parse_value(&wire)
    }

    fn parse_entry(&mut self, key: &str, raw: &Value) {
        let class = Arc::clone(self.class());
        let resolved = class
            .field(key)
            .and_then(|decl| resolve_deserialize_transform(decl).map(|t| (decl, Some(t))))
            .or_else(|| {
                class
                    .field_for_key(key)
                    .map(|decl| (decl, resolve_deserialize_transform(decl)))
            });
        let Some((decl, transform)) = resolved else {
            tracing::warn!(class = class.name(), key, "unknown wire key, skipping");
            return;
        };
        if decl.is_excluded() {
            tracing::debug!(class = class.name(), key, "excluded field on the wire, skipping");
            return;
        }
        let split_arrays = transform.map_or(true, Transform::splits_arrays);
        if let Some(slot) = apply_during_parse(self, decl.name(), raw, transform, split_arrays) {
            self.put(decl, slot);
        }
    }

    /// Serializes the fields that differ from `reference`, plus required ones.
    ///
    /// Wrapped models are unwrapped first. Fails only when a list field and
    /// its reference list differ in length.
    pub fn serialize(
        &self,
        reference: Option<&dyn AsModel>,
    ) -> Result<Map<String, Value>, MapError> {
        self.serialize_against(reference.map(|r| r.as_model()))
    }

    /// Serializes against no reference.
    pub fn to_value(&self) -> Result<Value, MapError> {
        self.serialize_against(None).map(Value::Object)
    }

    pub fn to_json_string(&self) -> Result<String, MapError> {
        Ok(serde_json::to_string(&self.to_value()?)?)
    }

    fn serialize_against(&self, reference: Option<&Model>) -> Result<Map<String, Value>, MapError> {
        let mut out = Map::new();
        for (decl, value) in self.values() {
            if decl.is_excluded() {
                continue;
            }
            let reference_value = reference.and_then(|r| r.get(decl.name()));
            let transform = resolve_serialize_transform(decl);
            let required = decl.required().evaluate(self, reference);
            let wire = match value {
                Slot::List(items) if transform.map_or(true, Transform::splits_arrays) => {
                    self.serialize_list(decl, items, reference_value, required, transform)?
                }
                _ => self.serialize_value(value, reference_value, required, transform)?,
            };
            match wire {
                Some(Value::Null) | None => {}
                Some(wire) => {
                    out.insert(decl.key().to_string(), wire);
                }
            }
        }
        Ok(out)
    }

    fn serialize_list(
        &self,
        decl: &FieldDecl,
        items: &[Slot],
        reference: Option<&Slot>,
        required: bool,
        transform: Option<&Transform>,
    ) -> Result<Option<Value>, MapError> {
        let references = match reference {
            Some(Slot::List(refs)) => {
                if refs.len() != items.len() {
                    return Err(MapError::ArrayLengthMismatch {
                        field: decl.name().to_string(),
                        len: items.len(),
                        reference_len: refs.len(),
                    });
                }
                Some(refs)
            }
            _ => None,
        };
        let mut out = Vec::with_capacity(items.len());
        for (i, item) in items.iter().enumerate() {
            let item_reference = references.and_then(|refs| refs.get(i));
            match self.serialize_value(item, item_reference, required, transform)? {
                Some(Value::Null) | None => {}
                Some(wire) => out.push(wire),
            }
        }
        Ok(if out.is_empty() {
            None
        } else {
            Some(Value::Array(out))
        })
    }

    fn serialize_value(
        &self,
        value: &Slot,
        reference: Option<&Slot>,
        required: bool,
        transform: Option<&Transform>,
    ) -> Result<Option<Value>, MapError> {
        if let Slot::Object(nested) = value {
            let nested_reference = reference.and_then(Slot::as_model);
            let wire = nested.serialize_against(nested_reference)?;
            if nested.is_empty_serialization(&wire, nested_reference) {
                tracing::debug!(
                    class = nested.class().name(),
                    "nested model carries no required content, omitting"
                );
                return Ok(None);
            }
            return Ok(Some(Value::Object(wire)));
        }
        if let Some(reference) = reference {
            if !required && slot_equal(value, reference) {
                return Ok(None);
            }
        }
        match self.options().applicable(transform) {
            Some(t) => t.apply(value.clone(), self).to_wire().map(Some),
            None => value.to_wire().map(Some),
        }
    }

    /// True when every key of `wire` maps to a non-required field.
    fn is_empty_serialization(&self, wire: &Map<String, Value>, reference: Option<&Model>) -> bool {
        wire.keys().all(|key| match self.class().field_for_key(key) {
            Some(decl) => !decl.required().evaluate(self, reference),
            None => true,
        })
    }

    /// Shallow overwrite from another model's present fields. No transforms.
    pub fn merge(&mut self, partial: &Model) -> &mut Self {
        self.merge_fields(
            partial
                .values()
                .map(|(decl, slot)| (decl.name(), slot.clone())),
        )
    }

    /// Shallow overwrite from `(field, value)` pairs. Pairs naming undeclared
    /// or excluded fields are ignored.
    pub fn merge_fields<I, K>(&mut self, partial: I) -> &mut Self
    where
        I: IntoIterator<Item = (K, Slot)>,
        K: AsRef<str>,
    {
        let class = Arc::clone(self.class());
        for (name, slot) in partial {
            match class.field(name.as_ref()) {
                Some(decl) if !decl.is_excluded() => self.put(decl, slot),
                _ => {
                    tracing::debug!(
                        class = class.name(),
                        field = name.as_ref(),
                        "not mergeable, skipping"
                    );
                }
            }
        }
        self
    }

    /// An independent copy produced through the wire contract: a new model
    /// with the same class and options, parsed from `serialize(None)`.
    pub fn wire_clone(&self) -> Result<Model, MapError> {
        let wire = self.serialize_against(None)?;
        let mut clone = Model::new(Arc::clone(self.class()), self.options().clone());
        clone.parse(&wire);
        Ok(clone)
    }
}

impl serde::Serialize for Model {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let wire = self
            .serialize_against(None)
            .map_err(<S::Error as serde::ser::Error>::custom)?;
        serde::Serialize::serialize(&wire, serializer)
    }
}
