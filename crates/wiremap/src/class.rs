//! Field metadata registry: per-class descriptor tables.

use std::collections::HashMap;
use std::sync::Arc;

use indexmap::IndexMap;

use crate::error::ClassError;
use crate::model::Model;
use crate::transform::{Direction, Transform};

/// Static value kind of a field. Selects default transforms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Kind {
    #[default]
    Any,
    Bool,
    Number,
    String,
    Object,
    List,
}

/// Predicate deciding requiredness from `(instance, reference)`.
pub type RequiredFn = Arc<dyn Fn(&Model, Option<&Model>) -> bool + Send + Sync>;

/// Whether a field is emitted even when it equals its reference value.
#[derive(Clone, Default)]
pub enum Required {
    #[default]
    Never,
    Always,
    When(RequiredFn),
}

impl Required {
    pub fn when<F>(predicate: F) -> Self
    where
        F: Fn(&Model, Option<&Model>) -> bool + Send + Sync + 'static,
    {
        Required::When(Arc::new(predicate))
    }

    pub fn evaluate(&self, instance: &Model, reference: Option<&Model>) -> bool {
        match self {
            Required::Never => false,
            Required::Always => true,
            Required::When(predicate) => predicate(instance, reference),
        }
    }
}

impl From<bool> for Required {
    fn from(required: bool) -> Self {
        if required {
            Required::Always
        } else {
            Required::Never
        }
    }
}

impl std::fmt::Debug for Required {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Required::Never => f.write_str("Never"),
            Required::Always => f.write_str("Always"),
            Required::When(_) => f.write_str("When(..)"),
        }
    }
}

/// One field declaration.
#[derive(Debug, Clone)]
pub struct FieldDecl {
    name: String,
    key: String,
    kind: Kind,
    required: Required,
    serialize: Option<Transform>,
    deserialize: Option<Transform>,
    excluded: bool,
    index: usize,
}

impl FieldDecl {
    fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            key: name.to_string(),
            kind: Kind::Any,
            required: Required::Never,
            serialize: None,
            deserialize: None,
            // Private by convention.
            excluded: name.starts_with('_'),
            index: 0,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Wire key; the field name unless declared otherwise.
    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn kind(&self) -> Kind {
        self.kind
    }

    pub fn required(&self) -> &Required {
        &self.required
    }

    pub fn transform(&self, direction: Direction) -> Option<&Transform> {
        match direction {
            Direction::Serialize => self.serialize.as_ref(),
            Direction::Deserialize => self.deserialize.as_ref(),
        }
    }

    pub fn is_excluded(&self) -> bool {
        self.excluded
    }

    /// Position of the field in its class.
    pub fn index(&self) -> usize {
        self.index
    }
}

/// Result of [`Class::resolve_field_or_key`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolved<'a> {
    /// The token was a wire key; this is the field it maps to.
    Field(&'a str),
    /// The token was a field name; this is its wire key.
    Key(&'a str),
}

impl<'a> Resolved<'a> {
    pub fn as_str(&self) -> &'a str {
        match self {
            Resolved::Field(s) | Resolved::Key(s) => s,
        }
    }
}

/// An immutable descriptor table for one domain class, parent fields first.
#[derive(Debug)]
pub struct Class {
    name: String,
    parent: Option<Arc<Class>>,
    fields: IndexMap<String, FieldDecl>,
    keys: HashMap<String, usize>,
}

impl Class {
    pub fn builder(name: impl Into<String>) -> ClassBuilder {
        ClassBuilder::new(name)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn parent(&self) -> Option<&Arc<Class>> {
        self.parent.as_ref()
    }

    /// True if `other` is this class or one of its ancestors.
    pub fn is_subclass_of(&self, other: &Class) -> bool {
        if std::ptr::eq(self, other) {
            return true;
        }
        self.parent
            .as_ref()
            .is_some_and(|parent| parent.is_subclass_of(other))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Declared fields in order.
    pub fn fields(&self) -> impl Iterator<Item = &FieldDecl> {
        self.fields.values()
    }

    pub fn field(&self, name: &str) -> Option<&FieldDecl> {
        self.fields.get(name)
    }

    pub fn field_for_key(&self, key: &str) -> Option<&FieldDecl> {
        let index = *self.keys.get(key)?;
        self.fields.get_index(index).map(|(_, decl)| decl)
    }

    pub fn resolve_field_or_key(&self, token: &str) -> Option<Resolved<'_>> {
        if let Some(decl) = self.field_for_key(token) {
            return Some(Resolved::Field(decl.name()));
        }
        self.field(token).map(|decl| Resolved::Key(decl.key()))
    }

    /// Unknown fields are never required.
    pub fn is_required(&self, field: &str, instance: &Model, reference: Option<&Model>) -> bool {
        self.field(field)
            .is_some_and(|decl| decl.required.evaluate(instance, reference))
    }

    pub fn is_excluded(&self, field: &str) -> bool {
        self.field(field).is_some_and(FieldDecl::is_excluded)
    }
}

/// Collects field declarations for a [`Class`].
///
/// Declaring metadata for a field that was not declared with
/// [`ClassBuilder::field`] declares it with [`Kind::Any`].
pub struct ClassBuilder {
    name: String,
    parent: Option<Arc<Class>>,
    fields: IndexMap<String, FieldDecl>,
}

impl ClassBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            parent: None,
            fields: IndexMap::new(),
        }
    }

    /// Inherits `parent`'s declarations. Fields declared here override the
    /// parent's by name and keep the parent's position.
    pub fn extends(mut self, parent: &Arc<Class>) -> Self {
        let mut fields = parent.fields.clone();
        for (name, decl) in self.fields.drain(..) {
            fields.insert(name, decl);
        }
        self.fields = fields;
        self.parent = Some(Arc::clone(parent));
        self
    }

    fn decl(&mut self, name: &str) -> &mut FieldDecl {
        self.fields
            .entry(name.to_string())
            .or_insert_with(|| FieldDecl::new(name))
    }

    pub fn field(mut self, name: &str, kind: Kind) -> Self {
        self.decl(name).kind = kind;
        self
    }

    pub fn declare_key(mut self, field: &str, key: &str) -> Self {
        self.decl(field).key = key.to_string();
        self
    }

    pub fn declare_required(mut self, field: &str, required: impl Into<Required>) -> Self {
        self.decl(field).required = required.into();
        self
    }

    pub fn declare_transform(
        mut self,
        field: &str,
        direction: Direction,
        transform: Transform,
    ) -> Self {
        let decl = self.decl(field);
        match direction {
            Direction::Serialize => decl.serialize = Some(transform),
            Direction::Deserialize => decl.deserialize = Some(transform),
        }
        self
    }

    pub fn declare_excluded(mut self, field: &str) -> Self {
        self.decl(field).excluded = true;
        self
    }

    /// A nested-model field parsed into `class`.
    pub fn object(self, field: &str, class: &Arc<Class>) -> Self {
        self.field(field, Kind::Object)
            .declare_transform(field, Direction::Deserialize, Transform::nested(class))
    }

    /// A list field whose object elements are parsed into `class`.
    pub fn list_of(self, field: &str, class: &Arc<Class>) -> Self {
        self.field(field, Kind::List)
            .declare_transform(field, Direction::Deserialize, Transform::nested(class))
    }

    pub fn build(mut self) -> Result<Arc<Class>, ClassError> {
        let mut keys: HashMap<String, usize> = HashMap::with_capacity(self.fields.len());
        for (index, decl) in self.fields.values_mut().enumerate() {
            decl.index = index;
        }
        for (index, decl) in self.fields.values().enumerate() {
            if let Some(&first) = keys.get(decl.key()) {
                return Err(ClassError::DuplicateKey {
                    class: self.name.clone(),
                    key: decl.key().to_string(),
                    first: self.fields[first].name().to_string(),
                    second: decl.name().to_string(),
                });
            }
            if decl.key() != decl.name() && self.fields.contains_key(decl.key()) {
                return Err(ClassError::KeyShadowsField {
                    class: self.name.clone(),
                    key: decl.key().to_string(),
                    field: decl.name().to_string(),
                });
            }
            keys.insert(decl.key().to_string(), index);
        }
        Ok(Arc::new(Class {
            name: self.name,
            parent: self.parent,
            fields: self.fields,
            keys,
        }))
    }
}
