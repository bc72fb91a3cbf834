use std::sync::Arc;

use crate::class::{Class, FieldDecl};
use crate::error::MapError;
use crate::link::Link;
use crate::options::Options;
use crate::slot::Slot;

/// One instance of a domain [`Class`].
///
/// Holds a value per declared field (absent until assigned or parsed), the
/// serialization [`Options`], and an optional [`Link`] that never takes part
/// in mapping.
#[derive(Clone)]
pub struct Model {
    class: Arc<Class>,
    options: Options,
    values: Vec<Option<Slot>>,
    link: Option<Arc<dyn Link>>,
}

impl std::fmt::Debug for Model {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut s = f.debug_struct(self.class.name());
        for (decl, value) in self.values() {
            s.field(decl.name(), value);
        }
        s.field("linked", &self.link.is_some()).finish()
    }
}

impl Model {
    pub fn new(class: Arc<Class>, options: Options) -> Self {
        let values = vec![None; class.len()];
        Self {
            class,
            options,
            values,
            link: None,
        }
    }

    pub fn class(&self) -> &Arc<Class> {
        &self.class
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    pub fn options_mut(&mut self) -> &mut Options {
        &mut self.options
    }

    /// Present field values in declaration order.
    pub fn values(&self) -> impl Iterator<Item = (&FieldDecl, &Slot)> {
        self.class
            .fields()
            .zip(&self.values)
            .filter_map(|(decl, value)| value.as_ref().map(|v| (decl, v)))
    }

    pub fn has(&self, field: &str) -> bool {
        self.get(field).is_some()
    }

    pub fn get(&self, field: &str) -> Option<&Slot> {
        let decl = self.class.field(field)?;
        self.values[decl.index()].as_ref()
    }

    pub fn get_mut(&mut self, field: &str) -> Option<&mut Slot> {
        let index = self.class.field(field)?.index();
        self.values[index].as_mut()
    }

    pub fn get_bool(&self, field: &str) -> Option<bool> {
        self.get(field)?.as_bool()
    }

    pub fn get_f64(&self, field: &str) -> Option<f64> {
        self.get(field)?.as_f64()
    }

    pub fn get_i64(&self, field: &str) -> Option<i64> {
        self.get(field)?.as_i64()
    }

    pub fn get_str(&self, field: &str) -> Option<&str> {
        self.get(field)?.as_str()
    }

    pub fn get_model(&self, field: &str) -> Option<&Model> {
        self.get(field)?.as_model()
    }

    pub fn get_model_mut(&mut self, field: &str) -> Option<&mut Model> {
        self.get_mut(field)?.as_model_mut()
    }

    pub fn get_list(&self, field: &str) -> Option<&[Slot]> {
        self.get(field)?.as_list()
    }

    pub fn set(&mut self, field: &str, value: impl Into<Slot>) -> Result<&mut Self, MapError> {
        let Some(decl) = self.class.field(field) else {
            return Err(MapError::UnknownField {
                class: self.class.name().to_string(),
                field: field.to_string(),
            });
        };
        let index = decl.index();
        self.values[index] = Some(value.into());
        Ok(self)
    }

    /// Clears a field, returning its previous value.
    pub fn take(&mut self, field: &str) -> Option<Slot> {
        let index = self.class.field(field)?.index();
        self.values[index].take()
    }

    pub(crate) fn put(&mut self, decl: &FieldDecl, value: Slot) {
        self.values[decl.index()] = Some(value);
    }

    /// Associates a transport provider. The link is not serialized, parsed,
    /// merged or carried over by [`Model::wire_clone`].
    pub fn link(&mut self, provider: Arc<dyn Link>) -> &mut Self {
        self.link = Some(provider);
        self
    }

    pub fn linked(&self) -> Option<&Arc<dyn Link>> {
        self.link.as_ref()
    }

    pub fn unlink(&mut self) -> Option<Arc<dyn Link>> {
        self.link.take()
    }
}
