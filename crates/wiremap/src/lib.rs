//! Declarative mapping between typed device models and the sparse, key-based
//! wire documents of a lightweight IoT control protocol.
//!
//! A [`Class`] is a descriptor table: per field it holds the wire key, the
//! static [`Kind`], a [`Required`] rule, optional serialize/deserialize
//! [`Transform`]s and an exclusion flag. A [`Model`] is one instance of a class.
//!
//! - [`Model::parse`] converts a wire object into typed field values,
//!   recursing into nested objects and arrays through transforms.
//! - [`Model::serialize`] emits only the fields that differ from an optional
//!   reference model (unless required), recursing into nested models.
//! - [`Wrapped`] is the transparent access layer: nested models read through a
//!   wrapper come back wrapped, writes pass through an optional [`Interceptor`].
//!
//! ```
//! use wiremap::{Class, Kind, Model, Options};
//! use serde_json::json;
//!
//! let class = Class::builder("Light")
//!     .field("power", Kind::Bool)
//!     .declare_key("power", "on")
//!     .build()
//!     .unwrap();
//!
//! let mut light = Model::new(class, Options::default());
//! light.parse(json!({"on": "on"}).as_object().unwrap());
//! assert_eq!(light.get_bool("power"), Some(true));
//! assert_eq!(light.to_value().unwrap(), json!({"on": 1}));
//! ```

mod access;
mod class;
mod entity;
mod equal;
mod error;
mod link;
mod mapper;
mod model;
mod options;
mod slot;
mod transform;

pub use access::{Access, AsModel, Interceptor, Wrapped, Write};
pub use class::{Class, ClassBuilder, FieldDecl, Kind, Required, RequiredFn, Resolved};
pub use entity::Entity;
pub use equal::{slot_equal, wire_equal};
pub use error::{ClassError, MapError};
pub use link::Link;
pub use model::Model;
pub use options::Options;
pub use slot::Slot;
pub use transform::{
    resolve_deserialize_transform, resolve_serialize_transform, Direction, Transform,
    TransformFn,
};
