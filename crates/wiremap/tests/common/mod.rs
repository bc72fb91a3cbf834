//! Sample device classes shared by the integration tests.

#![allow(dead_code)]

use std::sync::{Arc, OnceLock};

use serde_json::{json, Map, Value};
use wiremap::{Class, Direction, Entity, Kind, Model, Options, Required, Transform};

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

pub fn wire(value: Value) -> Map<String, Value> {
    value.as_object().cloned().expect("fixture must be an object")
}

pub fn device_class() -> Arc<Class> {
    static CLASS: OnceLock<Arc<Class>> = OnceLock::new();
    CLASS
        .get_or_init(|| {
            Class::builder("Device")
                .field("id", Kind::String)
                .declare_key("id", "mac")
                .declare_required("id", true)
                .field("label", Kind::String)
                .declare_key("label", "name")
                .build()
                .expect("device declarations are consistent")
        })
        .clone()
}

/// No required fields: omitted from parents whenever it serializes.
pub fn color_class() -> Arc<Class> {
    static CLASS: OnceLock<Arc<Class>> = OnceLock::new();
    CLASS
        .get_or_init(|| {
            Class::builder("Color")
                .field("hue", Kind::Number)
                .declare_key("hue", "h")
                .field("saturation", Kind::Number)
                .declare_key("saturation", "s")
                .field("kelvin", Kind::Number)
                .declare_key("kelvin", "k")
                .build()
                .expect("color declarations are consistent")
        })
        .clone()
}

pub fn scene_class() -> Arc<Class> {
    static CLASS: OnceLock<Arc<Class>> = OnceLock::new();
    CLASS
        .get_or_init(|| {
            Class::builder("Scene")
                .field("id", Kind::Number)
                .declare_key("id", "sid")
                .declare_required("id", Required::Always)
                .field("speed", Kind::Number)
                .declare_key("speed", "sp")
                .build()
                .expect("scene declarations are consistent")
        })
        .clone()
}

/// Brightness is a fraction in memory and 0..=255 on the wire.
fn brightness_out() -> Transform {
    Transform::value(|v, _| match v.as_f64() {
        Some(fraction) => json!((fraction * 255.0).round() as i64),
        None => v.clone(),
    })
}

fn brightness_in() -> Transform {
    Transform::value(|v, _| match v.as_f64() {
        Some(level) => json!(level / 255.0),
        None => v.clone(),
    })
}

pub fn light_class() -> Arc<Class> {
    static CLASS: OnceLock<Arc<Class>> = OnceLock::new();
    CLASS
        .get_or_init(|| {
            Class::builder("Light")
                .extends(&device_class())
                .field("power", Kind::Bool)
                .declare_key("power", "on")
                .field("brightness", Kind::Number)
                .declare_key("brightness", "bri")
                .declare_transform("brightness", Direction::Serialize, brightness_out())
                .declare_transform("brightness", Direction::Deserialize, brightness_in())
                .field("transition", Kind::Number)
                .declare_key("transition", "tt")
                .declare_required("transition", Required::when(|m, _| m.has("brightness")))
                .object("color", &color_class())
                .declare_key("color", "col")
                .object("scene", &scene_class())
                .declare_key("scene", "scn")
                .field("zones", Kind::List)
                .declare_key("zones", "z")
                .field("extra", Kind::Any)
                .declare_key("extra", "x")
                .field("_session", Kind::String)
                .build()
                .expect("light declarations are consistent")
        })
        .clone()
}

pub fn group_class() -> Arc<Class> {
    static CLASS: OnceLock<Arc<Class>> = OnceLock::new();
    CLASS
        .get_or_init(|| {
            Class::builder("Group")
                .extends(&device_class())
                .list_of("lights", &light_class())
                .build()
                .expect("group declarations are consistent")
        })
        .clone()
}

pub fn light(options: Options) -> Model {
    Model::new(light_class(), options)
}

pub fn color(hue: i64) -> Model {
    let mut color = Model::new(color_class(), Options::default());
    color.set("hue", hue).expect("hue is declared");
    color
}

pub fn scene(id: i64, speed: i64) -> Model {
    let mut scene = Model::new(scene_class(), Options::default());
    scene
        .set("id", id)
        .and_then(|s| s.set("speed", speed))
        .expect("scene fields are declared");
    scene
}

/// Typed façade over a light model.
#[derive(Debug, Clone)]
pub struct Light(Model);

impl Entity for Light {
    fn class() -> Arc<Class> {
        light_class()
    }

    fn from_model(model: Model) -> Self {
        Light(model)
    }

    fn model(&self) -> &Model {
        &self.0
    }

    fn model_mut(&mut self) -> &mut Model {
        &mut self.0
    }
}

impl Light {
    pub fn id(&self) -> Option<&str> {
        self.0.get_str("id")
    }

    pub fn power(&self) -> Option<bool> {
        self.0.get_bool("power")
    }

    pub fn set_power(&mut self, on: bool) -> &mut Self {
        self.0.set("power", on).expect("power is declared");
        self
    }

    pub fn brightness(&self) -> Option<f64> {
        self.0.get_f64("brightness")
    }

    pub fn set_brightness(&mut self, fraction: f64) -> &mut Self {
        self.0.set("brightness", fraction).expect("brightness is declared");
        self
    }
}
