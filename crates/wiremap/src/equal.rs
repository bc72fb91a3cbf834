//! Deep equality used by differential encoding.
//!
//! Numbers compare by value across integer and float representations, since
//! a value parsed as `1` and one assigned as `1.0` are the same on the wire.

use serde_json::{Number, Value};

use crate::model::Model;
use crate::slot::Slot;

/// Deep equality for wire values.
///
/// ```
/// use wiremap::wire_equal;
/// use serde_json::json;
///
/// assert!(wire_equal(&json!({"h": 1, "s": [0.5]}), &json!({"s": [0.5], "h": 1.0})));
/// assert!(!wire_equal(&json!(1), &json!(true)));
/// ```
pub fn wire_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(a), Value::Number(b)) => number_equal(a, b),
        (Value::Array(a), Value::Array(b)) => {
            if a.len() != b.len() {
                return false;
            }
            a.iter().zip(b).all(|(a, b)| wire_equal(a, b))
        }
        (Value::Object(a), Value::Object(b)) => {
            if a.len() != b.len() {
                return false;
            }
            for (key, val_a) in a {
                match b.get(key) {
                    Some(val_b) => {
                        if !wire_equal(val_a, val_b) {
                            return false;
                        }
                    }
                    None => return false,
                }
            }
            true
        }
        // Null, bool and string compare directly; mixed types never match.
        _ => a == b,
    }
}

fn number_equal(a: &Number, b: &Number) -> bool {
    if a.is_f64() || b.is_f64() {
        match (a.as_f64(), b.as_f64()) {
            (Some(x), Some(y)) => x == y,
            _ => false,
        }
    } else {
        a == b
    }
}

/// Deep equality for field values. Nested models are equal when they share a
/// class and every field compares equal.
pub fn slot_equal(a: &Slot, b: &Slot) -> bool {
    match (a, b) {
        (Slot::Value(a), Slot::Value(b)) => wire_equal(a, b),
        (Slot::List(a), Slot::List(b)) => {
            a.len() == b.len() && a.iter().zip(b).all(|(a, b)| slot_equal(a, b))
        }
        (Slot::Object(a), Slot::Object(b)) => model_equal(a, b),
        _ => false,
    }
}

fn model_equal(a: &Model, b: &Model) -> bool {
    if a.class().name() != b.class().name() {
        return false;
    }
    a.class().fields().all(|decl| match (a.get(decl.name()), b.get(decl.name())) {
        (None, None) => true,
        (Some(x), Some(y)) => slot_equal(x, y),
        _ => false,
    })
}
