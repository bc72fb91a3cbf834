use serde_json::Value;

use crate::error::MapError;

/// Operation dispatch provided by a transport collaborator.
///
/// Models hold a link for higher-level convenience calls; the mapper itself
/// never touches it.
pub trait Link: Send + Sync {
    fn dispatch(&self, method: &str, params: Value) -> Result<Value, MapError>;
}
