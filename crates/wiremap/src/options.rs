use serde::{Deserialize, Serialize};

use crate::error::MapError;
use crate::transform::Transform;

/// Per-instance serialization options.
///
/// Loadable from JSON, e.g. `{"skipBasicTransforms": true}`; missing keys take
/// their defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Options {
    /// Emit and accept protocol-native raw values: transforms not marked
    /// `never_skip` are bypassed in both directions.
    pub skip_basic_transforms: bool,
}

impl Options {
    /// Options that skip basic transforms.
    pub fn raw() -> Self {
        Self {
            skip_basic_transforms: true,
        }
    }

    pub fn from_json_str(text: &str) -> Result<Self, MapError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Returns the transform if it should run under these options.
    pub fn applicable<'t>(&self, transform: Option<&'t Transform>) -> Option<&'t Transform> {
        transform.filter(|t| t.is_never_skip() || !self.skip_basic_transforms)
    }
}
