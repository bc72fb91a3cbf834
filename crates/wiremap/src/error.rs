use thiserror::Error;

/// Errors raised while mapping models to and from wire documents.
///
/// Unknown wire keys and nested values without a deserializer are not errors:
/// they are logged and skipped.
#[derive(Debug, Error)]
pub enum MapError {
    /// A list field and its reference list differ in length, so elements
    /// cannot be compared pairwise.
    #[error("array field `{field}` has {len} elements but its reference has {reference_len}")]
    ArrayLengthMismatch {
        field: String,
        len: usize,
        reference_len: usize,
    },
    #[error("class `{class}` declares no field `{field}`")]
    UnknownField { class: String, field: String },
    #[error("wire document must be a JSON object")]
    NotAnObject,
    #[error("invalid wire JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("link dispatch failed: {0}")]
    Link(String),
}

/// Inconsistent declarations detected by [`crate::ClassBuilder::build`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ClassError {
    #[error("class `{class}`: wire key `{key}` is declared by both `{first}` and `{second}`")]
    DuplicateKey {
        class: String,
        key: String,
        first: String,
        second: String,
    },
    #[error("class `{class}`: wire key `{key}` of field `{field}` names another field")]
    KeyShadowsField {
        class: String,
        key: String,
        field: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn array_length_mismatch_message_names_both_lengths() {
        let err = MapError::ArrayLengthMismatch {
            field: "zones".into(),
            len: 3,
            reference_len: 2,
        };
        assert_eq!(
            err.to_string(),
            "array field `zones` has 3 elements but its reference has 2"
        );
    }

    #[test]
    fn json_errors_convert() {
        let err: MapError = serde_json::from_str::<serde_json::Value>("{")
            .unwrap_err()
            .into();
        assert!(matches!(err, MapError::Json(_)));
    }
}
