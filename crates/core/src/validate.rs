use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::{ReplaymapError, Result};

/// Look up `field` in the provider document.
///
/// Present and non-null values are returned as-is. A missing required field is an
/// error; a missing optional field logs a notice and yields `None`.
pub fn validate_field<'a>(
    info: &'a Value,
    field: &str,
    video_id: &str,
    required: bool,
) -> Result<Option<&'a Value>> {
    match info.get(field) {
        Some(value) if !value.is_null() => Ok(Some(value)),
        _ if required => Err(ReplaymapError::MissingRequiredField {
            field: field.to_string(),
            video_id: video_id.to_string(),
        }),
        _ => {
            tracing::info!(field, video_id, "No {field} data found for {video_id}");
            Ok(None)
        }
    }
}

pub fn required_field<T: DeserializeOwned>(info: &Value, field: &str, video_id: &str) -> Result<T> {
    match validate_field(info, field, video_id, true)? {
        Some(value) => decode(value, field, video_id),
        None => Err(ReplaymapError::MissingRequiredField {
            field: field.to_string(),
            video_id: video_id.to_string(),
        }),
    }
}

pub fn optional_field<T: DeserializeOwned>(
    info: &Value,
    field: &str,
    video_id: &str,
) -> Result<Option<T>> {
    validate_field(info, field, video_id, false)?
        .map(|value| decode(value, field, video_id))
        .transpose()
}

fn decode<T: DeserializeOwned>(value: &Value, field: &str, video_id: &str) -> Result<T> {
    T::deserialize(value).map_err(|source| ReplaymapError::MalformedField {
        field: field.to_string(),
        video_id: video_id.to_string(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn present_field_is_returned() {
        let info = json!({"heatmap": [1, 2]});
        let value = validate_field(&info, "heatmap", "vid", true).unwrap();
        assert_eq!(value, Some(&json!([1, 2])));
    }

    #[test]
    fn null_required_field_is_missing() {
        let info = json!({"heatmap": null});
        let err = validate_field(&info, "heatmap", "vid", true).unwrap_err();
        assert!(matches!(err, ReplaymapError::MissingRequiredField { .. }));
        assert_eq!(err.to_string(), "No heatmap data found for vid");
    }

    #[test]
    fn absent_optional_field_is_none() {
        let info = json!({});
        assert_eq!(validate_field(&info, "chapters", "vid", false).unwrap(), None);
        let typed: Option<Vec<String>> = optional_field(&info, "chapters", "vid").unwrap();
        assert!(typed.is_none());
    }

    #[test]
    fn present_but_empty_is_not_absent() {
        let info = json!({"chapters": []});
        let typed: Option<Vec<String>> = optional_field(&info, "chapters", "vid").unwrap();
        assert_eq!(typed, Some(vec![]));
    }

    #[test]
    fn wrong_shape_is_malformed() {
        let info = json!({"heatmap": "not a list"});
        let err = required_field::<Vec<f64>>(&info, "heatmap", "vid").unwrap_err();
        assert!(matches!(err, ReplaymapError::MalformedField { ref field, .. } if field == "heatmap"));
    }
}
