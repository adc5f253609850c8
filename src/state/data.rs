/// Shared data structures for the application state
///
/// These structs represent the feed data that flows between
/// the API layer and the UI layer.

use serde::Deserialize;
use std::collections::HashMap;

/// A single record in the image feed
///
/// The view only ever looks at `s3_image_link`; whatever other fields the
/// backend attaches are carried along opaquely so the wire schema can grow
/// without breaking deserialization.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ImageRecord {
    /// Link to the image binary, either absolute or a bare object key
    pub s3_image_link: String,
    /// Any other metadata the backend attached to the record
    #[serde(flatten)]
    pub metadata: HashMap<String, serde_json::Value>,
}

impl ImageRecord {
    /// Build a record with no extra metadata
    pub fn new(s3_image_link: impl Into<String>) -> Self {
        ImageRecord {
            s3_image_link: s3_image_link.into(),
            metadata: HashMap::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extra_fields_are_kept() {
        let record: ImageRecord = serde_json::from_str(
            r#"{"s3_image_link": "cats/01.jpg", "created_at": 1234, "_id": "abc"}"#,
        )
        .unwrap();

        assert_eq!(record.s3_image_link, "cats/01.jpg");
        assert_eq!(record.metadata.len(), 2);
        assert_eq!(record.metadata["_id"], "abc");
    }

    #[test]
    fn test_missing_link_is_an_error() {
        let result: Result<ImageRecord, _> = serde_json::from_str(r#"{"created_at": 1234}"#);
        assert!(result.is_err());
    }
}
