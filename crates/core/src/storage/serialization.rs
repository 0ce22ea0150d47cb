//! JSON encoding of records for stores that persist opaque bodies.
//!
//! JSON keeps stored values human-readable and easy to inspect.

use crate::record::Record;

use super::{RepositoryError, Result};

/// Serializes a record to a JSON string.
pub fn encode_record<R: Record>(record: &R) -> Result<String> {
    serde_json::to_string(record).map_err(|e| {
        RepositoryError::unknown_from(format!("Failed to serialize {}", R::COLLECTION), e)
    })
}

/// Deserializes a record from a JSON string.
pub fn decode_record<R: Record>(body: &str) -> Result<R> {
    serde_json::from_str(body).map_err(|e| {
        RepositoryError::unknown_from(format!("Failed to deserialize {}", R::COLLECTION), e)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Plant, Title};
    use crate::storage::ErrorKind;

    #[test]
    fn test_encode_decode_plant() {
        let plant = Plant::new("malus-pumila", "Apple", 3);

        let body = encode_record(&plant).unwrap();
        let decoded: Plant = decode_record(&body).unwrap();

        assert_eq!(decoded, plant);
    }

    #[test]
    fn test_decode_invalid_json_is_unknown() {
        let result = decode_record::<Title>("{not json");

        let err = result.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Unknown);
        assert!(err.to_string().contains("titles"));
    }
}
