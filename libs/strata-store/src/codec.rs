use strata_api::{Document, StoreError};

/// Serialize a document to its stored textual form.
pub fn encode<T: Document>(doc: &T) -> Result<String, StoreError> {
    serde_json::to_string(doc).map_err(|e| StoreError::Encode {
        type_name: std::any::type_name::<T>(),
        source: e,
    })
}

/// Decode a stored payload back into a document.
///
/// Bulk readers call this per row and skip failures; point lookups
/// surface the error.
pub fn decode<T: Document>(payload: &str) -> Result<T, StoreError> {
    serde_json::from_str(payload).map_err(|e| StoreError::Decode {
        type_name: std::any::type_name::<T>(),
        source: e,
    })
}
