use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::filter::Filter;

/// Schema generation tag: object name plus integer version.
///
/// A stored row keeps the tag of the type that wrote it; migration
/// selects rows by an exact (model, version) pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SchemaTag {
    pub model: &'static str,
    pub version: i32,
}

impl SchemaTag {
    pub const fn new(model: &'static str, version: i32) -> Self {
        Self { model, version }
    }
}

/// A storable typed object.
///
/// Both capabilities are optional and resolved at compile time:
///
/// - `SCHEMA`: schema tag. The default `None` writes null model/version
///   columns and leaves the type outside migration — a legitimate state,
///   not an error.
/// - `filters`: self-declared predicates. Used when the caller supplies
///   none at `put`, and as the only filter source during migration
///   write-back.
pub trait Document: Serialize + DeserializeOwned + Send + Sync {
    const SCHEMA: Option<SchemaTag> = None;

    fn filters(&self) -> Vec<Filter> {
        Vec::new()
    }
}
