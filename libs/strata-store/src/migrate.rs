use strata_api::{Document, StoreError};

use crate::codec;
use crate::query;
use crate::store::RecordStore;

/// Counters from one migration pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MigrationOutcome {
    /// Rows rewritten under the destination schema tag.
    pub rewritten: usize,
    /// Rows retired because the transform returned `None`.
    pub retired: usize,
    /// Rows skipped because the stored payload would not decode.
    pub skipped: usize,
}

impl RecordStore {
    /// Rewrite every record of `S`'s schema generation into `D`'s.
    ///
    /// Candidates are selected by S's (model, version) across the whole
    /// table, decoded, transformed and written back under their original
    /// (partition, area, id) with no TTL; a `None` transform retires the
    /// row instead. The write-back carries D's tag and D's self-declared
    /// filters, so an interrupted pass can be re-run: rows already
    /// migrated no longer match the selector.
    ///
    /// The pass as a whole is not atomic. A transport error aborts it and
    /// leaves earlier candidates migrated, later ones not; per-row decode
    /// failures are counted and skipped.
    pub async fn migrate<S, D, F>(&self, transform: F) -> Result<MigrationOutcome, StoreError>
    where
        S: Document,
        D: Document,
        F: Fn(S) -> Option<D>,
    {
        let source = S::SCHEMA.ok_or(StoreError::SchemaUnavailable {
            type_name: std::any::type_name::<S>(),
        })?;
        if D::SCHEMA.is_none() {
            return Err(StoreError::SchemaUnavailable {
                type_name: std::any::type_name::<D>(),
            });
        }

        let rows = self
            .execute(query::select_generation(&self.table, &source))
            .await?;

        let mut outcome = MigrationOutcome::default();
        for row in &rows {
            let (Some(partition), Some(area), Some(id), Some(payload)) = (
                row.get("partition"),
                row.get("area"),
                row.get("id"),
                row.get("value"),
            ) else {
                continue;
            };

            let old: S = match codec::decode(payload) {
                Ok(doc) => doc,
                Err(e) => {
                    outcome.skipped += 1;
                    tracing::warn!(
                        model = source.model,
                        version = source.version,
                        id = id,
                        error = %e,
                        "skipping undecodable migration candidate"
                    );
                    continue;
                }
            };

            match transform(old) {
                Some(new) => {
                    self.put(partition, id, area, None, &[], &new).await?;
                    outcome.rewritten += 1;
                }
                None => {
                    self.delete(partition, id, area).await?;
                    outcome.retired += 1;
                }
            }
        }

        tracing::info!(
            model = source.model,
            version = source.version,
            rewritten = outcome.rewritten,
            retired = outcome.retired,
            skipped = outcome.skipped,
            "migration pass complete"
        );
        Ok(outcome)
    }
}
