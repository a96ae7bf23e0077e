use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use strata_api::{Document, Filter, ResultSet, Statement, StatementTransport, StoreError};

use crate::codec;
use crate::config::StoreConfig;
use crate::query;

/// Record store over a single wide-column table.
///
/// Every operation is one awaited statement round trip through the
/// transport; there is no batching, queueing or retry. The store keeps
/// no mutable state beyond a diagnostic statement counter.
pub struct RecordStore {
    transport: Arc<dyn StatementTransport>,
    /// Qualified `keyspace.table`, validated at construction.
    pub(crate) table: String,
    stats: Mutex<HashMap<String, u64>>,
}

impl RecordStore {
    /// Build a store over the given transport.
    ///
    /// Keyspace and table names land in statement text, so they are
    /// validated here, once.
    pub fn new(
        config: &StoreConfig,
        transport: Arc<dyn StatementTransport>,
    ) -> Result<Self, StoreError> {
        query::validate_identifier(&config.keyspace, "keyspace")?;
        query::validate_identifier(&config.table, "table")?;
        Ok(Self {
            transport,
            table: format!("{}.{}", config.keyspace, config.table),
            stats: Mutex::new(HashMap::new()),
        })
    }

    /// Create the backing table if missing.
    pub async fn init(&self) -> Result<(), StoreError> {
        self.execute(query::create_table(&self.table)).await?;
        Ok(())
    }

    pub(crate) async fn execute(&self, stmt: Statement) -> Result<ResultSet, StoreError> {
        self.count(&stmt.text);
        self.transport.execute(&stmt).await
    }

    /// Count a statement execution. Observability only: a poisoned lock
    /// is recovered, never propagated.
    fn count(&self, text: &str) {
        let mut stats = match self.stats.lock() {
            Ok(guard) => guard,
            Err(poisoned) => {
                tracing::warn!("statement counter lock was poisoned, recovering");
                poisoned.into_inner()
            }
        };
        *stats.entry(text.to_string()).or_insert(0) += 1;
    }

    /// Snapshot of executions per rendered statement text.
    pub fn statement_counts(&self) -> HashMap<String, u64> {
        match self.stats.lock() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// Write one record, overwriting any existing (partition, area, id)
    /// row — last write wins, no optimistic concurrency.
    ///
    /// Caller-supplied filters take precedence; when none are given, the
    /// document's self-declared predicates are stored instead. The schema
    /// tag is taken from `T::SCHEMA`; untagged types write null columns.
    pub async fn put<T: Document>(
        &self,
        partition: &str,
        id: &str,
        area: &str,
        ttl: Option<u32>,
        filters: &[Filter],
        doc: &T,
    ) -> Result<(), StoreError> {
        let payload = codec::encode(doc)?;
        let effective = if filters.is_empty() { doc.filters() } else { filters.to_vec() };
        let stmt = query::insert(
            &self.table,
            partition,
            area,
            id,
            payload,
            &effective,
            T::SCHEMA,
            ttl,
        );
        self.execute(stmt).await?;
        Ok(())
    }

    /// Point lookup on the full primary key.
    ///
    /// `Ok(None)` is a genuine miss; a corrupt stored payload or a failed
    /// round trip surfaces as `Err`, so the three cases stay apart.
    pub async fn get<T: Document>(
        &self,
        partition: &str,
        id: &str,
        area: &str,
    ) -> Result<Option<T>, StoreError> {
        let rows = self
            .execute(query::select_value(&self.table, partition, area, id))
            .await?;
        match rows.first().and_then(|row| row.get("value")) {
            Some(payload) => Ok(Some(codec::decode(payload)?)),
            None => Ok(None),
        }
    }

    /// Delete one record by full primary key.
    pub async fn delete(&self, partition: &str, id: &str, area: &str) -> Result<(), StoreError> {
        self.execute(query::delete_row(&self.table, partition, area, id))
            .await?;
        Ok(())
    }

    /// Scan one (partition, area) with zero or more equality filters.
    ///
    /// A row whose payload does not decode is logged and dropped; the
    /// scan continues past it.
    pub async fn all<T: Document>(
        &self,
        partition: &str,
        area: &str,
        filters: &[Filter],
    ) -> Result<Vec<T>, StoreError> {
        let stmt = query::select_scan(&self.table, "id, value", partition, area, filters);
        let rows = self.execute(stmt).await?;

        let mut records = Vec::with_capacity(rows.len());
        for row in &rows {
            let Some(payload) = row.get("value") else {
                continue;
            };
            match codec::decode::<T>(payload) {
                Ok(doc) => records.push(doc),
                Err(e) => {
                    tracing::warn!(
                        area = %area,
                        id = row.get("id").unwrap_or("?"),
                        error = %e,
                        "skipping undecodable record"
                    );
                }
            }
        }
        Ok(records)
    }

    /// Scan plus an in-process predicate.
    ///
    /// Storage-side `filters` narrow the candidate set; `predicate` is
    /// unconstrained application logic run over every decoded candidate.
    pub async fn query<T, P>(
        &self,
        partition: &str,
        area: &str,
        filters: &[Filter],
        predicate: P,
    ) -> Result<Vec<T>, StoreError>
    where
        T: Document,
        P: FnMut(&T) -> bool,
    {
        let mut records = self.all(partition, area, filters).await?;
        records.retain(predicate);
        Ok(records)
    }

    /// Eager scan with a per-record callback. Not a lazy stream: the
    /// whole candidate set is fetched and decoded first.
    pub async fn iterate<T, F>(
        &self,
        partition: &str,
        area: &str,
        filters: &[Filter],
        mut f: F,
    ) -> Result<(), StoreError>
    where
        T: Document,
        F: FnMut(T),
    {
        for doc in self.all(partition, area, filters).await? {
            f(doc);
        }
        Ok(())
    }

    /// Ids of every matching record — same scan machinery, id projection.
    pub async fn ids(
        &self,
        partition: &str,
        area: &str,
        filters: &[Filter],
    ) -> Result<Vec<String>, StoreError> {
        let stmt = query::select_scan(&self.table, "id", partition, area, filters);
        let rows = self.execute(stmt).await?;
        Ok(rows
            .iter()
            .filter_map(|row| row.get("id").map(str::to_string))
            .collect())
    }

    /// Remove every record under (partition, area). Never narrowed by
    /// filters. One partition delete at the backend.
    pub async fn remove_all_records(&self, partition: &str, area: &str) -> Result<(), StoreError> {
        self.execute(query::delete_partition(&self.table, partition, area))
            .await?;
        Ok(())
    }

    /// Remove every record in the table, unscoped. Destructive and rare;
    /// meant for full resets such as test setup.
    pub async fn truncate_table(&self) -> Result<(), StoreError> {
        self.execute(query::truncate(&self.table)).await?;
        Ok(())
    }
}
