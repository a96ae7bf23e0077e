#![allow(dead_code)]

//! Shared test harness: an in-memory statement transport that interprets
//! the store's statement shapes against a vector of rows.

use std::collections::BTreeMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};
use strata_api::{Document, Param, ResultSet, Row, Statement, StatementTransport, StoreError};
use strata_store::{RecordStore, StoreConfig};

/// One stored table row, mirroring the backing schema.
#[derive(Debug, Clone)]
pub struct StubRow {
    pub partition: String,
    pub area: String,
    pub id: String,
    pub value: String,
    pub filter: BTreeMap<String, String>,
    pub model: Option<String>,
    pub version: Option<i64>,
    /// Captured from the statement text, not expired by the stub.
    pub ttl: Option<u32>,
}

/// In-memory stand-in for the statement gateway.
pub struct StubTransport {
    pub rows: Mutex<Vec<StubRow>>,
    /// When set, every round trip fails with a transport error.
    pub fail: AtomicBool,
}

impl StubTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self { rows: Mutex::new(Vec::new()), fail: AtomicBool::new(false) })
    }

    pub fn row_count(&self) -> usize {
        self.rows.lock().unwrap().len()
    }

    pub fn rows_tagged(&self, model: &str, version: i64) -> usize {
        self.rows
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.model.as_deref() == Some(model) && r.version == Some(version))
            .count()
    }

    pub fn row(&self, partition: &str, area: &str, id: &str) -> Option<StubRow> {
        self.rows
            .lock()
            .unwrap()
            .iter()
            .find(|r| r.partition == partition && r.area == area && r.id == id)
            .cloned()
    }

    /// Plant a row directly, bypassing the store (e.g. a corrupt payload).
    pub fn plant(&self, row: StubRow) {
        self.rows.lock().unwrap().push(row);
    }

    fn apply(&self, stmt: &Statement) -> Result<ResultSet, StoreError> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(StoreError::Transport("stub transport told to fail".into()));
        }
        let text = stmt.text.as_str();
        if text.starts_with("CREATE TABLE") {
            Ok(Vec::new())
        } else if text.starts_with("TRUNCATE") {
            self.rows.lock().unwrap().clear();
            Ok(Vec::new())
        } else if text.starts_with("INSERT INTO") {
            self.insert(stmt);
            Ok(Vec::new())
        } else if text.starts_with("DELETE FROM") {
            self.delete(stmt);
            Ok(Vec::new())
        } else if text.starts_with("SELECT") {
            Ok(self.select(stmt))
        } else {
            panic!("stub transport got an unexpected statement: {text}");
        }
    }

    fn insert(&self, stmt: &Statement) {
        let partition = text_param(&stmt.params[0]);
        let area = text_param(&stmt.params[1]);
        let id = text_param(&stmt.params[2]);
        let row = StubRow {
            partition: partition.clone(),
            area: area.clone(),
            id: id.clone(),
            value: text_param(&stmt.params[3]),
            filter: map_param(&stmt.params[4]),
            model: match &stmt.params[5] {
                Param::Text(s) => Some(s.clone()),
                _ => None,
            },
            version: match &stmt.params[6] {
                Param::Int(v) => Some(*v),
                _ => None,
            },
            ttl: stmt
                .text
                .split(" USING TTL ")
                .nth(1)
                .and_then(|s| s.trim().parse().ok()),
        };
        let mut rows = self.rows.lock().unwrap();
        rows.retain(|r| !(r.partition == partition && r.area == area && r.id == id));
        rows.push(row);
    }

    fn delete(&self, stmt: &Statement) {
        let partition = text_param(&stmt.params[0]);
        let area = text_param(&stmt.params[1]);
        let id = stmt.params.get(2).map(text_param);
        self.rows.lock().unwrap().retain(|r| {
            !(r.partition == partition
                && r.area == area
                && id.as_deref().is_none_or(|id| r.id == id))
        });
    }

    fn select(&self, stmt: &Statement) -> ResultSet {
        let projection: Vec<&str> = stmt
            .text
            .strip_prefix("SELECT ")
            .and_then(|rest| rest.split(" FROM ").next())
            .expect("malformed select")
            .split(", ")
            .collect();
        let rows = self.rows.lock().unwrap();

        let matching: Vec<&StubRow> = if stmt.text.contains("WHERE model = ?") {
            let model = text_param(&stmt.params[0]);
            let version = int_param(&stmt.params[1]);
            rows.iter()
                .filter(|r| r.model.as_deref() == Some(model.as_str()) && r.version == Some(version))
                .collect()
        } else {
            let partition = text_param(&stmt.params[0]);
            let area = text_param(&stmt.params[1]);
            let id = stmt.text.contains("AND id = ?").then(|| text_param(&stmt.params[2]));
            let filters = scan_filters(stmt);
            rows.iter()
                .filter(|r| {
                    r.partition == partition
                        && r.area == area
                        && id.as_deref().is_none_or(|id| r.id == id)
                        && filters
                            .iter()
                            .all(|(name, value)| r.filter.get(name) == Some(value))
                })
                .collect()
        };

        matching
            .into_iter()
            .map(|r| {
                let mut row = Row::new();
                for column in &projection {
                    match *column {
                        "partition" => row.push("partition", Some(r.partition.clone())),
                        "area" => row.push("area", Some(r.area.clone())),
                        "id" => row.push("id", Some(r.id.clone())),
                        "value" => row.push("value", Some(r.value.clone())),
                        "model" => row.push("model", r.model.clone()),
                        "version" => row.push("version", r.version.map(|v| v.to_string())),
                        other => panic!("stub cannot project column {other}"),
                    }
                }
                row
            })
            .collect()
    }
}

/// Pull (name, value) pairs for `filter['name'] = ?` clauses, pairing
/// names from the text with the bound values after partition/area.
fn scan_filters(stmt: &Statement) -> Vec<(String, String)> {
    let names: Vec<String> = stmt
        .text
        .split("filter['")
        .skip(1)
        .map(|rest| {
            rest.split("'] = ?")
                .next()
                .expect("malformed filter clause")
                .replace("''", "'")
        })
        .collect();
    let first_value = stmt.params.len() - names.len();
    names
        .into_iter()
        .zip(stmt.params[first_value..].iter().map(text_param))
        .collect()
}

fn text_param(param: &Param) -> String {
    match param {
        Param::Text(s) => s.clone(),
        other => panic!("expected text param, got {other:?}"),
    }
}

fn int_param(param: &Param) -> i64 {
    match param {
        Param::Int(v) => *v,
        other => panic!("expected int param, got {other:?}"),
    }
}

fn map_param(param: &Param) -> BTreeMap<String, String> {
    match param {
        Param::Map(m) => m.clone(),
        other => panic!("expected map param, got {other:?}"),
    }
}

impl StatementTransport for StubTransport {
    fn execute(
        &self,
        stmt: &Statement,
    ) -> Pin<Box<dyn Future<Output = Result<ResultSet, StoreError>> + Send + '_>> {
        let result = self.apply(stmt);
        Box::pin(async move { result })
    }
}

/// Store wired to a stub transport, default config.
pub fn store_over(transport: Arc<StubTransport>) -> RecordStore {
    RecordStore::new(&StoreConfig::for_host("test.local"), transport).unwrap()
}

/// Common fixture document, no schema tag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Person {
    pub name: String,
    pub age: i64,
}

impl Document for Person {}
