use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;
use std::io::Read;

use crate::error::{LedgerError, Result};

#[derive(Debug, Deserialize, PartialEq, Clone, Copy)]
#[serde(rename_all = "lowercase")]
pub enum OperationKind {
    Register,
    Link,
    Pay,
    Estimate,
    Unlink,
}

/// One row of the operations CSV driving the ledger host.
///
/// `id` is the tenant id, except for `register` where it is the property id.
/// The remaining columns only apply to `register` and `link` and may be
/// omitted entirely on other rows.
#[derive(Debug, Deserialize, PartialEq, Clone)]
pub struct Operation {
    pub op: OperationKind,
    pub id: String,
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub due_date: Option<NaiveDate>,
    #[serde(default)]
    pub rent: Option<Decimal>,
    #[serde(default)]
    pub deposit: Option<Decimal>,
    #[serde(default)]
    pub owner: Option<String>,
    #[serde(default)]
    pub payout: Option<String>,
}

/// Reads operations from a CSV source.
///
/// Wraps `csv::Reader` and provides an iterator over `Result<Operation>`.
/// Handles whitespace trimming and flexible record lengths automatically, so
/// short rows like `pay, tenant-1` parse without trailing commas.
pub struct OperationReader<R: Read> {
    reader: csv::Reader<R>,
}

impl<R: Read> OperationReader<R> {
    /// Creates a new `OperationReader` from any `Read` source (e.g., File, Stdin).
    pub fn new(source: R) -> Self {
        let reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(source);
        Self { reader }
    }

    /// Returns an iterator that lazily reads and deserializes operations,
    /// allowing large replay files to stream without loading everything.
    pub fn operations(self) -> impl Iterator<Item = Result<Operation>> {
        self.reader
            .into_deserialize()
            .map(|result| result.map_err(LedgerError::from))
    }
}
