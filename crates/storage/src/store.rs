use crate::item::{Cell, ItemBatch, RowKey};
use axh_primitives::Name;


pub const CF_DATA: Name = "DATA";
pub const CF_BALANCE_UPDATES: Name = "BALANCE_UPDATES";
pub const CF_METADATA: Name = "METADATA";


pub const FAMILIES: [Name; 3] = [CF_DATA, CF_BALANCE_UPDATES, CF_METADATA];


/// An ascending scan over one column family.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct ScanRange {
    pub prefix: String,
    /// Resume strictly after every cell of this row key.
    pub after: Option<RowKey>
}


impl ScanRange {
    pub fn prefix(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            after: None
        }
    }

    pub fn after(mut self, row: RowKey) -> Self {
        self.after = Some(row);
        self
    }
}


/// Thin ownership layer over a column-family engine.
///
/// The store never interprets key structure - scan order semantics are
/// entirely a property of how callers construct keys. Backend errors are
/// returned unmodified; retry policy belongs to the caller.
pub trait ItemStore: Send + Sync {
    /// Writes the whole batch or fails as a unit; safe to repeat.
    fn add_items(&self, batch: &ItemBatch) -> anyhow::Result<()>;

    /// Cells in ascending engine-key order, bounded by the range prefix.
    fn scan<'a>(
        &'a self,
        family: Name,
        range: ScanRange
    ) -> anyhow::Result<Box<dyn Iterator<Item=anyhow::Result<Cell>> + 'a>>;

    /// Removes the listed rows with all their cells. Used by reorg repair.
    fn delete_rows(&self, family: Name, rows: &[RowKey]) -> anyhow::Result<()>;
}


pub(crate) fn scan_start(range: &ScanRange) -> Vec<u8> {
    match &range.after {
        // row keys are NUL-separated from column qualifiers, so 0x01
        // appended to a row key sorts after every cell of that row and
        // before any other row
        Some(row) => {
            let mut start = row.as_bytes().to_vec();
            start.push(1);
            start
        },
        None => range.prefix.as_bytes().to_vec()
    }
}
