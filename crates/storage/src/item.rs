use anyhow::anyhow;
use axh_primitives::Name;
use std::collections::BTreeMap;


pub type RowKey = String;


/// A single (family, column, payload) cell destined for some row.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Item {
    pub family: Name,
    pub column: String,
    pub value: Vec<u8>
}


impl Item {
    pub fn new(family: Name, column: impl Into<String>, value: Vec<u8>) -> Self {
        Self {
            family,
            column: column.into(),
            value
        }
    }
}


/// One stored cell as returned by a scan.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Cell {
    pub row: RowKey,
    pub column: String,
    pub value: Vec<u8>
}


/// A set of rows to be written in one batch, each row holding one or more
/// cells. Writing the same batch twice overwrites the same cells with the
/// same payloads.
#[derive(Debug, Default, Clone)]
pub struct ItemBatch {
    rows: BTreeMap<RowKey, Vec<Item>>
}


impl ItemBatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn put(&mut self, row: impl Into<RowKey>, item: Item) {
        self.rows.entry(row.into()).or_default().push(item)
    }

    pub fn merge(&mut self, other: ItemBatch) {
        for (row, mut items) in other.rows {
            self.rows.entry(row).or_default().append(&mut items)
        }
    }

    pub fn rows(&self) -> impl Iterator<Item=(&RowKey, &[Item])> {
        self.rows.iter().map(|(row, items)| (row, items.as_slice()))
    }

    pub fn row_keys(&self) -> impl Iterator<Item=&RowKey> {
        self.rows.keys()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn num_rows(&self) -> usize {
        self.rows.len()
    }

    pub fn num_items(&self) -> usize {
        self.rows.values().map(|items| items.len()).sum()
    }
}


// Engine-level cell key: row key, NUL, column qualifier. Row keys are ASCII
// strings, so the NUL separator sorts every cell of a row before any cell of
// a longer row key sharing the same prefix.
pub(crate) fn cell_key(row: &str, column: &str) -> Vec<u8> {
    let mut key = Vec::with_capacity(row.len() + 1 + column.len());
    key.extend_from_slice(row.as_bytes());
    key.push(0);
    key.extend_from_slice(column.as_bytes());
    key
}


pub(crate) fn split_cell_key(key: &[u8]) -> anyhow::Result<(&str, &str)> {
    let sep = key.iter()
        .position(|b| *b == 0)
        .ok_or_else(|| anyhow!("malformed cell key: no column separator"))?;
    let row = std::str::from_utf8(&key[..sep])?;
    let column = std::str::from_utf8(&key[sep + 1..])?;
    Ok((row, column))
}
