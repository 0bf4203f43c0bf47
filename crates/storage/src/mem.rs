use crate::item::{cell_key, split_cell_key, Cell, ItemBatch, RowKey};
use crate::store::{scan_start, ItemStore, ScanRange, FAMILIES};
use anyhow::anyhow;
use axh_primitives::Name;
use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::ops::Bound;


type FamilyMap = BTreeMap<Vec<u8>, Vec<u8>>;


/// BTreeMap-backed store with the same key ordering as the RocksDB adapter.
/// Intended for tests and lightweight embedding.
pub struct MemItemStore {
    families: RwLock<BTreeMap<Name, FamilyMap>>
}


impl MemItemStore {
    pub fn new() -> Self {
        let mut families = BTreeMap::new();
        for name in FAMILIES {
            families.insert(name, FamilyMap::new());
        }
        Self {
            families: RwLock::new(families)
        }
    }
}


impl Default for MemItemStore {
    fn default() -> Self {
        Self::new()
    }
}


impl ItemStore for MemItemStore {
    fn add_items(&self, batch: &ItemBatch) -> anyhow::Result<()> {
        let mut families = self.families.write();
        for (row, items) in batch.rows() {
            for item in items {
                let family = families.get_mut(item.family).ok_or_else(|| {
                    anyhow!("unknown column family {}", item.family)
                })?;
                family.insert(cell_key(row, &item.column), item.value.clone());
            }
        }
        Ok(())
    }

    fn scan<'a>(
        &'a self,
        family: Name,
        range: ScanRange
    ) -> anyhow::Result<Box<dyn Iterator<Item=anyhow::Result<Cell>> + 'a>>
    {
        let families = self.families.read();
        let map = families.get(family).ok_or_else(|| {
            anyhow!("unknown column family {}", family)
        })?;

        let start = scan_start(&range);
        let mut cells = Vec::new();
        for (key, value) in map.range::<[u8], _>((Bound::Included(start.as_slice()), Bound::Unbounded)) {
            if !key.starts_with(range.prefix.as_bytes()) {
                break
            }
            let (row, column) = split_cell_key(key)?;
            cells.push(Cell {
                row: row.to_string(),
                column: column.to_string(),
                value: value.clone()
            });
        }

        Ok(Box::new(cells.into_iter().map(Ok)))
    }

    fn delete_rows(&self, family: Name, rows: &[RowKey]) -> anyhow::Result<()> {
        let mut families = self.families.write();
        let map = families.get_mut(family).ok_or_else(|| {
            anyhow!("unknown column family {}", family)
        })?;
        for row in rows {
            let mut from = row.as_bytes().to_vec();
            from.push(0);
            let mut to = row.as_bytes().to_vec();
            to.push(1);
            let doomed: Vec<_> = map
                .range::<[u8], _>((Bound::Included(from.as_slice()), Bound::Excluded(to.as_slice())))
                .map(|(key, _)| key.clone())
                .collect();
            for key in doomed {
                map.remove(&key);
            }
        }
        Ok(())
    }
}
