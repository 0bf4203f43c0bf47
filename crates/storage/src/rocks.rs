use crate::item::{cell_key, split_cell_key, Cell, ItemBatch, RowKey};
use crate::store::{scan_start, ItemStore, ScanRange, FAMILIES};
use anyhow::anyhow;
use axh_primitives::Name;
use rocksdb::{ColumnFamily, ColumnFamilyDescriptor, Options as RocksOptions, WriteBatch, DB};
use std::path::Path;


type RocksIterator<'a> = rocksdb::DBRawIteratorWithThreadMode<'a, DB>;


#[derive(Debug, Clone)]
pub struct DatabaseSettings {
    data_cache_size: usize
}


impl Default for DatabaseSettings {
    fn default() -> Self {
        Self {
            data_cache_size: 128 * 1024 * 1024
        }
    }
}


impl DatabaseSettings {
    pub fn with_data_cache_size(mut self, bytes: usize) -> Self {
        self.data_cache_size = bytes;
        self
    }

    pub fn open(&self, path: impl AsRef<Path>) -> anyhow::Result<RocksItemStore> {
        let mut options = RocksOptions::default();
        options.create_if_missing(true);
        options.create_missing_column_families(true);

        let cache = rocksdb::Cache::new_lru_cache(self.data_cache_size);
        let mut block_based_table_factory = rocksdb::BlockBasedOptions::default();
        block_based_table_factory.set_block_cache(&cache);
        options.set_block_based_table_factory(&block_based_table_factory);

        let db = DB::open_cf_descriptors(
            &options,
            path,
            FAMILIES.map(|name| ColumnFamilyDescriptor::new(name, RocksOptions::default()))
        )?;

        Ok(RocksItemStore {
            db
        })
    }
}


pub struct RocksItemStore {
    db: DB
}


impl RocksItemStore {
    fn family_handle(&self, name: Name) -> anyhow::Result<&ColumnFamily> {
        self.db.cf_handle(name).ok_or_else(|| {
            anyhow!("unknown column family {}", name)
        })
    }
}


impl ItemStore for RocksItemStore {
    fn add_items(&self, batch: &ItemBatch) -> anyhow::Result<()> {
        let mut write = WriteBatch::default();
        for (row, items) in batch.rows() {
            for item in items {
                write.put_cf(
                    self.family_handle(item.family)?,
                    cell_key(row, &item.column),
                    &item.value
                );
            }
        }
        self.db.write(write)?;
        Ok(())
    }

    fn scan<'a>(
        &'a self,
        family: Name,
        range: ScanRange
    ) -> anyhow::Result<Box<dyn Iterator<Item=anyhow::Result<Cell>> + 'a>>
    {
        let inner = self.db.raw_iterator_cf(self.family_handle(family)?);
        Ok(Box::new(RocksCellIterator {
            inner,
            start: scan_start(&range),
            prefix: range.prefix,
            first_seek: true
        }))
    }

    fn delete_rows(&self, family: Name, rows: &[RowKey]) -> anyhow::Result<()> {
        let cf = self.family_handle(family)?;
        let mut write = WriteBatch::default();
        for row in rows {
            let mut from = row.as_bytes().to_vec();
            from.push(0);
            let mut to = row.as_bytes().to_vec();
            to.push(1);
            write.delete_range_cf(cf, from, to);
        }
        self.db.write(write)?;
        Ok(())
    }
}


struct RocksCellIterator<'a> {
    inner: RocksIterator<'a>,
    start: Vec<u8>,
    prefix: String,
    first_seek: bool
}


impl<'a> RocksCellIterator<'a> {
    fn next_cell(&mut self) -> anyhow::Result<Option<Cell>> {
        if self.first_seek {
            self.inner.seek(&self.start);
            self.first_seek = false;
        } else {
            self.inner.next();
        }
        self.inner.status()?;

        if !self.inner.valid() {
            return Ok(None)
        }

        let key = self.inner.key().unwrap();
        if !key.starts_with(self.prefix.as_bytes()) {
            return Ok(None)
        }

        let (row, column) = split_cell_key(key)?;
        Ok(Some(Cell {
            row: row.to_string(),
            column: column.to_string(),
            value: self.inner.value().unwrap().to_vec()
        }))
    }
}


impl<'a> Iterator for RocksCellIterator<'a> {
    type Item = anyhow::Result<Cell>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_cell().transpose()
    }
}
