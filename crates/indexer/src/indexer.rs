use crate::transform::Transform;
use anyhow::Context;
use axh_data::COLUMN_BLOCK_KEYS;
use axh_primitives::{Block, ChainId};
use axh_storage::{Item, ItemBatch, ItemStore, KeySpace, RowKey, CF_METADATA};
use std::sync::Arc;
use tracing::debug;


/// Runs every registered transform over a batch of blocks, attaches
/// per-block reorg metadata and writes the merged result to the store in
/// one batch.
pub struct Indexer {
    store: Arc<dyn ItemStore>,
    transforms: Vec<Box<dyn Transform>>,
    key_space: KeySpace
}


impl Indexer {
    pub fn new(
        store: Arc<dyn ItemStore>,
        transforms: Vec<Box<dyn Transform>>,
        key_space: KeySpace
    ) -> Self
    {
        Self {
            store,
            transforms,
            key_space
        }
    }

    pub fn key_space(&self) -> &KeySpace {
        &self.key_space
    }

    /// Indexes the given blocks as one store write.
    ///
    /// A transform failure on any block aborts the whole call before
    /// anything is written. Re-running the same batch rewrites the same
    /// keys, so callers may retry whole batches freely. Ingestion for a
    /// single chain must be externally serialized - concurrent calls over
    /// overlapping ranges race the block-keys metadata.
    pub fn index_blocks(&self, chain: ChainId, blocks: &[Block]) -> anyhow::Result<()> {
        if blocks.is_empty() {
            return Ok(())
        }

        let mut combined = ItemBatch::new();

        for block in blocks {
            let mut data = ItemBatch::new();
            let mut meta = ItemBatch::new();

            for transform in &self.transforms {
                let out = transform.transform(chain, block).with_context(|| {
                    format!(
                        "{} transform failed on chain {} block {}",
                        transform.name(),
                        chain,
                        block.number
                    )
                })?;
                data.merge(out.data);
                meta.merge(out.meta);
            }

            let touched: Vec<RowKey> = data.row_keys().cloned().collect();
            meta.put(
                self.key_space.block_keys_row_key(chain, block.number, &block.hash)?,
                Item::new(CF_METADATA, COLUMN_BLOCK_KEYS, borsh::to_vec(&touched).unwrap())
            );

            combined.merge(data);
            combined.merge(meta);
        }

        let rows = combined.num_rows();
        self.store.add_items(&combined)?;

        debug!(
            chain,
            first_block = blocks[0].number,
            last_block = blocks[blocks.len() - 1].number,
            rows,
            "indexed block batch"
        );
        Ok(())
    }
}
