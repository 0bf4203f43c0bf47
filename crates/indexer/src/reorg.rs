use alloy_primitives::B256;
use anyhow::{anyhow, Context};
use axh_data::COLUMN_BLOCK_KEYS;
use axh_primitives::{BlockNumber, ChainId};
use axh_storage::{
    block_hash_from_block_keys_row, ItemStore, KeySpace, RowKey, ScanRange, CF_DATA, CF_METADATA
};
use tracing::info;


/// Keys written for one indexed block, as recorded at indexing time.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct BlockKeysRecord {
    pub block_number: BlockNumber,
    pub block_hash: B256,
    pub keys: Vec<RowKey>
}


/// Every block-keys record stored at the given height. More than one entry
/// means different hashes were indexed at the same height - a reorg that
/// needs repair.
pub fn block_records(
    store: &dyn ItemStore,
    key_space: &KeySpace,
    chain: ChainId,
    number: BlockNumber
) -> anyhow::Result<Vec<BlockKeysRecord>>
{
    let prefix = key_space.block_keys_prefix(chain, number)?;
    let mut records = Vec::new();

    for cell in store.scan(CF_METADATA, ScanRange::prefix(prefix))? {
        let cell = cell?;
        if cell.column != COLUMN_BLOCK_KEYS {
            continue
        }
        let keys: Vec<RowKey> = borsh::from_slice(&cell.value).with_context(|| {
            format!("failed to deserialize block-keys record {}", cell.row)
        })?;
        records.push(BlockKeysRecord {
            block_number: number,
            block_hash: block_hash_from_block_keys_row(&cell.row)?,
            keys
        });
    }

    Ok(records)
}


/// Deletes every history row the given block wrote, plus its block-keys
/// record. Rows written for other hashes at the same height are untouched.
pub fn invalidate_block(
    store: &dyn ItemStore,
    key_space: &KeySpace,
    chain: ChainId,
    number: BlockNumber,
    hash: &B256
) -> anyhow::Result<()>
{
    let record = block_records(store, key_space, chain, number)?
        .into_iter()
        .find(|record| record.block_hash == *hash)
        .ok_or_else(|| {
            anyhow!(
                "no block-keys record for chain {} block {} hash {}",
                chain,
                number,
                hash
            )
        })?;

    store.delete_rows(CF_DATA, &record.keys)?;
    store.delete_rows(
        CF_METADATA,
        &[key_space.block_keys_row_key(chain, number, hash)?]
    )?;

    info!(
        chain,
        block = number,
        %hash,
        rows = record.keys.len(),
        "invalidated stale block"
    );
    Ok(())
}
