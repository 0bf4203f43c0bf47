use crate::item::RowKey;
use alloy_primitives::{Address, B256};
use anyhow::{anyhow, ensure};
use axh_primitives::{BlockNumber, ChainId, ItemIndex};


/// Column qualifier of balance-update markers for the native asset.
pub const NATIVE_ASSET_COLUMN: &str = "00";


/// Row-key codec for the history store.
///
/// Block-number components are encoded as the fixed-width decimal of
/// `max_block - number`, so the engine's ascending key order yields
/// descending block order. The bound caps the scheme: block numbers above
/// `max_block` are rejected at key-build time instead of silently wrapping.
/// The default bound of 999_999_999 keeps the component at nine digits;
/// raising the bound widens every key of the key space consistently, so a
/// store must be rebuilt to change it.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct KeySpace {
    max_block: BlockNumber,
    width: usize
}


impl Default for KeySpace {
    fn default() -> Self {
        Self::new(999_999_999)
    }
}


impl KeySpace {
    pub fn new(max_block: BlockNumber) -> Self {
        Self {
            max_block,
            width: max_block.to_string().len()
        }
    }

    pub fn max_block(&self) -> BlockNumber {
        self.max_block
    }

    pub fn reverse_padded(&self, number: BlockNumber) -> anyhow::Result<String> {
        ensure!(
            number <= self.max_block,
            "block number {} is above the key space bound {}",
            number,
            self.max_block
        );
        Ok(format!("{:0width$}", self.max_block - number, width = self.width))
    }

    /// `"{chain}:I:{addressHex}:{revBlock}:{txIndex}:{logIndex}"`.
    ///
    /// The zero-padded (transaction index, log index) pair total-orders
    /// same-block events under the address prefix.
    pub fn history_row_key(
        &self,
        chain: ChainId,
        address: &Address,
        number: BlockNumber,
        tx_index: ItemIndex,
        log_index: ItemIndex
    ) -> anyhow::Result<RowKey>
    {
        Ok(format!(
            "{}:I:{}:{}:{:05}:{:05}",
            chain,
            address_hex(address),
            self.reverse_padded(number)?,
            tx_index,
            log_index
        ))
    }

    pub fn history_prefix(&self, chain: ChainId, address: &Address) -> RowKey {
        format!("{}:I:{}:", chain, address_hex(address))
    }

    /// `"{chain}:B:{addressHex}"`, asset id goes into the column qualifier.
    pub fn balance_row_key(&self, chain: ChainId, address: &Address) -> RowKey {
        format!("{}:B:{}", chain, address_hex(address))
    }

    /// `"{chain}:BLOCK:{revBlock}:{blockHashHex}"`.
    pub fn block_keys_row_key(
        &self,
        chain: ChainId,
        number: BlockNumber,
        hash: &B256
    ) -> anyhow::Result<RowKey>
    {
        Ok(format!(
            "{}:BLOCK:{}:{}",
            chain,
            self.reverse_padded(number)?,
            faster_hex::hex_string(hash.as_slice())
        ))
    }

    /// Prefix covering every block-keys record at the given height.
    pub fn block_keys_prefix(&self, chain: ChainId, number: BlockNumber) -> anyhow::Result<RowKey> {
        Ok(format!("{}:BLOCK:{}:", chain, self.reverse_padded(number)?))
    }
}


pub fn address_hex(address: &Address) -> String {
    faster_hex::hex_string(address.as_slice())
}


/// Extracts the block hash back out of a block-keys row key.
pub fn block_hash_from_block_keys_row(row: &str) -> anyhow::Result<B256> {
    let hex = row.rsplit(':')
        .next()
        .ok_or_else(|| anyhow!("malformed block-keys row key: {}", row))?;
    let mut hash = B256::ZERO;
    faster_hex::hex_decode(hex.as_bytes(), hash.as_mut_slice())
        .map_err(|_| anyhow!("malformed block hash in block-keys row key: {}", row))?;
    Ok(hash)
}
