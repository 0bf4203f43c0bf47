mod erc20;
mod tx;

pub use erc20::*;
pub use tx::*;

use crate::cache::{Asset, CacheKey, UpdateCache};
use alloy_primitives::Address;
use axh_primitives::{Block, ChainId, Name};
use axh_storage::{Item, ItemBatch, KeySpace, CF_BALANCE_UPDATES};
use std::time::Duration;
use tracing::debug;


/// How long one balance-update marker suppresses further markers for the
/// same (chain, address, asset). Bounds balance staleness; a hot address
/// triggers at most one downstream recompute per window regardless of
/// transaction volume.
pub const BALANCE_UPDATE_TTL: Duration = Duration::from_secs(2 * 24 * 60 * 60);


#[derive(Debug, Default)]
pub struct TransformOutput {
    /// Indexed history rows.
    pub data: ItemBatch,
    /// Balance-update markers.
    pub meta: ItemBatch
}


impl TransformOutput {
    pub fn new() -> Self {
        Self::default()
    }
}


/// A pure function from one block to derived storage items plus metadata
/// items. Implementations share nothing but the balance-update cache.
pub trait Transform: Send + Sync {
    fn name(&self) -> Name;

    fn transform(&self, chain: ChainId, block: &Block) -> anyhow::Result<TransformOutput>;
}


/// Emits a balance-update marker unless one was already emitted for this
/// key within the TTL window. Cache failures count as misses.
pub(crate) fn mark_balance_update(
    cache: &dyn UpdateCache,
    key_space: &KeySpace,
    chain: ChainId,
    address: Address,
    asset: Asset,
    ttl: Duration,
    meta: &mut ItemBatch
) {
    let key = CacheKey {
        chain,
        address,
        asset
    };

    let marked = match cache.get(&key) {
        Ok(marked) => marked,
        Err(err) => {
            debug!(error =? err, "balance-update cache read failed, emitting marker");
            false
        }
    };
    if marked {
        return
    }

    meta.put(
        key_space.balance_row_key(chain, &address),
        Item::new(CF_BALANCE_UPDATES, asset.column(), Vec::new())
    );

    if let Err(err) = cache.set(&key, ttl) {
        debug!(error =? err, "balance-update cache write failed");
    }
}
