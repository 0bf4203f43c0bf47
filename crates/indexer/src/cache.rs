use alloy_primitives::Address;
use axh_primitives::ChainId;
use axh_storage::{address_hex, NATIVE_ASSET_COLUMN};
use dashmap::DashMap;
use std::time::{Duration, Instant};


#[derive(Debug, Copy, Clone, Hash, Eq, PartialEq)]
pub enum Asset {
    Native,
    Token(Address)
}


impl Asset {
    /// Column qualifier of the balance-update marker for this asset.
    pub fn column(&self) -> String {
        match self {
            Asset::Native => NATIVE_ASSET_COLUMN.to_string(),
            Asset::Token(address) => address_hex(address)
        }
    }
}


#[derive(Debug, Copy, Clone, Hash, Eq, PartialEq)]
pub struct CacheKey {
    pub chain: ChainId,
    pub address: Address,
    pub asset: Asset
}


/// Existence cache throttling balance-update marker writes.
///
/// Not correctness-critical: a miss or an unavailable backend causes one
/// extra marker write, never data loss. Implementations must be safe for
/// concurrent use from multiple transform invocations.
pub trait UpdateCache: Send + Sync {
    fn get(&self, key: &CacheKey) -> anyhow::Result<bool>;

    fn set(&self, key: &CacheKey, ttl: Duration) -> anyhow::Result<()>;
}


/// Process-local cache holding the expiry deadline per key.
#[derive(Default)]
pub struct MemUpdateCache {
    entries: DashMap<CacheKey, Instant>
}


impl MemUpdateCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drops expired entries. Long-lived processes should call this
    /// periodically; reads treat expired entries as absent either way.
    pub fn purge_expired(&self) {
        let now = Instant::now();
        self.entries.retain(|_, deadline| *deadline > now)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}


impl UpdateCache for MemUpdateCache {
    fn get(&self, key: &CacheKey) -> anyhow::Result<bool> {
        Ok(self.entries.get(key).map_or(false, |deadline| *deadline > Instant::now()))
    }

    fn set(&self, key: &CacheKey, ttl: Duration) -> anyhow::Result<()> {
        self.entries.insert(*key, Instant::now() + ttl);
        Ok(())
    }
}


#[cfg(test)]
mod tests {
    use super::*;


    fn key(byte: u8) -> CacheKey {
        CacheKey {
            chain: 1,
            address: Address::repeat_byte(byte),
            asset: Asset::Native
        }
    }

    #[test]
    fn set_then_get() {
        let cache = MemUpdateCache::new();
        assert!(!cache.get(&key(1)).unwrap());
        cache.set(&key(1), Duration::from_secs(60)).unwrap();
        assert!(cache.get(&key(1)).unwrap());
        assert!(!cache.get(&key(2)).unwrap());
    }

    #[test]
    fn entries_expire() {
        let cache = MemUpdateCache::new();
        cache.set(&key(1), Duration::from_millis(5)).unwrap();
        std::thread::sleep(Duration::from_millis(20));
        assert!(!cache.get(&key(1)).unwrap());

        cache.set(&key(2), Duration::from_secs(60)).unwrap();
        cache.purge_expired();
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn token_and_native_assets_are_distinct_keys() {
        let cache = MemUpdateCache::new();
        let token = CacheKey {
            asset: Asset::Token(Address::repeat_byte(0x70)),
            ..key(1)
        };
        cache.set(&key(1), Duration::from_secs(60)).unwrap();
        assert!(!cache.get(&token).unwrap());
    }
}
