use crate::cache::{Asset, UpdateCache};
use crate::transform::{mark_balance_update, Transform, TransformOutput, BALANCE_UPDATE_TTL};
use alloy_primitives::{Address, U256};
use axh_data::{Erc20Record, COLUMN_ERC20, ERC20_TRANSFER_TOPIC};
use axh_primitives::{Block, ChainId, Name};
use axh_storage::{Item, KeySpace, CF_DATA};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;


/// Indexes one `Erc20Record` per standard Transfer log, attributed to both
/// transfer parties. Non-conforming logs are skipped, never errors.
pub struct Erc20Transform {
    cache: Arc<dyn UpdateCache>,
    key_space: KeySpace,
    marker_ttl: Duration
}


impl Erc20Transform {
    pub fn new(cache: Arc<dyn UpdateCache>, key_space: KeySpace) -> Self {
        Self {
            cache,
            key_space,
            marker_ttl: BALANCE_UPDATE_TTL
        }
    }

    pub fn with_marker_ttl(mut self, ttl: Duration) -> Self {
        self.marker_ttl = ttl;
        self
    }
}


impl Transform for Erc20Transform {
    fn name(&self) -> Name {
        "erc20_transfers"
    }

    fn transform(&self, chain: ChainId, block: &Block) -> anyhow::Result<TransformOutput> {
        let mut out = TransformOutput::new();

        for tx in &block.transactions {
            for log in &tx.logs {
                if log.topics.first() != Some(&ERC20_TRANSFER_TOPIC) {
                    continue
                }
                if log.topics.len() != 3 {
                    // Transfer signature with a non-standard topic layout
                    debug!(
                        token = %log.address,
                        topics = log.topics.len(),
                        "skipping malformed transfer log"
                    );
                    continue
                }
                if log.data.len() != 32 {
                    debug!(token = %log.address, "skipping transfer log with undecodable amount");
                    continue
                }

                let from = Address::from_word(log.topics[1]);
                let to = Address::from_word(log.topics[2]);

                let record = Erc20Record {
                    tx_hash: tx.hash,
                    block_number: block.number,
                    time: block.time,
                    token_address: log.address,
                    from,
                    to,
                    value: U256::from_be_slice(&log.data),
                    tx_index: tx.index,
                    log_index: log.index
                };
                let value = record.encode();

                for address in [from, to] {
                    let row = self.key_space.history_row_key(
                        chain,
                        &address,
                        block.number,
                        tx.index,
                        log.index
                    )?;
                    out.data.put(row, Item::new(CF_DATA, COLUMN_ERC20, value.clone()));

                    mark_balance_update(
                        self.cache.as_ref(),
                        &self.key_space,
                        chain,
                        address,
                        Asset::Token(log.address),
                        self.marker_ttl,
                        &mut out.meta
                    );
                }
            }
        }

        Ok(out)
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::MemUpdateCache;
    use alloy_primitives::{Bytes, B256};
    use axh_primitives::{Log, Transaction};


    fn transform() -> Erc20Transform {
        Erc20Transform::new(Arc::new(MemUpdateCache::new()), KeySpace::default())
    }

    fn transfer_log(from: Address, to: Address, value: u64) -> Log {
        Log {
            address: Address::repeat_byte(0x70),
            index: 0,
            topics: vec![
                ERC20_TRANSFER_TOPIC,
                B256::left_padding_from(from.as_slice()),
                B256::left_padding_from(to.as_slice()),
            ],
            data: Bytes::from(U256::from(value).to_be_bytes::<32>().to_vec())
        }
    }

    fn block_with_logs(logs: Vec<Log>) -> Block {
        Block {
            number: 200,
            hash: B256::repeat_byte(0x03),
            time: 1_700_000_000,
            transactions: vec![Transaction {
                hash: B256::repeat_byte(0x04),
                to: Some(Address::repeat_byte(0x70)),
                success: true,
                logs,
                ..Default::default()
            }]
        }
    }

    #[test]
    fn standard_transfer_is_decoded() {
        let from = Address::repeat_byte(0xaa);
        let to = Address::repeat_byte(0xcc);
        let out = transform()
            .transform(1, &block_with_logs(vec![transfer_log(from, to, 500)]))
            .unwrap();

        // attributed to both parties
        assert_eq!(out.data.num_rows(), 2);
        let (_, items) = out.data.rows().next().unwrap();
        let record = Erc20Record::decode(&items[0].value).unwrap();
        assert_eq!(record.from, from);
        assert_eq!(record.to, to);
        assert_eq!(record.value, U256::from(500));
        assert_eq!(record.token_address, Address::repeat_byte(0x70));
    }

    #[test]
    fn wrong_topic_count_is_skipped() {
        let mut log = transfer_log(Address::repeat_byte(0xaa), Address::repeat_byte(0xcc), 1);
        log.topics.pop();
        let out = transform().transform(1, &block_with_logs(vec![log])).unwrap();
        assert!(out.data.is_empty());
        assert!(out.meta.is_empty());
    }

    #[test]
    fn foreign_topic0_is_skipped() {
        let mut log = transfer_log(Address::repeat_byte(0xaa), Address::repeat_byte(0xcc), 1);
        log.topics[0] = B256::repeat_byte(0xee);
        let out = transform().transform(1, &block_with_logs(vec![log])).unwrap();
        assert!(out.data.is_empty());
    }

    #[test]
    fn undecodable_amount_is_skipped() {
        let mut log = transfer_log(Address::repeat_byte(0xaa), Address::repeat_byte(0xcc), 1);
        log.data = Bytes::from(vec![0x01, 0x02]);
        let out = transform().transform(1, &block_with_logs(vec![log])).unwrap();
        assert!(out.data.is_empty());
    }
}
