use crate::cache::{Asset, UpdateCache};
use crate::transform::{mark_balance_update, Transform, TransformOutput, BALANCE_UPDATE_TTL};
use anyhow::anyhow;
use axh_data::{TxRecord, TxStatus, COLUMN_TX};
use axh_primitives::{Block, ChainId, Name};
use axh_storage::{Item, KeySpace, CF_DATA};
use std::sync::Arc;
use std::time::Duration;


/// Indexes one `TxRecord` per transaction, attributed to both the sender
/// and the resolved recipient.
pub struct TxTransform {
    cache: Arc<dyn UpdateCache>,
    key_space: KeySpace,
    marker_ttl: Duration
}


impl TxTransform {
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


impl Transform for TxTransform {
    fn name(&self) -> Name {
        "transactions"
    }

    fn transform(&self, chain: ChainId, block: &Block) -> anyhow::Result<TransformOutput> {
        let mut out = TransformOutput::new();

        for tx in &block.transactions {
            let to = tx.resolved_to().ok_or_else(|| {
                anyhow!("transaction {} has neither recipient nor contract address", tx.hash)
            })?;

            let mut status = if tx.success { TxStatus::Success } else { TxStatus::Failed };
            let mut error = None;
            for call in &tx.internal {
                if let Some(msg) = &call.error {
                    if status == TxStatus::Success {
                        status = TxStatus::Partial;
                    }
                    error = Some(msg.clone());
                    break
                }
            }

            let record = TxRecord {
                hash: tx.hash,
                block_number: block.number,
                time: block.time,
                method: tx.method(),
                from: tx.from,
                to,
                value: tx.value,
                fee: tx.gas_price * tx.gas_used as u128,
                blob_fee: tx.blob_gas_price * tx.blob_gas_used as u128,
                gas_price: tx.gas_price,
                blob_gas_price: tx.blob_gas_price,
                status,
                error
            };
            let value = record.encode();

            for address in [tx.from, to] {
                let row = self.key_space.history_row_key(
                    chain,
                    &address,
                    block.number,
                    tx.index,
                    0
                )?;
                out.data.put(row, Item::new(CF_DATA, COLUMN_TX, value.clone()));

                mark_balance_update(
                    self.cache.as_ref(),
                    &self.key_space,
                    chain,
                    address,
                    Asset::Native,
                    self.marker_ttl,
                    &mut out.meta
                );
            }
        }

        Ok(out)
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::MemUpdateCache;
    use alloy_primitives::{Address, Bytes, B256, U256};
    use axh_primitives::{InternalCall, Transaction};


    fn transform() -> TxTransform {
        TxTransform::new(Arc::new(MemUpdateCache::new()), KeySpace::default())
    }

    fn block_with(tx: Transaction) -> Block {
        Block {
            number: 100,
            hash: B256::repeat_byte(0x01),
            time: 1_700_000_000,
            transactions: vec![tx]
        }
    }

    fn value_transfer() -> Transaction {
        Transaction {
            hash: B256::repeat_byte(0x02),
            from: Address::repeat_byte(0xaa),
            to: Some(Address::repeat_byte(0xbb)),
            value: U256::from(1000),
            gas_price: 10,
            gas_used: 21_000,
            success: true,
            ..Default::default()
        }
    }

    fn decode_first_record(out: &TransformOutput) -> TxRecord {
        let (_, items) = out.data.rows().next().unwrap();
        TxRecord::decode(&items[0].value).unwrap()
    }

    #[test]
    fn successful_internal_calls_keep_status_success() {
        let mut tx = value_transfer();
        tx.internal = vec![InternalCall::default(), InternalCall::default()];
        let out = transform().transform(1, &block_with(tx)).unwrap();
        let record = decode_first_record(&out);
        assert_eq!(record.status, TxStatus::Success);
        assert_eq!(record.error, None);
        assert_eq!(record.fee, 210_000);
    }

    #[test]
    fn first_internal_error_downgrades_to_partial() {
        let mut tx = value_transfer();
        tx.internal = vec![
            InternalCall::default(),
            InternalCall {
                error: Some("out of gas".to_string()),
                ..Default::default()
            },
            InternalCall {
                error: Some("revert".to_string()),
                ..Default::default()
            },
        ];
        let record = decode_first_record(&transform().transform(1, &block_with(tx)).unwrap());
        assert_eq!(record.status, TxStatus::Partial);
        assert_eq!(record.error, Some("out of gas".to_string()));
    }

    #[test]
    fn failed_top_level_call_never_becomes_partial() {
        let mut tx = value_transfer();
        tx.success = false;
        tx.internal = vec![InternalCall {
            error: Some("revert".to_string()),
            ..Default::default()
        }];
        let record = decode_first_record(&transform().transform(1, &block_with(tx)).unwrap());
        assert_eq!(record.status, TxStatus::Failed);
    }

    #[test]
    fn short_calldata_yields_no_selector() {
        let mut tx = value_transfer();
        tx.input = Bytes::from(vec![0xab, 0xcd]);
        let record = decode_first_record(&transform().transform(1, &block_with(tx)).unwrap());
        assert_eq!(record.method, None);
    }

    #[test]
    fn contract_creation_resolves_to_deployed_address() {
        let deployed = Address::repeat_byte(0xcc);
        let mut tx = value_transfer();
        tx.to = None;
        tx.contract_address = Some(deployed);
        let record = decode_first_record(&transform().transform(1, &block_with(tx)).unwrap());
        assert_eq!(record.to, deployed);
    }

    #[test]
    fn transaction_without_recipient_is_a_transform_error() {
        let mut tx = value_transfer();
        tx.to = None;
        assert!(transform().transform(1, &block_with(tx)).is_err());
    }
}
