use alloy_primitives::{Address, Selector, B256, U256};
use axh_primitives::{BlockNumber, ItemIndex};
use borsh::{BorshDeserialize, BorshSerialize};


/// Outcome of an indexed transaction.
///
/// `Partial` means the top-level call succeeded while at least one internal
/// call failed. A record only ever moves Success -> Partial, never back.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(BorshSerialize, BorshDeserialize, Debug, Copy, Clone, Eq, PartialEq)]
pub enum TxStatus {
    Success,
    Partial,
    Failed
}


/// One indexed native transaction.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct TxRecord {
    pub hash: B256,
    pub block_number: BlockNumber,
    pub time: i64,
    /// `None` when calldata was shorter than 4 bytes.
    pub method: Option<Selector>,
    pub from: Address,
    /// Deployed contract address when the transaction created a contract,
    /// the declared recipient otherwise.
    pub to: Address,
    pub value: U256,
    /// gas_price * gas_used
    pub fee: u128,
    /// blob_gas_price * blob_gas_used
    pub blob_fee: u128,
    // raw prices are kept for downstream repricing
    pub gas_price: u128,
    pub blob_gas_price: u128,
    pub status: TxStatus,
    /// First internal-call error message, when any internal call failed.
    pub error: Option<String>
}


/// One indexed ERC-20 transfer.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Erc20Record {
    pub tx_hash: B256,
    pub block_number: BlockNumber,
    pub time: i64,
    pub token_address: Address,
    pub from: Address,
    pub to: Address,
    pub value: U256,
    // (tx_index, log_index) total-orders transfers within a block
    pub tx_index: ItemIndex,
    pub log_index: ItemIndex
}


impl TxRecord {
    pub fn encode(&self) -> Vec<u8> {
        borsh::to_vec(self).unwrap()
    }

    pub fn decode(bytes: &[u8]) -> anyhow::Result<Self> {
        Ok(borsh::from_slice(bytes)?)
    }
}


impl Erc20Record {
    pub fn encode(&self) -> Vec<u8> {
        borsh::to_vec(self).unwrap()
    }

    pub fn decode(bytes: &[u8]) -> anyhow::Result<Self> {
        Ok(borsh::from_slice(bytes)?)
    }
}
