use crate::{BlockNumber, ItemIndex};
use alloy_primitives::{Address, Bytes, Selector, B256, U256};


/// Execution-layer block as delivered by the upstream node client.
///
/// The indexing core only ever reads these shapes, it never fetches or
/// mutates them.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Default, Clone, Eq, PartialEq)]
pub struct Block {
    pub number: BlockNumber,
    pub hash: B256,
    pub time: i64,
    pub transactions: Vec<Transaction>
}


#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Default, Clone, Eq, PartialEq)]
pub struct Transaction {
    pub hash: B256,
    pub index: ItemIndex,
    pub from: Address,
    /// Declared recipient. `None` for contract creations.
    pub to: Option<Address>,
    /// Deployed contract address, when this transaction created a contract.
    pub contract_address: Option<Address>,
    pub value: U256,
    pub input: Bytes,
    pub gas_price: u128,
    pub gas_used: u64,
    pub blob_gas_price: u128,
    pub blob_gas_used: u64,
    /// Top-level call outcome.
    pub success: bool,
    pub logs: Vec<Log>,
    pub internal: Vec<InternalCall>
}


impl Transaction {
    /// The recipient the history should attribute the transaction to:
    /// the deployed contract address iff the transaction created a contract,
    /// otherwise the declared recipient.
    pub fn resolved_to(&self) -> Option<Address> {
        self.contract_address.or(self.to)
    }

    /// 4-byte method selector, `None` when calldata is shorter than 4 bytes.
    pub fn method(&self) -> Option<Selector> {
        (self.input.len() >= 4).then(|| Selector::from_slice(&self.input[..4]))
    }
}


#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Default, Clone, Eq, PartialEq)]
pub struct Log {
    pub address: Address,
    pub index: ItemIndex,
    pub topics: Vec<B256>,
    pub data: Bytes
}


#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Default, Clone, Eq, PartialEq)]
pub struct InternalCall {
    pub from: Address,
    pub to: Address,
    pub value: U256,
    pub error: Option<String>
}
