use crate::records::{Erc20Record, TxRecord, TxStatus};
use alloy_primitives::{Address, Selector, B256, U256};
use borsh::{BorshDeserialize, BorshSerialize};
use std::io;


// Borsh layouts over raw fixed-width byte fields; alloy types don't carry
// borsh impls of their own.


impl BorshSerialize for TxRecord {
    fn serialize<W: io::Write>(&self, writer: &mut W) -> io::Result<()> {
        self.hash.0.serialize(writer)?;
        self.block_number.serialize(writer)?;
        self.time.serialize(writer)?;
        self.method.map(|selector| selector.0).serialize(writer)?;
        self.from.0 .0.serialize(writer)?;
        self.to.0 .0.serialize(writer)?;
        self.value.to_be_bytes::<32>().serialize(writer)?;
        self.fee.serialize(writer)?;
        self.blob_fee.serialize(writer)?;
        self.gas_price.serialize(writer)?;
        self.blob_gas_price.serialize(writer)?;
        self.status.serialize(writer)?;
        self.error.serialize(writer)
    }
}


impl BorshDeserialize for TxRecord {
    fn deserialize_reader<R: io::Read>(reader: &mut R) -> io::Result<Self> {
        Ok(Self {
            hash: B256::new(<[u8; 32]>::deserialize_reader(reader)?),
            block_number: u64::deserialize_reader(reader)?,
            time: i64::deserialize_reader(reader)?,
            method: Option::<[u8; 4]>::deserialize_reader(reader)?.map(Selector::new),
            from: Address::new(<[u8; 20]>::deserialize_reader(reader)?),
            to: Address::new(<[u8; 20]>::deserialize_reader(reader)?),
            value: U256::from_be_bytes(<[u8; 32]>::deserialize_reader(reader)?),
            fee: u128::deserialize_reader(reader)?,
            blob_fee: u128::deserialize_reader(reader)?,
            gas_price: u128::deserialize_reader(reader)?,
            blob_gas_price: u128::deserialize_reader(reader)?,
            status: TxStatus::deserialize_reader(reader)?,
            error: Option::<String>::deserialize_reader(reader)?
        })
    }
}


impl BorshSerialize for Erc20Record {
    fn serialize<W: io::Write>(&self, writer: &mut W) -> io::Result<()> {
        self.tx_hash.0.serialize(writer)?;
        self.block_number.serialize(writer)?;
        self.time.serialize(writer)?;
        self.token_address.0 .0.serialize(writer)?;
        self.from.0 .0.serialize(writer)?;
        self.to.0 .0.serialize(writer)?;
        self.value.to_be_bytes::<32>().serialize(writer)?;
        self.tx_index.serialize(writer)?;
        self.log_index.serialize(writer)
    }
}


impl BorshDeserialize for Erc20Record {
    fn deserialize_reader<R: io::Read>(reader: &mut R) -> io::Result<Self> {
        Ok(Self {
            tx_hash: B256::new(<[u8; 32]>::deserialize_reader(reader)?),
            block_number: u64::deserialize_reader(reader)?,
            time: i64::deserialize_reader(reader)?,
            token_address: Address::new(<[u8; 20]>::deserialize_reader(reader)?),
            from: Address::new(<[u8; 20]>::deserialize_reader(reader)?),
            to: Address::new(<[u8; 20]>::deserialize_reader(reader)?),
            value: U256::from_be_bytes(<[u8; 32]>::deserialize_reader(reader)?),
            tx_index: u32::deserialize_reader(reader)?,
            log_index: u32::deserialize_reader(reader)?
        })
    }
}


#[cfg(test)]
mod tests {
    use super::*;


    #[test]
    fn tx_record_codec() {
        let record = TxRecord {
            hash: B256::repeat_byte(0x11),
            block_number: 17_000_000,
            time: 1_700_000_000,
            method: Some(Selector::new([0xa9, 0x05, 0x9c, 0xbb])),
            from: Address::repeat_byte(0xaa),
            to: Address::repeat_byte(0xbb),
            value: U256::from(123456789u64),
            fee: 21_000 * 30_000_000_000,
            blob_fee: 0,
            gas_price: 30_000_000_000,
            blob_gas_price: 0,
            status: TxStatus::Partial,
            error: Some("out of gas".to_string())
        };
        assert_eq!(TxRecord::decode(&record.encode()).unwrap(), record);
    }

    #[test]
    fn erc20_record_codec() {
        let record = Erc20Record {
            tx_hash: B256::repeat_byte(0x22),
            block_number: 42,
            time: 1_700_000_000,
            token_address: Address::repeat_byte(0x70),
            from: Address::repeat_byte(0xaa),
            to: Address::repeat_byte(0xcc),
            value: U256::MAX,
            tx_index: 3,
            log_index: 11
        };
        assert_eq!(Erc20Record::decode(&record.encode()).unwrap(), record);
    }
}
