mod codec;
mod records;

pub use records::*;

use alloy_primitives::{b256, B256};


// Column qualifiers of history cells in the DATA family.
pub const COLUMN_TX: &str = "tx";
pub const COLUMN_ERC20: &str = "erc20";

/// Column qualifier of block-keys records in the METADATA family.
pub const COLUMN_BLOCK_KEYS: &str = "keys";


/// keccak256("Transfer(address,address,uint256)")
pub const ERC20_TRANSFER_TOPIC: B256 =
    b256!("0xddf252ad1be2c89b69c2b068fc378daa952ba7f163c4a11628f55a4df523b3ef");
