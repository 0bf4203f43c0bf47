mod block;

pub use block::*;


pub type Name = &'static str;

pub type ChainId = u64;

pub type BlockNumber = u64;

pub type ItemIndex = u32;
