mod cache;
mod indexer;
mod reorg;
mod transform;

pub use cache::*;
pub use indexer::*;
pub use reorg::*;
pub use transform::*;
