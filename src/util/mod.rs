mod bounded_fifo;
mod offset_vec;
mod trie;
mod weak_map;

pub use bounded_fifo::*;
pub use offset_vec::*;
pub use trie::*;
pub use weak_map::*;
