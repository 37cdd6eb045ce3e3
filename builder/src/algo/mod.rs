pub mod heap;
pub mod prim;

pub use heap::IndexedHeap;
pub use prim::{TreeBuilder, build_steiner_tree, default_edge_cost};
