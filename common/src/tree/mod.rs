pub mod core;

pub use self::core::{Net, Node, NodeRole, Segment, SteinerTree};
