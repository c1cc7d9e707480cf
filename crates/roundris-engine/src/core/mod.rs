pub use self::{adjacency::*, board::*, piece::*};

pub(crate) mod adjacency;
pub(crate) mod board;
pub(crate) mod piece;
