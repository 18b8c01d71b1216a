//! Associative rows and the decoder that produces them.

pub mod decode;
pub mod row;

pub use decode::decode;
pub use row::{AssocRow, Rows};
