//! Secondary indexes.
//!
//! - **BitVector**: Compact growable bit set with word-wise AND
//! - **BitmapIndex**: Per-column map from value to the positions holding it
//!
//! Bit `p` of a value's vector refers to the record at global position `p`,
//! i.e. the record's rank across all pages in page order.

pub mod bit_vector;
pub mod bitmap;

pub use bit_vector::BitVector;
pub use bitmap::BitmapIndex;
