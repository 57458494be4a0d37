//! Typed array views over one flat byte buffer.
//!
//! Every column kind owns a single `Vec<u8>` and maps a logical index onto a
//! byte range inside it:
//!
//! - [`BooleanColumn`]: one byte per element, `1` is `true`.
//! - [`FixedBytesColumn`]: `chars` bytes of NUL padded UTF-8 per element.
//! - [`CodePointColumn`]: `chars` little-endian `u32` code points per element.
//! - [`VarBytesColumn`]: a self-describing stream of length prefixed records
//!   with a derived offset index.
//!
//! All of them implement the [`Column`] trait.
//!
//! ## Variable-length wire format
//!
//! ```text
//! i32 record_count
//! record_count * (i32 length, length bytes)
//! ```
//!
//! Integers are little-endian, there is no padding and nothing after the last
//! record.
//!
//! ## Serde
//!
//! [`VarBytesColumn`] and [`BooleanColumn`] serialize as byte strings of their
//! buffer. The fixed-width string columns serialize as a `(chars, buffer)`
//! tuple. Deserializing validates the buffer like `from_bytes` does.

mod err;
pub use err::ColumnarError;
mod column;
pub use column::{
    boolean::BooleanColumn, code_point::CodePointColumn, fixed_bytes::FixedBytesColumn,
    var_bytes::VarBytesColumn, Column,
};
mod columnar_internal;
pub mod iterable;
pub use iterable::ColumnIter;
mod serde_impl;
