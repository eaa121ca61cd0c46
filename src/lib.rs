//! Per-element population count over 1-D integer arrays.
//!
//! Two entry points share one counting core:
//!
//! - [`count_bits_strict`] accepts only 1-D arrays whose dtype is on the
//!   configured allow-list (`uint8` and `uint64` by default).
//! - [`count_bits_permissive`] coerces other integer dtypes, bools, integral
//!   floats and plain sequences to an unsigned width first.
//!
//! ```
//! use popcount_kernel::{count_bits, Input, NdArray};
//!
//! let xs = Input::from(NdArray::from_vec(vec![0u8, 1, 2, 3, 6, 7, 254, 255]));
//! let counts = count_bits(&xs).unwrap();
//! assert_eq!(counts.as_slice(), &[0, 1, 1, 2, 2, 3, 7, 8]);
//! ```
//!
//! With the `python` feature the same functions are exported to Python as
//! `popcount` (permissive) and `popcount_strict`, returning `numpy.uint8`
//! arrays.

mod array;
mod config;
mod dtype;
mod error;
mod popcount;
mod service;

#[cfg(feature = "python")]
mod python;

pub use array::{ArrayData, CountArray, Input, Item, NdArray};
pub use config::{AllowList, KernelConfig, SignedPromotion, Strategy};
pub use dtype::{ElementType, Signedness, SupportedWidth};
pub use error::{PopcountError, Result};
pub use popcount::{
    count_slice, popcount, popcount_integer, popcount_raw, table_popcount, table_popcount_u64,
    BitCount, BYTE_TABLE,
};
pub use service::{
    count_bits, count_bits_permissive, count_bits_strict, PERMISSIVE_ENTRY, STRICT_ENTRY,
};
