//! Population count utilities over fixed-width unsigned integers

use crate::config::Strategy;

/// Bit counts of every byte value, built at compile time
pub const BYTE_TABLE: [u8; 256] = build_byte_table();

const fn build_byte_table() -> [u8; 256] {
    let mut table = [0u8; 256];
    let mut i = 0;
    while i < 256 {
        // table[i] = table[i / 2] + lowest bit
        table[i] = table[i >> 1] + (i & 1) as u8;
        i += 1;
    }
    table
}

/// Fast population count using built-in instruction
#[inline]
pub fn popcount(x: u64) -> u32 {
    x.count_ones()
}

/// Population count by summing byte-table lookups over `w/8` chunks
#[inline]
pub fn table_popcount(x: u64, width_bytes: u32) -> u32 {
    let mut count = 0u32;
    for byte_index in 0..width_bytes {
        let shift = byte_index * 8;
        let chunk = (x >> shift) & 0xff;
        count += BYTE_TABLE[chunk as usize] as u32;
    }
    count
}

/// An unsigned integer whose set bits can be counted
pub trait BitCount: Copy {
    /// Width of the type in bits
    const WIDTH: u32;

    fn to_u64(self) -> u64;

    #[inline]
    fn count_intrinsic(self) -> u8 {
        popcount(self.to_u64()) as u8
    }

    #[inline]
    fn count_table(self) -> u8 {
        table_popcount(self.to_u64(), Self::WIDTH / 8) as u8
    }

    #[inline]
    fn count_with(self, strategy: Strategy) -> u8 {
        match strategy {
            Strategy::Intrinsic => self.count_intrinsic(),
            Strategy::Table => self.count_table(),
        }
    }
}

macro_rules! impl_bit_count {
    ($($t:ty),*) => {
        $(
            impl BitCount for $t {
                const WIDTH: u32 = <$t>::BITS;

                #[inline]
                fn to_u64(self) -> u64 {
                    self as u64
                }
            }
        )*
    };
}

impl_bit_count!(u8, u16, u32, u64);

/// Count set bits of every element, one `u8` per element
pub fn count_slice<T: BitCount>(xs: &[T], strategy: Strategy) -> Vec<u8> {
    match strategy {
        Strategy::Intrinsic => xs.iter().map(|&x| x.count_intrinsic()).collect(),
        Strategy::Table => xs.iter().map(|&x| x.count_table()).collect(),
    }
}

/// Byte-table reference over `u64` values, mask-and-shift per byte
pub fn table_popcount_u64(xs: &[u64]) -> Vec<u8> {
    xs.iter().map(|&x| table_popcount(x, 8) as u8).collect()
}

/// Count bits of raw bytes, widened to `i32` like an R integer vector
pub fn popcount_raw(xs: &[u8]) -> Vec<i32> {
    xs.iter().map(|&x| BYTE_TABLE[x as usize] as i32).collect()
}

/// Count bits of 32-bit integers; `None` (NA) stays `None`
pub fn popcount_integer(xs: &[Option<i32>]) -> Vec<Option<i32>> {
    xs.iter()
        .map(|x| x.map(|v| (v as u32).count_ones() as i32))
        .collect()
}
