//! Element types, widths and signedness used for dispatch

use std::fmt;

/// Bit widths the counting core handles
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SupportedWidth {
    W8,
    W16,
    W32,
    W64,
}

impl SupportedWidth {
    #[inline]
    pub fn bits(self) -> u32 {
        match self {
            SupportedWidth::W8 => 8,
            SupportedWidth::W16 => 16,
            SupportedWidth::W32 => 32,
            SupportedWidth::W64 => 64,
        }
    }

    /// Smallest width that holds `value` without loss
    pub fn smallest_for(value: u64) -> Self {
        if value <= u8::MAX as u64 {
            SupportedWidth::W8
        } else if value <= u16::MAX as u64 {
            SupportedWidth::W16
        } else if value <= u32::MAX as u64 {
            SupportedWidth::W32
        } else {
            SupportedWidth::W64
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Signedness {
    Unsigned,
    Signed,
}

/// Declared element type of an array, named after its numpy dtype
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementType {
    U8,
    U16,
    U32,
    U64,
    I8,
    I16,
    I32,
    I64,
    F32,
    F64,
    Bool,
    Str,
}

impl ElementType {
    /// Dispatch key for integer types, `None` for everything else
    pub fn integer_kind(self) -> Option<(SupportedWidth, Signedness)> {
        use ElementType::*;
        use Signedness::*;
        use SupportedWidth::*;
        match self {
            U8 => Some((W8, Unsigned)),
            U16 => Some((W16, Unsigned)),
            U32 => Some((W32, Unsigned)),
            U64 => Some((W64, Unsigned)),
            I8 => Some((W8, Signed)),
            I16 => Some((W16, Signed)),
            I32 => Some((W32, Signed)),
            I64 => Some((W64, Signed)),
            F32 | F64 | Bool | Str => None,
        }
    }

    /// numpy dtype name
    pub fn name(self) -> &'static str {
        match self {
            ElementType::U8 => "uint8",
            ElementType::U16 => "uint16",
            ElementType::U32 => "uint32",
            ElementType::U64 => "uint64",
            ElementType::I8 => "int8",
            ElementType::I16 => "int16",
            ElementType::I32 => "int32",
            ElementType::I64 => "int64",
            ElementType::F32 => "float32",
            ElementType::F64 => "float64",
            ElementType::Bool => "bool",
            ElementType::Str => "str",
        }
    }
}

impl fmt::Display for ElementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "np.{}", self.name())
    }
}
