//! Input and output containers seen by the popcount service

use crate::dtype::{ElementType, SupportedWidth};

/// Typed element storage of an array
#[derive(Debug, Clone, PartialEq)]
pub enum ArrayData {
    U8(Vec<u8>),
    U16(Vec<u16>),
    U32(Vec<u32>),
    U64(Vec<u64>),
    I8(Vec<i8>),
    I16(Vec<i16>),
    I32(Vec<i32>),
    I64(Vec<i64>),
    F32(Vec<f32>),
    F64(Vec<f64>),
    Bool(Vec<bool>),
    Str(Vec<String>),
}

macro_rules! array_data_from {
    ($($t:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<Vec<$t>> for ArrayData {
                fn from(values: Vec<$t>) -> Self {
                    ArrayData::$variant(values)
                }
            }
        )*
    };
}

array_data_from!(
    u8 => U8, u16 => U16, u32 => U32, u64 => U64,
    i8 => I8, i16 => I16, i32 => I32, i64 => I64,
    f32 => F32, f64 => F64, bool => Bool, String => Str,
);

impl ArrayData {
    pub fn element_type(&self) -> ElementType {
        match self {
            ArrayData::U8(_) => ElementType::U8,
            ArrayData::U16(_) => ElementType::U16,
            ArrayData::U32(_) => ElementType::U32,
            ArrayData::U64(_) => ElementType::U64,
            ArrayData::I8(_) => ElementType::I8,
            ArrayData::I16(_) => ElementType::I16,
            ArrayData::I32(_) => ElementType::I32,
            ArrayData::I64(_) => ElementType::I64,
            ArrayData::F32(_) => ElementType::F32,
            ArrayData::F64(_) => ElementType::F64,
            ArrayData::Bool(_) => ElementType::Bool,
            ArrayData::Str(_) => ElementType::Str,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            ArrayData::U8(v) => v.len(),
            ArrayData::U16(v) => v.len(),
            ArrayData::U32(v) => v.len(),
            ArrayData::U64(v) => v.len(),
            ArrayData::I8(v) => v.len(),
            ArrayData::I16(v) => v.len(),
            ArrayData::I32(v) => v.len(),
            ArrayData::I64(v) => v.len(),
            ArrayData::F32(v) => v.len(),
            ArrayData::F64(v) => v.len(),
            ArrayData::Bool(v) => v.len(),
            ArrayData::Str(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A dense array with a declared element type and a shape
#[derive(Debug, Clone, PartialEq)]
pub struct NdArray {
    shape: Vec<usize>,
    data: ArrayData,
}

impl NdArray {
    /// 1-D array over `values`
    pub fn from_vec(values: impl Into<ArrayData>) -> Self {
        let data = values.into();
        Self {
            shape: vec![data.len()],
            data,
        }
    }

    /// Array with an explicit shape; `None` if the shape does not cover the data
    pub fn with_shape(shape: Vec<usize>, values: impl Into<ArrayData>) -> Option<Self> {
        let data = values.into();
        if shape.iter().product::<usize>() != data.len() {
            return None;
        }
        Some(Self { shape, data })
    }

    /// Zero-dimensional array holding one value
    pub fn scalar(value: impl Into<ArrayData>) -> Option<Self> {
        Self::with_shape(Vec::new(), value)
    }

    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    pub fn ndim(&self) -> usize {
        self.shape.len()
    }

    pub fn data(&self) -> &ArrayData {
        &self.data
    }

    pub fn element_type(&self) -> ElementType {
        self.data.element_type()
    }

    /// Extent of the first axis
    pub fn len(&self) -> usize {
        self.shape.first().copied().unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// One element of a list-like input
#[derive(Debug, Clone, PartialEq)]
pub enum Item {
    Int(i128),
    Float(f64),
    Bool(bool),
    Text(String),
    Seq(Vec<Item>),
}

macro_rules! item_from_int {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Item {
                fn from(value: $t) -> Self {
                    Item::Int(value as i128)
                }
            }
        )*
    };
}

item_from_int!(u8, u16, u32, u64, i8, i16, i32, i64, i128);

impl From<f64> for Item {
    fn from(value: f64) -> Self {
        Item::Float(value)
    }
}

impl From<bool> for Item {
    fn from(value: bool) -> Self {
        Item::Bool(value)
    }
}

impl From<&str> for Item {
    fn from(value: &str) -> Self {
        Item::Text(value.to_string())
    }
}

impl<T: Into<Item>> From<Vec<T>> for Item {
    fn from(values: Vec<T>) -> Self {
        Item::Seq(values.into_iter().map(Into::into).collect())
    }
}

/// The argument passed to a popcount call
#[derive(Debug, Clone, PartialEq)]
pub enum Input {
    /// A typed array of any dimensionality
    Array(NdArray),
    /// A bare value that is not an array
    Scalar(Item),
    /// A (possibly nested) list-like value
    Sequence(Vec<Item>),
}

impl Input {
    pub fn sequence<T: Into<Item>>(items: Vec<T>) -> Self {
        Input::Sequence(items.into_iter().map(Into::into).collect())
    }
}

impl From<NdArray> for Input {
    fn from(array: NdArray) -> Self {
        Input::Array(array)
    }
}

/// Per-element bit counts, freshly allocated for each call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CountArray {
    counts: Vec<u8>,
    width: SupportedWidth,
}

impl CountArray {
    pub(crate) fn new(counts: Vec<u8>, width: SupportedWidth) -> Self {
        Self { counts, width }
    }

    pub(crate) fn empty() -> Self {
        Self::new(Vec::new(), SupportedWidth::W8)
    }

    /// Width each element was counted at
    pub fn width(&self) -> SupportedWidth {
        self.width
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.counts
    }

    pub fn into_vec(self) -> Vec<u8> {
        self.counts
    }
}
