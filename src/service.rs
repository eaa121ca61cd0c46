//! Validation and width dispatch in front of the counting core
//!
//! Two entry points share the same counting code but differ in what they
//! accept:
//!
//! - [`count_bits_strict`] takes a 1-D array whose dtype is on the configured
//!   allow-list and counts at that dtype's width.
//! - [`count_bits_permissive`] also takes other integer dtypes, bool, integral
//!   floats and list-like input, promoting everything that is not `uint8` to
//!   64 bits before counting.
//!
//! Both reject bad input before counting anything. Empty 1-D input always
//! yields an empty result, whatever its element type.

use log::{debug, trace};

use crate::array::{ArrayData, CountArray, Input, Item, NdArray};
use crate::config::{KernelConfig, SignedPromotion, Strategy};
use crate::dtype::{Signedness, SupportedWidth};
use crate::error::{PopcountError, Result};
use crate::popcount::{count_slice, BitCount};

/// Name reported when the strict entry point is called without input
pub const STRICT_ENTRY: &str = "popcount_strict";
/// Name reported when the permissive entry point is called without input
pub const PERMISSIVE_ENTRY: &str = "popcount";

/// Strict-mode count with the default configuration
pub fn count_bits(input: &Input) -> Result<CountArray> {
    count_bits_strict(Some(input), &KernelConfig::default())
}

/// Count set bits of a 1-D array whose dtype is on the allow-list
pub fn count_bits_strict(input: Option<&Input>, config: &KernelConfig) -> Result<CountArray> {
    let input = input.ok_or(PopcountError::MissingArgument {
        function: STRICT_ENTRY,
        argument: "xs",
    })?;

    let array = match input {
        Input::Array(array) => array,
        Input::Scalar(_) => return Err(scalar_not_array()),
        Input::Sequence(_) => {
            trace!("Strict mode rejects list-like input");
            return Err(type_mismatch(config));
        }
    };
    check_one_dimensional(array, config)?;

    if array.is_empty() {
        return Ok(CountArray::empty());
    }

    let ty = array.element_type();
    if !config.allow_list.contains(ty) {
        trace!("Strict mode rejects dtype {ty}");
        return Err(type_mismatch(config));
    }

    let (width, _) = ty.integer_kind().ok_or_else(|| type_mismatch(config))?;
    let strategy = config.strategy;
    let counts = count_integers(array.data(), width, strategy);
    debug!(
        "Strict count of {} {} elements at {} bits ({:?})",
        counts.len(),
        ty,
        width.bits(),
        strategy
    );
    Ok(CountArray::new(counts, width))
}

/// Count set bits after best-effort coercion to an unsigned width
pub fn count_bits_permissive(
    input: Option<&Input>,
    config: &KernelConfig,
) -> Result<CountArray> {
    let input = input.ok_or(PopcountError::MissingArgument {
        function: PERMISSIVE_ENTRY,
        argument: "xs",
    })?;

    match input {
        Input::Scalar(_) => Err(scalar_not_array()),
        Input::Array(array) => permissive_array(array, config),
        Input::Sequence(items) => permissive_sequence(items, config),
    }
}

fn permissive_array(array: &NdArray, config: &KernelConfig) -> Result<CountArray> {
    check_one_dimensional(array, config)?;
    if array.is_empty() {
        return Ok(CountArray::empty());
    }

    let strategy = config.strategy;
    let (counts, width) = match array.element_type().integer_kind() {
        Some((declared, signedness)) => {
            let width = promoted_width(declared, signedness, config.signed_promotion);
            (count_integers(array.data(), width, strategy), width)
        }
        None => (count_non_integers(array.data(), strategy)?, SupportedWidth::W64),
    };
    debug!(
        "Permissive count of {} {} elements at {} bits ({:?}, {:?})",
        counts.len(),
        array.element_type(),
        width.bits(),
        strategy,
        config.signed_promotion
    );
    Ok(CountArray::new(counts, width))
}

/// Width permissive mode counts an integer dtype at
fn promoted_width(
    declared: SupportedWidth,
    signedness: Signedness,
    promotion: SignedPromotion,
) -> SupportedWidth {
    match (signedness, promotion) {
        (Signedness::Unsigned, _) if declared == SupportedWidth::W8 => SupportedWidth::W8,
        (Signedness::Signed, SignedPromotion::NativeWidth) => declared,
        _ => SupportedWidth::W64,
    }
}

/// Count integer data at `width`; signed values narrower than 64 bits are
/// sign-extended only when `width` is 64
fn count_integers(data: &ArrayData, width: SupportedWidth, strategy: Strategy) -> Vec<u8> {
    let extend = width == SupportedWidth::W64;
    match data {
        ArrayData::U8(xs) => count_slice(xs, strategy),
        ArrayData::U16(xs) => count_slice(xs, strategy),
        ArrayData::U32(xs) => count_slice(xs, strategy),
        ArrayData::U64(xs) => count_slice(xs, strategy),
        ArrayData::I8(xs) if extend => count_mapped(xs, |x| x as i64 as u64, strategy),
        ArrayData::I16(xs) if extend => count_mapped(xs, |x| x as i64 as u64, strategy),
        ArrayData::I32(xs) if extend => count_mapped(xs, |x| x as i64 as u64, strategy),
        ArrayData::I8(xs) => count_mapped(xs, |x| x as u8, strategy),
        ArrayData::I16(xs) => count_mapped(xs, |x| x as u16, strategy),
        ArrayData::I32(xs) => count_mapped(xs, |x| x as u32, strategy),
        ArrayData::I64(xs) => count_mapped(xs, |x| x as u64, strategy),
        // no integer kind, callers route these through count_non_integers
        ArrayData::F32(_) | ArrayData::F64(_) | ArrayData::Bool(_) | ArrayData::Str(_) => {
            Vec::new()
        }
    }
}

/// Bool and integral float data counted at 64 bits; str data cannot convert
fn count_non_integers(data: &ArrayData, strategy: Strategy) -> Result<Vec<u8>> {
    let values = match data {
        ArrayData::Bool(xs) => xs.iter().map(|&x| u64::from(x)).collect(),
        ArrayData::F32(xs) => xs
            .iter()
            .enumerate()
            .map(|(i, &x)| float_to_u64(i, x as f64))
            .collect::<Result<Vec<_>>>()?,
        ArrayData::F64(xs) => xs
            .iter()
            .enumerate()
            .map(|(i, &x)| float_to_u64(i, x))
            .collect::<Result<Vec<_>>>()?,
        ArrayData::Str(xs) => {
            trace!("Permissive mode cannot convert str dtype");
            let reason = format!("non-numeric value {:?}", xs[0]);
            return Err(PopcountError::conversion(0, reason));
        }
        _ => Vec::new(),
    };
    Ok(count_slice(&values, strategy))
}

fn permissive_sequence(items: &[Item], config: &KernelConfig) -> Result<CountArray> {
    let shape = sequence_shape(items, 0)?;
    if shape.len() != 1 {
        trace!("Permissive mode rejects nested sequence of shape {shape:?}");
        return Err(type_mismatch(config));
    }
    if items.is_empty() {
        return Ok(CountArray::empty());
    }

    let values = items
        .iter()
        .enumerate()
        .map(|(i, item)| item_to_u64(i, item))
        .collect::<Result<Vec<_>>>()?;

    let widest = values.iter().copied().max().unwrap_or(0);
    debug!(
        "Sequence of {} items fits in {} bits, counting at 64 ({:?})",
        values.len(),
        SupportedWidth::smallest_for(widest).bits(),
        config.strategy
    );
    Ok(CountArray::new(count_slice(&values, config.strategy), SupportedWidth::W64))
}

/// Shape of a nested sequence, numpy style; ragged nesting is a conversion error
fn sequence_shape(items: &[Item], offset: usize) -> Result<Vec<usize>> {
    let nested = items.iter().filter(|item| matches!(item, Item::Seq(_))).count();
    if nested == 0 {
        return Ok(vec![items.len()]);
    }
    if nested != items.len() {
        let index = items
            .iter()
            .position(|item| !matches!(item, Item::Seq(_)))
            .unwrap_or(0);
        let reason = "ragged nested sequence";
        return Err(PopcountError::conversion(offset + index, reason));
    }

    let mut inner: Option<Vec<usize>> = None;
    for (i, item) in items.iter().enumerate() {
        if let Item::Seq(row) = item {
            let shape = sequence_shape(row, offset + i)?;
            match &inner {
                Some(expected) if *expected != shape => {
                    let reason = "ragged nested sequence";
                    return Err(PopcountError::conversion(offset + i, reason));
                }
                Some(_) => {}
                None => inner = Some(shape),
            }
        }
    }

    let mut shape = vec![items.len()];
    shape.extend(inner.unwrap_or_default());
    Ok(shape)
}

fn item_to_u64(index: usize, item: &Item) -> Result<u64> {
    match item {
        Item::Int(v) => {
            if *v < i64::MIN as i128 || *v > u64::MAX as i128 {
                let reason = format!("integer {v} needs more than 64 bits");
                Err(PopcountError::conversion(index, reason))
            } else if *v < 0 {
                Ok(*v as i64 as u64)
            } else {
                Ok(*v as u64)
            }
        }
        Item::Float(f) => float_to_u64(index, *f),
        Item::Bool(b) => Ok(u64::from(*b)),
        Item::Text(s) => {
            let reason = format!("non-numeric value {s:?}");
            Err(PopcountError::conversion(index, reason))
        }
        Item::Seq(_) => Err(PopcountError::conversion(index, "nested sequence")),
    }
}

/// Integral floats within the 64-bit range convert like the matching integer
fn float_to_u64(index: usize, value: f64) -> Result<u64> {
    const TWO_POW_64: f64 = 18_446_744_073_709_551_616.0;
    const MINUS_TWO_POW_63: f64 = -9_223_372_036_854_775_808.0;

    if !value.is_finite() || value.fract() != 0.0 {
        let reason = format!("non-integral value {value}");
        return Err(PopcountError::conversion(index, reason));
    }
    if value < 0.0 {
        if value < MINUS_TWO_POW_63 {
            let reason = format!("value {value} needs more than 64 bits");
            return Err(PopcountError::conversion(index, reason));
        }
        Ok(value as i64 as u64)
    } else if value >= TWO_POW_64 {
        let reason = format!("value {value} needs more than 64 bits");
        Err(PopcountError::conversion(index, reason))
    } else {
        Ok(value as u64)
    }
}

fn count_mapped<S: Copy, U: BitCount>(
    xs: &[S],
    f: impl Fn(S) -> U,
    strategy: Strategy,
) -> Vec<u8> {
    xs.iter().map(|&x| f(x).count_with(strategy)).collect()
}

fn check_one_dimensional(array: &NdArray, config: &KernelConfig) -> Result<()> {
    match array.ndim() {
        0 => Err(scalar_not_array()),
        1 => Ok(()),
        ndim => {
            trace!("Rejecting {ndim}-D array");
            Err(type_mismatch(config))
        }
    }
}

fn type_mismatch(config: &KernelConfig) -> PopcountError {
    PopcountError::TypeMismatch {
        allowed: config.allow_list.describe(),
    }
}

fn scalar_not_array() -> PopcountError {
    trace!("Rejecting scalar input");
    PopcountError::ScalarNotArray
}
