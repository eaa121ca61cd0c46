//! Python bindings over numpy arrays and plain Python sequences

use numpy::{
    IntoPyArray, PyArray1, PyArrayDyn, PyArrayMethods, PyReadonlyArray1, PyUntypedArray,
    PyUntypedArrayMethods,
};
use once_cell::sync::Lazy;
use pyo3::exceptions::{PyRuntimeError, PyTypeError, PyValueError};
use pyo3::prelude::*;
use pyo3::types::{PyBool, PyFloat, PyModule, PySequence, PyString};

use crate::array::{Input, Item, NdArray};
use crate::config::KernelConfig;
use crate::error::PopcountError;
use crate::popcount as counting;
use crate::service::{count_bits_permissive, count_bits_strict};

/// Read once per process; later environment changes are not picked up
static CONFIG: Lazy<KernelConfig> = Lazy::new(KernelConfig::from_env);

impl From<PopcountError> for PyErr {
    fn from(err: PopcountError) -> PyErr {
        let message = err.to_string();
        match err {
            PopcountError::TypeMismatch { .. } => PyValueError::new_err(message),
            PopcountError::ScalarNotArray => PyRuntimeError::new_err(message),
            PopcountError::Conversion { .. } => PyTypeError::new_err(message),
            PopcountError::MissingArgument { .. } => PyTypeError::new_err(message),
        }
    }
}

/// Count 1's of each element, coercing the input to an unsigned integer array
#[pyfunction]
#[pyo3(signature = (xs=None))]
fn popcount<'py>(
    py: Python<'py>,
    xs: Option<&Bound<'py, PyAny>>,
) -> PyResult<Bound<'py, PyArray1<u8>>> {
    let input = xs.map(extract_input).transpose()?;
    let counts = count_bits_permissive(input.as_ref(), &CONFIG)?;
    Ok(counts.into_vec().into_pyarray_bound(py))
}

/// Count 1's of each element of a 1-D uint8 or uint64 array
#[pyfunction]
#[pyo3(signature = (xs=None))]
fn popcount_strict<'py>(
    py: Python<'py>,
    xs: Option<&Bound<'py, PyAny>>,
) -> PyResult<Bound<'py, PyArray1<u8>>> {
    let input = xs.map(extract_input).transpose()?;
    let counts = count_bits_strict(input.as_ref(), &CONFIG)?;
    Ok(counts.into_vec().into_pyarray_bound(py))
}

/// Byte-table reference count over a contiguous uint64 array
#[pyfunction]
fn table_popcount_u64<'py>(
    py: Python<'py>,
    xs: PyReadonlyArray1<'py, u64>,
) -> PyResult<Bound<'py, PyArray1<u8>>> {
    let slice = xs.as_slice()?;
    Ok(counting::table_popcount_u64(slice).into_pyarray_bound(py))
}

/// Count 1's in each byte
#[pyfunction]
fn popcount_raw(xs: &[u8]) -> PyResult<Vec<i32>> {
    Ok(counting::popcount_raw(xs))
}

/// Count 1's in each 32-bit integer; None passes through
#[pyfunction]
fn popcount_integer(xs: Vec<Option<i32>>) -> PyResult<Vec<Option<i32>>> {
    Ok(counting::popcount_integer(&xs))
}

fn extract_input(obj: &Bound<'_, PyAny>) -> PyResult<Input> {
    if let Ok(array) = obj.downcast::<PyUntypedArray>() {
        return extract_array(array);
    }
    if obj.is_instance_of::<PyString>() {
        return Ok(Input::Scalar(Item::Text(obj.extract()?)));
    }
    if obj.downcast::<PySequence>().is_ok() {
        return Ok(Input::Sequence(extract_items(obj)?));
    }
    Ok(Input::Scalar(extract_item(obj)?))
}

macro_rules! try_native {
    ($array:expr, $shape:expr, $($t:ty),*) => {
        $(
            if let Ok(typed) = $array.as_any().downcast::<PyArrayDyn<$t>>() {
                let values: Vec<$t> = typed.readonly().as_array().iter().copied().collect();
                if let Some(array) = NdArray::with_shape($shape, values) {
                    return Ok(Input::Array(array));
                }
                return Err(PyValueError::new_err("array shape does not match its data"));
            }
        )*
    };
}

fn extract_array(array: &Bound<'_, PyUntypedArray>) -> PyResult<Input> {
    let shape = array.shape().to_vec();
    try_native!(array, shape, u8, u16, u32, u64, i8, i16, i32, i64, f32, f64, bool);

    // dtypes without a native mapping (unicode, object, ...) go through Python objects;
    // empty ones keep their declared shape so dimensionality is still checked
    if !shape.is_empty() && shape.contains(&0) {
        return NdArray::with_shape(shape, Vec::<String>::new())
            .map(Input::Array)
            .ok_or_else(|| PyValueError::new_err("array shape does not match its data"));
    }
    let list = array.call_method0("tolist")?;
    if shape.is_empty() {
        return Ok(Input::Scalar(extract_item(&list)?));
    }
    Ok(Input::Sequence(extract_items(&list)?))
}

fn extract_items(obj: &Bound<'_, PyAny>) -> PyResult<Vec<Item>> {
    obj.iter()?
        .map(|item| item.and_then(|item| extract_item(&item)))
        .collect()
}

fn extract_item(obj: &Bound<'_, PyAny>) -> PyResult<Item> {
    if let Ok(flag) = obj.downcast::<PyBool>() {
        return Ok(Item::Bool(flag.is_true()));
    }
    if obj.is_instance_of::<PyString>() {
        return Ok(Item::Text(obj.extract()?));
    }
    if let Ok(value) = obj.extract::<i128>() {
        return Ok(Item::Int(value));
    }
    if obj.is_instance_of::<PyFloat>() {
        return Ok(Item::Float(obj.extract()?));
    }
    if obj.downcast::<PySequence>().is_ok() {
        return Ok(Item::Seq(extract_items(obj)?));
    }
    if let Ok(value) = obj.extract::<f64>() {
        return Ok(Item::Float(value));
    }
    Ok(Item::Text(obj.repr()?.to_string()))
}

/// Python extension module: installs as `popcount_kernel._popcount_kernel`
#[pymodule]
fn _popcount_kernel(_py: Python, m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(popcount, m)?)?;
    m.add_function(wrap_pyfunction!(popcount_strict, m)?)?;
    m.add_function(wrap_pyfunction!(table_popcount_u64, m)?)?;
    m.add_function(wrap_pyfunction!(popcount_raw, m)?)?;
    m.add_function(wrap_pyfunction!(popcount_integer, m)?)?;
    let message = PopcountError::TypeMismatch {
        allowed: CONFIG.allow_list.describe(),
    };
    m.add("TYPE_ERROR_MESSAGE", message.to_string())?;
    Ok(())
}
