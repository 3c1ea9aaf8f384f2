use polars_core::prelude::*;

use crate::error::LearnResult;
use crate::learn_ensure;

/// Build a nullable `Float64` column from `values`, turning every `NaN` into a null.
pub fn column_from_doubles(values: &[f64], name: PlSmallStr) -> Column {
    let mut builder = PrimitiveChunkedBuilder::<Float64Type>::new(name, values.len());
    for &v in values {
        if v.is_nan() {
            builder.append_null();
        } else {
            builder.append_value(v);
        }
    }
    builder.finish().into_series().into()
}

/// Check that an array of `shape` with byte `strides` is a dense vector of
/// `itemsize`-byte elements and return its length.
///
/// A `(n, 1)` or `(1, n)` array is still rejected: the caller has to flatten
/// it explicitly.
pub fn validate_vector_layout(
    shape: &[usize],
    strides: &[isize],
    itemsize: usize,
) -> LearnResult<usize> {
    learn_ensure!(
        shape.len() == 1 && strides.len() == 1,
        ShapeMismatch: "expected a one-dimensional array, got {} dimensions",
        shape.len()
    );
    let len = shape[0];
    learn_ensure!(
        len <= 1 || strides[0] == itemsize as isize,
        ShapeMismatch: "expected a contiguous array, got a stride of {} bytes for {}-byte elements",
        strides[0],
        itemsize
    );
    Ok(len)
}
