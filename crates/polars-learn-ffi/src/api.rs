//! Handle-level operations behind the exported symbols.
//!
//! Every function resolves its incoming handles through the registry it is
//! given and registers what it returns, so it can be driven from tests with
//! a private [`ObjectRegistry`].
use std::ffi::{c_char, c_void, CStr};
use std::slice;

use polars_core::prelude::*;
use polars_learn::prelude::*;
use polars_learn::{one_hot, reconstruct};

/// # Safety
/// `data` must be null or valid for reading `len` values of `T`.
pub(crate) unsafe fn slice_from_raw<'a, T>(data: *const T, len: usize) -> LearnResult<&'a [T]> {
    if len == 0 {
        return Ok(&[]);
    }
    learn_ensure!(!data.is_null(), ShapeMismatch: "null buffer of length {}", len);
    Ok(unsafe { slice::from_raw_parts(data, len) })
}

/// # Safety
/// `s` must be null or a NUL-terminated string.
unsafe fn str_from_raw<'a>(s: *const c_char) -> LearnResult<Option<&'a str>> {
    if s.is_null() {
        return Ok(None);
    }
    let s = unsafe { CStr::from_ptr(s) };
    s.to_str()
        .map(Some)
        .map_err(|e| learn_err!(UnsupportedType: "string is not valid utf-8: {}", e))
}

/// # Safety
/// `name` must be null or a NUL-terminated string.
pub unsafe fn name_from_raw(name: *const c_char) -> LearnResult<PlSmallStr> {
    match unsafe { str_from_raw(name)? } {
        Some(name) => Ok(name.into()),
        None => learn_bail!(ShapeMismatch: "column name is null"),
    }
}

pub fn one_hot_encode(
    registry: &ObjectRegistry,
    column: *const Column,
) -> LearnResult<*const DataFrame> {
    let column = registry.get(column)?;
    Ok(registry.adopt(one_hot::one_hot_encode(&column)?))
}

pub fn release_object(registry: &ObjectRegistry, handle: *const c_void) -> LearnResult<()> {
    registry.release(handle)
}

/// # Safety
/// `data` must be valid for reading `len` doubles and `name` must be a
/// NUL-terminated string.
pub unsafe fn column_from_doubles(
    registry: &ObjectRegistry,
    data: *const f64,
    len: usize,
    name: *const c_char,
) -> LearnResult<*const Column> {
    let values = unsafe { slice_from_raw(data, len)? };
    let name = unsafe { name_from_raw(name)? };
    Ok(registry.adopt(reconstruct::column_from_doubles(values, name)))
}

/// A null entry becomes a null slot.
///
/// # Safety
/// `data` must be valid for reading `len` pointers, each null or a
/// NUL-terminated string, and `name` must be a NUL-terminated string.
pub unsafe fn column_from_strings(
    registry: &ObjectRegistry,
    data: *const *const c_char,
    len: usize,
    name: *const c_char,
) -> LearnResult<*const Column> {
    let ptrs = unsafe { slice_from_raw(data, len)? };
    let name = unsafe { name_from_raw(name)? };
    let values = ptrs
        .iter()
        .map(|&s| unsafe { str_from_raw(s) })
        .collect::<LearnResult<Vec<_>>>()?;
    Ok(registry.adopt(Column::new(name, &values)))
}

/// # Safety
/// `columns` must be valid for reading `count` pointers.
pub unsafe fn table_from_columns(
    registry: &ObjectRegistry,
    columns: *const *const Column,
    count: usize,
) -> LearnResult<*const DataFrame> {
    let handles = unsafe { slice_from_raw(columns, count)? };
    let columns = handles
        .iter()
        .map(|&handle| Ok(registry.get(handle)?.as_ref().clone()))
        .collect::<LearnResult<Vec<Column>>>()?;

    for (idx, column) in columns.iter().enumerate().skip(1) {
        learn_ensure!(
            column.len() == columns[0].len(),
            ShapeMismatch: "column '{}' has {} rows while '{}' has {}",
            column.name(),
            column.len(),
            columns[0].name(),
            columns[0].len()
        );
        learn_ensure!(
            !columns[..idx].iter().any(|other| other.name() == column.name()),
            ShapeMismatch: "duplicate column name '{}'",
            column.name()
        );
    }
    Ok(registry.adopt(DataFrame::new(columns)?))
}

pub fn table_num_rows(registry: &ObjectRegistry, table: *const DataFrame) -> LearnResult<usize> {
    Ok(registry.get(table)?.height())
}

pub fn table_num_columns(registry: &ObjectRegistry, table: *const DataFrame) -> LearnResult<usize> {
    Ok(registry.get(table)?.width())
}

/// The returned column is registered separately and outlives the table.
pub fn table_column_at(
    registry: &ObjectRegistry,
    table: *const DataFrame,
    index: usize,
) -> LearnResult<*const Column> {
    let table = registry.get(table)?;
    let column = table.get_columns().get(index).ok_or_else(|| {
        learn_err!(
            ShapeMismatch: "column index {} out of range for a table with {} columns",
            index,
            table.width()
        )
    })?;
    Ok(registry.adopt(column.clone()))
}

pub fn column_length(registry: &ObjectRegistry, column: *const Column) -> LearnResult<usize> {
    Ok(registry.get(column)?.len())
}

/// Read one slot as double, null reading as `NaN`.
pub fn column_double_at(
    registry: &ObjectRegistry,
    column: *const Column,
    index: usize,
) -> LearnResult<f64> {
    let column = registry.get(column)?;
    learn_ensure!(
        index < column.len(),
        ShapeMismatch: "row {} out of range for column '{}' of length {}",
        index,
        column.name(),
        column.len()
    );
    match column.get(index)? {
        AnyValue::Null => Ok(f64::NAN),
        AnyValue::Float64(v) => Ok(v),
        AnyValue::Float32(v) => Ok(v as f64),
        AnyValue::Int64(v) => Ok(v as f64),
        AnyValue::Int32(v) => Ok(v as f64),
        AnyValue::UInt32(v) => Ok(v as f64),
        AnyValue::UInt64(v) => Ok(v as f64),
        av => learn_bail!(
            UnsupportedType: "cannot read a {} value of column '{}' as double",
            av.dtype(),
            column.name()
        ),
    }
}
