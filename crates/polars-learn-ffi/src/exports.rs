//! The exported C symbols.
//!
//! Handles cross the boundary as `void *`. Every function takes the caller's
//! `const char **out_error` last and never unwinds.
use std::ffi::{c_char, c_void};

use polars_learn::prelude::*;

use crate::{api, REGISTRY};

/// # Safety
/// `out_error` must be null or valid for writing a pointer.
#[no_mangle]
pub unsafe extern "C" fn learn_one_hot_encode(
    column: *const c_void,
    out_error: *mut *const c_char,
) -> *const c_void {
    let out_error = unsafe { ErrorSlot::from_raw(out_error) };
    translate_error("oneHotEncode", &out_error, || {
        api::one_hot_encode(&REGISTRY, column.cast()).map(|t| t.cast())
    })
}

/// # Safety
/// `out_error` must be null or valid for writing a pointer.
#[no_mangle]
pub unsafe extern "C" fn learn_release_object(
    handle: *const c_void,
    out_error: *mut *const c_char,
) {
    let out_error = unsafe { ErrorSlot::from_raw(out_error) };
    translate_error("releaseObject", &out_error, || api::release_object(&REGISTRY, handle))
}

/// # Safety
/// `data` must be valid for reading `len` doubles, `name` must be a
/// NUL-terminated string and `out_error` null or valid for writing.
#[no_mangle]
pub unsafe extern "C" fn learn_column_from_doubles(
    data: *const f64,
    len: usize,
    name: *const c_char,
    out_error: *mut *const c_char,
) -> *const c_void {
    let out_error = unsafe { ErrorSlot::from_raw(out_error) };
    translate_error("columnFromDoubles", &out_error, || unsafe {
        api::column_from_doubles(&REGISTRY, data, len, name).map(|c| c.cast())
    })
}

/// # Safety
/// `data` must be valid for reading `len` string pointers (each may be
/// null), `name` must be a NUL-terminated string and `out_error` null or
/// valid for writing.
#[no_mangle]
pub unsafe extern "C" fn learn_column_from_strings(
    data: *const *const c_char,
    len: usize,
    name: *const c_char,
    out_error: *mut *const c_char,
) -> *const c_void {
    let out_error = unsafe { ErrorSlot::from_raw(out_error) };
    translate_error("columnFromStrings", &out_error, || unsafe {
        api::column_from_strings(&REGISTRY, data, len, name).map(|c| c.cast())
    })
}

/// # Safety
/// `columns` must be valid for reading `count` handles and `out_error`
/// null or valid for writing.
#[no_mangle]
pub unsafe extern "C" fn learn_table_from_columns(
    columns: *const *const c_void,
    count: usize,
    out_error: *mut *const c_char,
) -> *const c_void {
    let out_error = unsafe { ErrorSlot::from_raw(out_error) };
    translate_error("tableFromColumns", &out_error, || unsafe {
        api::table_from_columns(&REGISTRY, columns.cast(), count).map(|t| t.cast())
    })
}

/// # Safety
/// `out_error` must be null or valid for writing a pointer.
#[no_mangle]
pub unsafe extern "C" fn learn_table_num_rows(
    table: *const c_void,
    out_error: *mut *const c_char,
) -> usize {
    let out_error = unsafe { ErrorSlot::from_raw(out_error) };
    translate_error("tableNumRows", &out_error, || api::table_num_rows(&REGISTRY, table.cast()))
}

/// # Safety
/// `out_error` must be null or valid for writing a pointer.
#[no_mangle]
pub unsafe extern "C" fn learn_table_num_columns(
    table: *const c_void,
    out_error: *mut *const c_char,
) -> usize {
    let out_error = unsafe { ErrorSlot::from_raw(out_error) };
    translate_error("tableNumColumns", &out_error, || {
        api::table_num_columns(&REGISTRY, table.cast())
    })
}

/// # Safety
/// `out_error` must be null or valid for writing a pointer.
#[no_mangle]
pub unsafe extern "C" fn learn_table_column_at(
    table: *const c_void,
    index: usize,
    out_error: *mut *const c_char,
) -> *const c_void {
    let out_error = unsafe { ErrorSlot::from_raw(out_error) };
    translate_error("tableColumnAt", &out_error, || {
        api::table_column_at(&REGISTRY, table.cast(), index).map(|c| c.cast())
    })
}

/// # Safety
/// `out_error` must be null or valid for writing a pointer.
#[no_mangle]
pub unsafe extern "C" fn learn_column_length(
    column: *const c_void,
    out_error: *mut *const c_char,
) -> usize {
    let out_error = unsafe { ErrorSlot::from_raw(out_error) };
    translate_error("columnLength", &out_error, || api::column_length(&REGISTRY, column.cast()))
}

/// # Safety
/// `out_error` must be null or valid for writing a pointer.
#[no_mangle]
pub unsafe extern "C" fn learn_column_double_at(
    column: *const c_void,
    index: usize,
    out_error: *mut *const c_char,
) -> f64 {
    let out_error = unsafe { ErrorSlot::from_raw(out_error) };
    translate_error("columnDoubleAt", &out_error, || {
        api::column_double_at(&REGISTRY, column.cast(), index)
    })
}
