//! Exported symbols that take or return Python objects.
//!
//! Incoming `PyObject *` arguments are borrowed. Returned `PyObject *` are
//! new references owned by the caller, who gives them back with
//! `learn_free_py_object`.
use std::ffi::{c_char, c_void};

use polars_learn::prelude::*;
use pyo3::ffi::PyObject;
use pyo3::prelude::*;

use crate::api::name_from_raw;
use crate::REGISTRY;

/// # Safety
/// `object` must be null or a live Python object.
unsafe fn borrow_object(object: *mut PyObject) -> LearnResult<Py<PyAny>> {
    learn_ensure!(!object.is_null(), UnknownHandle: 0);
    Ok(Python::with_gil(|py| unsafe { Bound::from_borrowed_ptr(py, object) }.unbind()))
}

/// # Safety
/// `table` is resolved through the registry; `out_error` must be null or
/// valid for writing a pointer.
#[no_mangle]
pub unsafe extern "C" fn learn_matrix_from_table(
    table: *const c_void,
    out_error: *mut *const c_char,
) -> *mut PyObject {
    let out_error = unsafe { ErrorSlot::from_raw(out_error) };
    translate_error("matrixFromTable", &out_error, || {
        super::matrix_from_table(&REGISTRY, table.cast()).map(Py::into_ptr)
    })
}

/// # Safety
/// `out_error` must be null or valid for writing a pointer.
#[no_mangle]
pub unsafe extern "C" fn learn_vector_from_column(
    column: *const c_void,
    out_error: *mut *const c_char,
) -> *mut PyObject {
    let out_error = unsafe { ErrorSlot::from_raw(out_error) };
    translate_error("vectorFromColumn", &out_error, || {
        super::vector_from_column(&REGISTRY, column.cast()).map(Py::into_ptr)
    })
}

/// # Safety
/// `array` must be null or a live Python object, `name` a NUL-terminated
/// string and `out_error` null or valid for writing.
#[no_mangle]
pub unsafe extern "C" fn learn_column_from_vector(
    array: *mut PyObject,
    name: *const c_char,
    out_error: *mut *const c_char,
) -> *const c_void {
    let out_error = unsafe { ErrorSlot::from_raw(out_error) };
    translate_error("columnFromVector", &out_error, || unsafe {
        let array = borrow_object(array)?;
        let name = name_from_raw(name)?;
        super::column_from_vector(&REGISTRY, &array, name).map(|c| c.cast())
    })
}

/// # Safety
/// `model` must be null or a live Python object; `out_error` null or valid
/// for writing.
#[no_mangle]
pub unsafe extern "C" fn learn_fit(
    model: *mut PyObject,
    xs: *const c_void,
    y: *const c_void,
    out_error: *mut *const c_char,
) {
    let out_error = unsafe { ErrorSlot::from_raw(out_error) };
    translate_error("fit", &out_error, || {
        let model = unsafe { borrow_object(model)? };
        super::fit(&REGISTRY, &model, xs.cast(), y.cast())
    })
}

/// # Safety
/// `model` must be null or a live Python object; `out_error` null or valid
/// for writing.
#[no_mangle]
pub unsafe extern "C" fn learn_score(
    model: *mut PyObject,
    xs: *const c_void,
    y: *const c_void,
    out_error: *mut *const c_char,
) -> f64 {
    let out_error = unsafe { ErrorSlot::from_raw(out_error) };
    translate_error("score", &out_error, || {
        let model = unsafe { borrow_object(model)? };
        super::score(&REGISTRY, &model, xs.cast(), y.cast())
    })
}

/// # Safety
/// `model` must be null or a live Python object; `out_error` null or valid
/// for writing.
#[no_mangle]
pub unsafe extern "C" fn learn_predict(
    model: *mut PyObject,
    xs: *const c_void,
    out_error: *mut *const c_char,
) -> *const c_void {
    let out_error = unsafe { ErrorSlot::from_raw(out_error) };
    translate_error("predict", &out_error, || {
        let model = unsafe { borrow_object(model)? };
        super::predict(&REGISTRY, &model, xs.cast()).map(|c| c.cast())
    })
}

/// # Safety
/// `out_error` must be null or valid for writing a pointer.
#[no_mangle]
pub unsafe extern "C" fn learn_confusion_matrix(
    y_true: *const c_void,
    y_pred: *const c_void,
    out_error: *mut *const c_char,
) -> *const c_void {
    let out_error = unsafe { ErrorSlot::from_raw(out_error) };
    translate_error("confusionMatrix", &out_error, || {
        super::confusion_matrix(&REGISTRY, y_true.cast(), y_pred.cast()).map(|t| t.cast())
    })
}

/// # Safety
/// `out_error` must be null or valid for writing a pointer.
#[no_mangle]
pub unsafe extern "C" fn learn_new_logistic_regression(
    c: f64,
    out_error: *mut *const c_char,
) -> *mut PyObject {
    let out_error = unsafe { ErrorSlot::from_raw(out_error) };
    translate_error("newLogisticRegression", &out_error, || {
        super::new_logistic_regression(c).map(Py::into_ptr)
    })
}

/// # Safety
/// `out_error` must be null or valid for writing a pointer.
#[no_mangle]
pub unsafe extern "C" fn learn_new_linear_regression(
    out_error: *mut *const c_char,
) -> *mut PyObject {
    let out_error = unsafe { ErrorSlot::from_raw(out_error) };
    translate_error("newLinearRegression", &out_error, || {
        super::new_linear_regression().map(Py::into_ptr)
    })
}

/// Drop one reference to an object returned by this library. Null is a no-op.
///
/// # Safety
/// `object` must be null or a reference the caller owns; it must not be
/// used afterwards.
#[no_mangle]
pub unsafe extern "C" fn learn_free_py_object(
    object: *mut PyObject,
    out_error: *mut *const c_char,
) {
    let out_error = unsafe { ErrorSlot::from_raw(out_error) };
    translate_error("freeForeignObject", &out_error, || {
        if !object.is_null() {
            Python::with_gil(|py| drop(unsafe { Py::<PyAny>::from_owned_ptr(py, object) }));
        }
        Ok(())
    })
}
