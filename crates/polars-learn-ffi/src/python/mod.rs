//! numpy arrays and scikit-learn models as the numeric runtime.
//!
//! The interpreter must already be running; the caller owns it.
mod exports;

use numpy::{
    dtype, PyArray1, PyArray2, PyArrayDescrMethods, PyArrayMethods, PyUntypedArray,
    PyUntypedArrayMethods,
};
use polars_core::prelude::*;
use polars_learn::prelude::*;
use polars_learn::runtime;
use pyo3::intern;
use pyo3::prelude::*;
use pyo3::types::IntoPyDict;

pub use self::exports::*;

pub struct PythonRuntime;

impl NumericRuntime for PythonRuntime {
    type Array = Py<PyAny>;
    type Model = Py<PyAny>;

    fn export_matrix(&self, matrix: DenseMatrix) -> LearnResult<Py<PyAny>> {
        Python::with_gil(|py| -> LearnResult<_> {
            let (rows, cols) = matrix.shape();
            // The array takes over the vector, the reshape is a view on it.
            let array = PyArray1::from_vec(py, matrix.into_vec());
            Ok(array.reshape([rows, cols])?.into_any().unbind())
        })
    }

    fn export_vector(&self, matrix: DenseMatrix) -> LearnResult<Py<PyAny>> {
        let array =
            Python::with_gil(|py| PyArray1::from_vec(py, matrix.into_vec()).into_any().unbind());
        Ok(array)
    }

    fn import_vector(&self, array: &Py<PyAny>, name: PlSmallStr) -> LearnResult<Column> {
        Python::with_gil(|py| -> LearnResult<_> {
            let untyped = array.bind(py).downcast::<PyUntypedArray>().map_err(PyErr::from)?;
            let descr = untyped.dtype();
            validate_vector_layout(untyped.shape(), untyped.strides(), descr.itemsize())?;

            let array = if descr.is_equiv_to(&dtype::<f64>(py)) {
                untyped.clone().into_any()
            } else {
                untyped.call_method1(intern!(py, "astype"), ("float64",))?
            };
            let array = array.downcast_into::<PyArray1<f64>>().map_err(PyErr::from)?;
            let values = array
                .try_readonly()
                .map_err(|e| learn_err!(ForeignRuntime: "{}", e))?;
            let slice = values
                .as_slice()
                .map_err(|e| learn_err!(ShapeMismatch: "{}", e))?;
            Ok(column_from_doubles(slice, name))
        })
    }

    fn import_matrix(&self, array: &Py<PyAny>) -> LearnResult<DenseMatrix> {
        Python::with_gil(|py| -> LearnResult<_> {
            let array = py
                .import(intern!(py, "numpy"))?
                .call_method1(intern!(py, "ascontiguousarray"), (array.bind(py), "float64"))?
                .downcast_into::<PyArray2<f64>>()
                .map_err(PyErr::from)?;
            let values = array
                .try_readonly()
                .map_err(|e| learn_err!(ForeignRuntime: "{}", e))?;
            let (rows, cols) = (values.shape()[0], values.shape()[1]);
            let slice = values
                .as_slice()
                .map_err(|e| learn_err!(ShapeMismatch: "{}", e))?;
            DenseMatrix::try_from_vec(slice.to_vec(), rows, cols)
        })
    }

    fn fit(&self, model: &Py<PyAny>, xs: &Py<PyAny>, y: &Py<PyAny>) -> LearnResult<()> {
        Python::with_gil(|py| -> LearnResult<_> {
            model
                .bind(py)
                .call_method1(intern!(py, "fit"), (xs.bind(py), y.bind(py)))?;
            Ok(())
        })
    }

    fn score(&self, model: &Py<PyAny>, xs: &Py<PyAny>, y: &Py<PyAny>) -> LearnResult<f64> {
        Python::with_gil(|py| -> LearnResult<_> {
            Ok(model
                .bind(py)
                .call_method1(intern!(py, "score"), (xs.bind(py), y.bind(py)))?
                .extract::<f64>()?)
        })
    }

    fn predict(&self, model: &Py<PyAny>, xs: &Py<PyAny>) -> LearnResult<Py<PyAny>> {
        Python::with_gil(|py| -> LearnResult<_> {
            Ok(model
                .bind(py)
                .call_method1(intern!(py, "predict"), (xs.bind(py),))?
                .unbind())
        })
    }

    fn confusion_matrix(&self, y_true: &Py<PyAny>, y_pred: &Py<PyAny>) -> LearnResult<Py<PyAny>> {
        Python::with_gil(|py| -> LearnResult<_> {
            Ok(py
                .import(intern!(py, "sklearn.metrics"))?
                .call_method1(
                    intern!(py, "confusion_matrix"),
                    (y_true.bind(py), y_pred.bind(py)),
                )?
                .unbind())
        })
    }
}

pub fn new_logistic_regression(c: f64) -> LearnResult<Py<PyAny>> {
    Python::with_gil(|py| -> LearnResult<_> {
        let kwargs = [("C", c)].into_py_dict(py)?;
        Ok(py
            .import(intern!(py, "sklearn.linear_model"))?
            .getattr(intern!(py, "LogisticRegression"))?
            .call((), Some(&kwargs))?
            .unbind())
    })
}

pub fn new_linear_regression() -> LearnResult<Py<PyAny>> {
    Python::with_gil(|py| -> LearnResult<_> {
        Ok(py
            .import(intern!(py, "sklearn.linear_model"))?
            .getattr(intern!(py, "LinearRegression"))?
            .call0()?
            .unbind())
    })
}

pub fn matrix_from_table(
    registry: &ObjectRegistry,
    table: *const DataFrame,
) -> LearnResult<Py<PyAny>> {
    runtime::matrix_from_table(&PythonRuntime, &registry.get(table)?)
}

pub fn vector_from_column(
    registry: &ObjectRegistry,
    column: *const Column,
) -> LearnResult<Py<PyAny>> {
    runtime::vector_from_column(&PythonRuntime, &registry.get(column)?)
}

pub fn column_from_vector(
    registry: &ObjectRegistry,
    array: &Py<PyAny>,
    name: PlSmallStr,
) -> LearnResult<*const Column> {
    Ok(registry.adopt(runtime::column_from_vector(&PythonRuntime, array, name)?))
}

pub fn fit(
    registry: &ObjectRegistry,
    model: &Py<PyAny>,
    xs: *const DataFrame,
    y: *const Column,
) -> LearnResult<()> {
    runtime::fit(&PythonRuntime, model, &registry.get(xs)?, &registry.get(y)?)
}

pub fn score(
    registry: &ObjectRegistry,
    model: &Py<PyAny>,
    xs: *const DataFrame,
    y: *const Column,
) -> LearnResult<f64> {
    runtime::score(&PythonRuntime, model, &registry.get(xs)?, &registry.get(y)?)
}

pub fn predict(
    registry: &ObjectRegistry,
    model: &Py<PyAny>,
    xs: *const DataFrame,
) -> LearnResult<*const Column> {
    Ok(registry.adopt(runtime::predict(&PythonRuntime, model, &registry.get(xs)?)?))
}

pub fn confusion_matrix(
    registry: &ObjectRegistry,
    y_true: *const Column,
    y_pred: *const Column,
) -> LearnResult<*const DataFrame> {
    let table = runtime::confusion_matrix(
        &PythonRuntime,
        &registry.get(y_true)?,
        &registry.get(y_pred)?,
    )?;
    Ok(registry.adopt(table))
}
