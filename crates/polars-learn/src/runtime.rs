//! The numeric library on the other side of the boundary.
//!
//! Models and arrays live in a foreign runtime this crate never looks into.
//! [`NumericRuntime`] is the narrow interface to it: matrices go in by value
//! (ownership of the buffer moves to the runtime), columns come back out, and
//! fitting/scoring/prediction are forwarded as-is.
use polars_core::prelude::*;

use crate::error::LearnResult;
use crate::learn_ensure;
use crate::matrix::{table_from_matrix, DenseMatrix};

pub const PREDICTIONS_NAME: &str = "Predictions";

pub trait NumericRuntime {
    /// A foreign array object.
    type Array;
    /// A foreign model object, only ever forwarded.
    type Model: ?Sized;

    /// Wrap `matrix` as a two-dimensional array without copying it.
    fn export_matrix(&self, matrix: DenseMatrix) -> LearnResult<Self::Array>;

    /// Wrap `matrix` as a one-dimensional array of `rows * cols` values
    /// without copying it.
    fn export_vector(&self, matrix: DenseMatrix) -> LearnResult<Self::Array>;

    /// Read a dense one-dimensional array back as a nullable `Float64` column.
    fn import_vector(&self, array: &Self::Array, name: PlSmallStr) -> LearnResult<Column>;

    /// Read a two-dimensional array back as a matrix.
    fn import_matrix(&self, array: &Self::Array) -> LearnResult<DenseMatrix>;

    fn fit(&self, model: &Self::Model, xs: &Self::Array, y: &Self::Array) -> LearnResult<()>;

    fn score(&self, model: &Self::Model, xs: &Self::Array, y: &Self::Array) -> LearnResult<f64>;

    fn predict(&self, model: &Self::Model, xs: &Self::Array) -> LearnResult<Self::Array>;

    fn confusion_matrix(
        &self,
        y_true: &Self::Array,
        y_pred: &Self::Array,
    ) -> LearnResult<Self::Array>;
}

pub fn matrix_from_table<R: NumericRuntime + ?Sized>(
    rt: &R,
    df: &DataFrame,
) -> LearnResult<R::Array> {
    rt.export_matrix(DenseMatrix::from_table(df)?)
}

pub fn vector_from_column<R: NumericRuntime + ?Sized>(
    rt: &R,
    column: &Column,
) -> LearnResult<R::Array> {
    rt.export_vector(DenseMatrix::from_column(column)?)
}

pub fn column_from_vector<R: NumericRuntime + ?Sized>(
    rt: &R,
    array: &R::Array,
    name: PlSmallStr,
) -> LearnResult<Column> {
    rt.import_vector(array, name)
}

fn ensure_same_height(xs: &DataFrame, y: &Column) -> LearnResult<()> {
    learn_ensure!(
        xs.height() == y.len(),
        ShapeMismatch: "features have {} rows while target '{}' has {}",
        xs.height(),
        y.name(),
        y.len()
    );
    Ok(())
}

pub fn fit<R: NumericRuntime + ?Sized>(
    rt: &R,
    model: &R::Model,
    xs: &DataFrame,
    y: &Column,
) -> LearnResult<()> {
    ensure_same_height(xs, y)?;
    let xs = matrix_from_table(rt, xs)?;
    let y = vector_from_column(rt, y)?;
    rt.fit(model, &xs, &y)
}

pub fn score<R: NumericRuntime + ?Sized>(
    rt: &R,
    model: &R::Model,
    xs: &DataFrame,
    y: &Column,
) -> LearnResult<f64> {
    ensure_same_height(xs, y)?;
    let xs = matrix_from_table(rt, xs)?;
    let y = vector_from_column(rt, y)?;
    rt.score(model, &xs, &y)
}

/// Predict one value per row of `xs`, returned as a column named `"Predictions"`.
pub fn predict<R: NumericRuntime + ?Sized>(
    rt: &R,
    model: &R::Model,
    xs: &DataFrame,
) -> LearnResult<Column> {
    let height = xs.height();
    let xs = matrix_from_table(rt, xs)?;
    let y = rt.predict(model, &xs)?;
    let predictions = rt.import_vector(&y, PREDICTIONS_NAME.into())?;
    learn_ensure!(
        predictions.len() == height,
        ShapeMismatch: "model returned {} predictions for {} rows",
        predictions.len(),
        height
    );
    Ok(predictions)
}

/// Confusion matrix of two label columns as a table with one column per
/// predicted class, named by class index.
pub fn confusion_matrix<R: NumericRuntime + ?Sized>(
    rt: &R,
    y_true: &Column,
    y_pred: &Column,
) -> LearnResult<DataFrame> {
    learn_ensure!(
        y_true.len() == y_pred.len(),
        ShapeMismatch: "true labels have {} rows while predictions have {}",
        y_true.len(),
        y_pred.len()
    );
    let y_true = vector_from_column(rt, y_true)?;
    let y_pred = vector_from_column(rt, y_pred)?;
    let counts = rt.confusion_matrix(&y_true, &y_pred)?;
    let counts = rt.import_matrix(&counts)?;
    let names = (0..counts.cols())
        .map(|i| PlSmallStr::from(i.to_string()))
        .collect::<Vec<_>>();
    table_from_matrix(&counts, &names)
}
