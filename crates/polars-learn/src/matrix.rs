//! Dense row-major `f64` matrices built from Polars columns.
//!
//! Nulls are stored as `NaN`, so downstream numeric code can rely on plain
//! float semantics instead of a separate validity mask. The price is that
//! only numeric columns can be represented; strings and datetimes are
//! rejected.
use polars_core::prelude::*;

use crate::error::LearnResult;
use crate::iterate::{iterate_over_generic, NullAwareVisitor, Timestamp};
use crate::reconstruct::column_from_doubles;
use crate::{learn_bail, learn_ensure, learn_err};

/// A contiguous row-major buffer of `rows * cols` doubles.
#[derive(Debug, Clone, PartialEq)]
pub struct DenseMatrix {
    values: Vec<f64>,
    rows: usize,
    cols: usize,
}

impl DenseMatrix {
    pub fn try_from_vec(values: Vec<f64>, rows: usize, cols: usize) -> LearnResult<Self> {
        let expected = rows
            .checked_mul(cols)
            .ok_or_else(|| learn_err!(ShapeMismatch: "{} x {} overflows", rows, cols))?;
        learn_ensure!(
            values.len() == expected,
            ShapeMismatch: "buffer of {} values cannot be viewed as a {} x {} matrix",
            values.len(),
            rows,
            cols
        );
        Ok(Self { values, rows, cols })
    }

    /// Build a `height x width` matrix from the columns of `df`, in column order.
    pub fn from_table(df: &DataFrame) -> LearnResult<Self> {
        matrix_from_columns(df.height(), df.get_columns())
    }

    /// Build a `len x 1` matrix from a single column.
    pub fn from_column(column: &Column) -> LearnResult<Self> {
        let mut builder = MatrixBuilder::try_new(column.len(), 1)?;
        builder.add_column(0, column)?;
        Ok(builder.finish())
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    pub fn get(&self, row: usize, col: usize) -> Option<f64> {
        if row < self.rows && col < self.cols {
            Some(self.values[row * self.cols + col])
        } else {
            None
        }
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Give up the buffer, e.g. to hand it to a foreign array object.
    pub fn into_vec(self) -> Vec<f64> {
        self.values
    }
}

/// Fills a [`DenseMatrix`] one column at a time.
pub struct MatrixBuilder {
    values: Vec<f64>,
    rows: usize,
    cols: usize,
}

impl MatrixBuilder {
    /// Allocate room for `rows * cols` doubles.
    ///
    /// Every cell starts out as `NaN`.
    pub fn try_new(rows: usize, cols: usize) -> LearnResult<Self> {
        let len = rows.checked_mul(cols).ok_or_else(|| {
            learn_err!(
                AllocationFailure: "matrix of {} rows x {} columns overflows the address space",
                rows,
                cols
            )
        })?;
        let mut values = Vec::new();
        values.try_reserve_exact(len).map_err(|_| {
            learn_err!(
                AllocationFailure: "failed to allocate memory for matrix of {} rows x {} columns",
                rows,
                cols
            )
        })?;
        values.resize(len, f64::NAN);
        Ok(Self { values, rows, cols })
    }

    /// Write `column` into matrix column `col_idx`.
    pub fn add_column(&mut self, col_idx: usize, column: &Column) -> LearnResult<()> {
        learn_ensure!(
            col_idx < self.cols,
            ShapeMismatch: "cannot add column with index {} to matrix with {} columns",
            col_idx,
            self.cols
        );
        learn_ensure!(
            column.len() == self.rows,
            ShapeMismatch: "failed to add column with index {} to matrix: it has {} rows while expected {}",
            col_idx,
            column.len(),
            self.rows
        );

        let mut writer = ColumnWriter {
            values: &mut self.values,
            cols: self.cols,
            col_idx,
            row_idx: 0,
        };
        iterate_over_generic(column, &mut writer)
    }

    pub fn finish(self) -> DenseMatrix {
        DenseMatrix {
            values: self.values,
            rows: self.rows,
            cols: self.cols,
        }
    }
}

struct ColumnWriter<'a> {
    values: &'a mut [f64],
    cols: usize,
    col_idx: usize,
    row_idx: usize,
}

impl ColumnWriter<'_> {
    #[inline]
    fn push(&mut self, v: f64) {
        self.values[self.row_idx * self.cols + self.col_idx] = v;
        self.row_idx += 1;
    }
}

impl NullAwareVisitor for ColumnWriter<'_> {
    fn visit_f64(&mut self, value: f64) -> LearnResult<()> {
        self.push(value);
        Ok(())
    }

    fn visit_i64(&mut self, value: i64) -> LearnResult<()> {
        self.push(value as f64);
        Ok(())
    }

    fn visit_u64(&mut self, value: u64) -> LearnResult<()> {
        self.push(value as f64);
        Ok(())
    }

    fn visit_str(&mut self, _value: &str) -> LearnResult<()> {
        learn_bail!(UnsupportedType: "cannot use strings in a numeric matrix")
    }

    fn visit_timestamp(&mut self, _value: Timestamp) -> LearnResult<()> {
        learn_bail!(UnsupportedType: "cannot use timestamps in a numeric matrix")
    }

    fn visit_null(&mut self) -> LearnResult<()> {
        self.push(f64::NAN);
        Ok(())
    }
}

/// Build a `rows x columns.len()` matrix. Every column must have `rows` values.
pub fn matrix_from_columns(rows: usize, columns: &[Column]) -> LearnResult<DenseMatrix> {
    let mut builder = MatrixBuilder::try_new(rows, columns.len())?;
    for (col_idx, column) in columns.iter().enumerate() {
        builder.add_column(col_idx, column)?;
    }
    Ok(builder.finish())
}

/// Inverse of [`DenseMatrix::from_table`]: one `Float64` column per matrix
/// column, `NaN` becoming null.
pub fn table_from_matrix(matrix: &DenseMatrix, names: &[PlSmallStr]) -> LearnResult<DataFrame> {
    learn_ensure!(
        names.len() == matrix.cols,
        ShapeMismatch: "got {} names for a matrix with {} columns",
        names.len(),
        matrix.cols
    );
    let mut col_values = Vec::with_capacity(matrix.rows);
    let columns = names
        .iter()
        .enumerate()
        .map(|(col_idx, name)| {
            col_values.clear();
            col_values.extend(
                matrix
                    .values
                    .iter()
                    .skip(col_idx)
                    .step_by(matrix.cols)
                    .copied(),
            );
            column_from_doubles(&col_values, name.clone())
        })
        .collect::<Vec<_>>();
    Ok(DataFrame::new(columns)?)
}
