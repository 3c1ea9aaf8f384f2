use std::sync::Mutex;

use polars_core::df;
use polars_core::prelude::*;
use polars_learn::prelude::*;
use polars_learn::runtime;

#[derive(Debug, Clone, PartialEq)]
enum MockArray {
    Vector(Vec<f64>),
    Matrix(DenseMatrix),
}

/// Predicts the mean of the target it was fitted on.
#[derive(Default)]
struct MeanModel {
    mean: Mutex<Option<f64>>,
}

struct MockRuntime;

fn non_nan(values: &[f64]) -> impl Iterator<Item = f64> + '_ {
    values.iter().copied().filter(|v| !v.is_nan())
}

impl NumericRuntime for MockRuntime {
    type Array = MockArray;
    type Model = MeanModel;

    fn export_matrix(&self, matrix: DenseMatrix) -> LearnResult<MockArray> {
        Ok(MockArray::Matrix(matrix))
    }

    fn export_vector(&self, matrix: DenseMatrix) -> LearnResult<MockArray> {
        Ok(MockArray::Vector(matrix.into_vec()))
    }

    fn import_vector(&self, array: &MockArray, name: PlSmallStr) -> LearnResult<Column> {
        match array {
            MockArray::Vector(v) => {
                validate_vector_layout(&[v.len()], &[8], 8)?;
                Ok(column_from_doubles(v, name))
            },
            MockArray::Matrix(m) => {
                validate_vector_layout(&[m.rows(), m.cols()], &[8 * m.cols() as isize, 8], 8)?;
                unreachable!()
            },
        }
    }

    fn import_matrix(&self, array: &MockArray) -> LearnResult<DenseMatrix> {
        match array {
            MockArray::Matrix(m) => Ok(m.clone()),
            MockArray::Vector(_) => learn_bail!(ShapeMismatch: "expected a two-dimensional array"),
        }
    }

    fn fit(&self, model: &MeanModel, xs: &MockArray, y: &MockArray) -> LearnResult<()> {
        let (MockArray::Matrix(_), MockArray::Vector(y)) = (xs, y) else {
            learn_bail!(ForeignRuntime: "fit expects a matrix and a vector");
        };
        let n = non_nan(y).count();
        learn_ensure!(n > 0, ForeignRuntime: "cannot fit on an all-null target");
        *model.mean.lock().unwrap() = Some(non_nan(y).sum::<f64>() / n as f64);
        Ok(())
    }

    fn score(&self, model: &MeanModel, xs: &MockArray, y: &MockArray) -> LearnResult<f64> {
        let MockArray::Vector(y) = y else {
            learn_bail!(ForeignRuntime: "score expects a target vector");
        };
        let MockArray::Vector(pred) = self.predict(model, xs)? else {
            unreachable!()
        };
        let sq = y
            .iter()
            .zip(&pred)
            .filter(|(y, _)| !y.is_nan())
            .map(|(y, p)| (y - p) * (y - p))
            .sum::<f64>();
        Ok(-sq)
    }

    fn predict(&self, model: &MeanModel, xs: &MockArray) -> LearnResult<MockArray> {
        let MockArray::Matrix(xs) = xs else {
            learn_bail!(ForeignRuntime: "predict expects a matrix");
        };
        let mean = model
            .mean
            .lock()
            .unwrap()
            .ok_or_else(|| learn_err!(ForeignRuntime: "model is not fitted"))?;
        Ok(MockArray::Vector(vec![mean; xs.rows()]))
    }

    fn confusion_matrix(&self, y_true: &MockArray, y_pred: &MockArray) -> LearnResult<MockArray> {
        let (MockArray::Vector(t), MockArray::Vector(p)) = (y_true, y_pred) else {
            learn_bail!(ForeignRuntime: "confusion matrix expects two vectors");
        };
        let mut labels = t.iter().chain(p).map(|v| *v as i64).collect::<Vec<_>>();
        labels.sort_unstable();
        labels.dedup();
        let n = labels.len();
        let mut counts = vec![0.0; n * n];
        for (t, p) in t.iter().zip(p) {
            let i = labels.binary_search(&(*t as i64)).unwrap();
            let j = labels.binary_search(&(*p as i64)).unwrap();
            counts[i * n + j] += 1.0;
        }
        Ok(MockArray::Matrix(DenseMatrix::try_from_vec(counts, n, n)?))
    }
}

fn training_data() -> (DataFrame, Column) {
    let xs = df![
        "a" => [1.0f64, 2.0, 3.0, 4.0],
        "b" => [Some(1i64), None, Some(0), Some(1)]
    ]
    .unwrap();
    let y = Column::new("y".into(), &[1.0f64, 3.0, 5.0, 7.0]);
    (xs, y)
}

#[test]
fn test_fit_then_predict() -> LearnResult<()> {
    let (xs, y) = training_data();
    let model = MeanModel::default();
    runtime::fit(&MockRuntime, &model, &xs, &y)?;

    let predictions = runtime::predict(&MockRuntime, &model, &xs)?;
    assert_eq!(predictions.name().as_str(), "Predictions");
    let values = Vec::from(predictions.as_materialized_series().f64()?);
    assert_eq!(values, [Some(4.0); 4]);

    let score = runtime::score(&MockRuntime, &model, &xs, &y)?;
    assert_eq!(score, -(9.0 + 1.0 + 1.0 + 9.0));
    Ok(())
}

#[test]
fn test_fit_rejects_unequal_rows_before_calling_the_runtime() {
    let (xs, _) = training_data();
    let y = Column::new("y".into(), &[1.0f64, 2.0, 3.0]);
    let model = MeanModel::default();
    let err = runtime::fit(&MockRuntime, &model, &xs, &y).unwrap_err();
    assert!(matches!(err, LearnError::ShapeMismatch(_)));
    assert!(model.mean.lock().unwrap().is_none());
}

#[test]
fn test_string_features_are_rejected() {
    let xs = df!["s" => ["a", "b"]].unwrap();
    let y = Column::new("y".into(), &[1.0f64, 2.0]);
    let err = runtime::fit(&MockRuntime, &MeanModel::default(), &xs, &y).unwrap_err();
    assert!(matches!(err, LearnError::UnsupportedType(_)));
}

#[test]
fn test_foreign_failures_propagate() {
    let (xs, _) = training_data();
    let err = runtime::predict(&MockRuntime, &MeanModel::default(), &xs).unwrap_err();
    assert!(matches!(err, LearnError::ForeignRuntime(_)));
    assert_eq!(err.to_string(), "foreign runtime failure: model is not fitted");
}

#[test]
fn test_vector_round_trip() -> LearnResult<()> {
    let c = Column::new("v".into(), &[Some(1.5f64), None, Some(2.5), None]);
    let array = runtime::vector_from_column(&MockRuntime, &c)?;
    let back = runtime::column_from_vector(&MockRuntime, &array, "v".into())?;
    assert_eq!(
        Vec::from(back.as_materialized_series().f64()?),
        [Some(1.5), None, Some(2.5), None]
    );
    Ok(())
}

#[test]
fn test_column_from_matrix_is_rejected() -> LearnResult<()> {
    let (xs, _) = training_data();
    let array = runtime::matrix_from_table(&MockRuntime, &xs)?;
    let err = runtime::column_from_vector(&MockRuntime, &array, "v".into()).unwrap_err();
    assert!(matches!(err, LearnError::ShapeMismatch(_)));
    Ok(())
}

#[test]
fn test_confusion_matrix_table() -> LearnResult<()> {
    let y_true = Column::new("t".into(), &[0i64, 1, 1, 0]);
    let y_pred = Column::new("p".into(), &[0i64, 1, 0, 0]);
    let table = runtime::confusion_matrix(&MockRuntime, &y_true, &y_pred)?;
    assert_eq!(table.shape(), (2, 2));
    let col0 = Vec::from(table.column("0")?.as_materialized_series().f64()?);
    let col1 = Vec::from(table.column("1")?.as_materialized_series().f64()?);
    assert_eq!(col0, [Some(2.0), Some(1.0)]);
    assert_eq!(col1, [Some(0.0), Some(1.0)]);
    Ok(())
}
