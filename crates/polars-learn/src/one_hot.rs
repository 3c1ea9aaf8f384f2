use polars_core::prelude::*;
use polars_utils::aliases::PlIndexSet;

use crate::error::LearnResult;
use crate::iterate::iterate_over;
use crate::learn_bail;

/// One-hot encode a `String` column.
///
/// Every distinct value gets one `Float64` indicator column named
/// `"<column name>: <value>"`; columns are ordered by first occurrence. A
/// null row is all zeros, which keeps "no category" apart from missing data
/// in the numeric output.
pub fn one_hot_encode(column: &Column) -> LearnResult<DataFrame> {
    let s = column.as_materialized_series();
    let ca = match s.dtype() {
        DataType::String => s.str()?,
        dt => learn_bail!(
            ShapeMismatch: "one-hot encoding expects a string column, '{}' has dtype {}",
            column.name(),
            dt
        ),
    };

    let mut categories: PlIndexSet<&str> = PlIndexSet::default();
    iterate_over(
        ca,
        &mut categories,
        |categories, v| {
            categories.insert(v);
            Ok(())
        },
        |_| Ok(()),
    )?;

    let mut builders = categories
        .iter()
        .map(|category| {
            let name: PlSmallStr = format!("{}: {}", column.name(), category).into();
            PrimitiveChunkedBuilder::<Float64Type>::new(name, ca.len())
        })
        .collect::<Vec<_>>();

    iterate_over(
        ca,
        &mut builders,
        |builders, v| {
            let hot = categories.get_index_of(v);
            for (idx, builder) in builders.iter_mut().enumerate() {
                builder.append_value(if Some(idx) == hot { 1.0 } else { 0.0 });
            }
            Ok(())
        },
        |builders| {
            for builder in builders.iter_mut() {
                builder.append_value(0.0);
            }
            Ok(())
        },
    )?;

    let columns = builders
        .into_iter()
        .map(|builder| builder.finish().into_series().into())
        .collect::<Vec<Column>>();
    Ok(DataFrame::new(columns)?)
}
