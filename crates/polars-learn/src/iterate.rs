//! Null-aware traversal of typed columns.
//!
//! [`iterate_over`] is the statically typed building block: it walks a
//! [`ChunkedArray`] in row order and hands every slot to exactly one of two
//! closures. [`iterate_over_generic`] dispatches once on the dtype of a
//! [`Column`] and forwards the values with their concrete type to a
//! [`NullAwareVisitor`].
use polars_core::prelude::*;

use crate::error::LearnResult;
use crate::learn_bail;

/// A point in time as stored in a `Datetime` column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timestamp {
    pub value: i64,
    pub unit: TimeUnit,
}

/// Receives every slot of a column with its concrete primitive type.
///
/// Exactly one method is called per slot. Implementations that cannot handle
/// a type return an error from the corresponding method; the iteration does
/// not filter beforehand.
pub trait NullAwareVisitor {
    fn visit_f64(&mut self, value: f64) -> LearnResult<()>;

    fn visit_i64(&mut self, value: i64) -> LearnResult<()>;

    fn visit_u64(&mut self, value: u64) -> LearnResult<()>;

    fn visit_str(&mut self, value: &str) -> LearnResult<()>;

    fn visit_timestamp(&mut self, value: Timestamp) -> LearnResult<()>;

    fn visit_null(&mut self) -> LearnResult<()>;
}

/// Visit every slot of `ca` in row order, calling `on_value` for present
/// values and `on_null` for nulls. Both callbacks share `state`. Stops at the
/// first error.
pub fn iterate_over<'a, T, S, V, N>(
    ca: &'a ChunkedArray<T>,
    state: &mut S,
    mut on_value: V,
    mut on_null: N,
) -> LearnResult<()>
where
    T: PolarsDataType,
    S: ?Sized,
    V: FnMut(&mut S, T::Physical<'a>) -> LearnResult<()>,
    N: FnMut(&mut S) -> LearnResult<()>,
{
    for opt_v in ca.iter() {
        match opt_v {
            Some(v) => on_value(state, v)?,
            None => on_null(state)?,
        }
    }
    Ok(())
}

/// Visit every slot of `column`, dispatching on its dtype once.
///
/// Floats arrive as `f64`, `Int32`/`UInt32`/`Int64` as `i64`, `UInt64` as
/// `u64`, strings as `&str` and datetimes as [`Timestamp`]. A column of dtype
/// `Null` yields one null per row.
pub fn iterate_over_generic<V>(column: &Column, visitor: &mut V) -> LearnResult<()>
where
    V: NullAwareVisitor + ?Sized,
{
    let s = column.as_materialized_series();
    match s.dtype() {
        DataType::Float64 => iterate_over(
            s.f64()?,
            visitor,
            |vis, v| vis.visit_f64(v),
            |vis| vis.visit_null(),
        ),
        DataType::Float32 => iterate_over(
            s.f32()?,
            visitor,
            |vis, v| vis.visit_f64(v as f64),
            |vis| vis.visit_null(),
        ),
        DataType::Int64 => iterate_over(
            s.i64()?,
            visitor,
            |vis, v| vis.visit_i64(v),
            |vis| vis.visit_null(),
        ),
        DataType::Int32 => iterate_over(
            s.i32()?,
            visitor,
            |vis, v| vis.visit_i64(v as i64),
            |vis| vis.visit_null(),
        ),
        DataType::UInt32 => iterate_over(
            s.u32()?,
            visitor,
            |vis, v| vis.visit_i64(v as i64),
            |vis| vis.visit_null(),
        ),
        DataType::UInt64 => iterate_over(
            s.u64()?,
            visitor,
            |vis, v| vis.visit_u64(v),
            |vis| vis.visit_null(),
        ),
        DataType::String => iterate_over(
            s.str()?,
            visitor,
            |vis, v| vis.visit_str(v),
            |vis| vis.visit_null(),
        ),
        DataType::Datetime(unit, _) => {
            let unit = *unit;
            let phys = s.to_physical_repr();
            iterate_over(
                phys.i64()?,
                visitor,
                |vis, value| vis.visit_timestamp(Timestamp { value, unit }),
                |vis| vis.visit_null(),
            )
        },
        DataType::Null => {
            for _ in 0..s.len() {
                visitor.visit_null()?;
            }
            Ok(())
        },
        dt => learn_bail!(
            UnsupportedType: "cannot iterate over column '{}' of dtype {}",
            column.name(),
            dt
        ),
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::error::LearnError;

    #[derive(Default)]
    struct Recorder {
        seen: Vec<String>,
    }

    impl NullAwareVisitor for Recorder {
        fn visit_f64(&mut self, value: f64) -> LearnResult<()> {
            self.seen.push(format!("f64:{value}"));
            Ok(())
        }

        fn visit_i64(&mut self, value: i64) -> LearnResult<()> {
            self.seen.push(format!("i64:{value}"));
            Ok(())
        }

        fn visit_u64(&mut self, value: u64) -> LearnResult<()> {
            self.seen.push(format!("u64:{value}"));
            Ok(())
        }

        fn visit_str(&mut self, value: &str) -> LearnResult<()> {
            self.seen.push(format!("str:{value}"));
            Ok(())
        }

        fn visit_timestamp(&mut self, value: Timestamp) -> LearnResult<()> {
            self.seen.push(format!("ts:{}", value.value));
            Ok(())
        }

        fn visit_null(&mut self) -> LearnResult<()> {
            self.seen.push("null".to_string());
            Ok(())
        }
    }

    fn record(column: &Column) -> LearnResult<Vec<String>> {
        let mut rec = Recorder::default();
        iterate_over_generic(column, &mut rec)?;
        Ok(rec.seen)
    }

    #[test]
    fn test_visits_every_slot_in_order() -> LearnResult<()> {
        let c = Column::new("a".into(), &[Some(1.5f64), None, Some(-2.0)]);
        assert_eq!(record(&c)?, ["f64:1.5", "null", "f64:-2"]);

        let c = Column::new("b".into(), &[None, Some(7i64)]);
        assert_eq!(record(&c)?, ["null", "i64:7"]);

        let c = Column::new("c".into(), &[Some("x"), None]);
        assert_eq!(record(&c)?, ["str:x", "null"]);
        Ok(())
    }

    #[test]
    fn test_narrow_types_are_widened() -> LearnResult<()> {
        let c = Column::new("a".into(), &[1i32, -1]);
        assert_eq!(record(&c)?, ["i64:1", "i64:-1"]);

        let c = Column::new("a".into(), &[3u32]);
        assert_eq!(record(&c)?, ["i64:3"]);

        let c = Column::new("a".into(), &[0.5f32]);
        assert_eq!(record(&c)?, ["f64:0.5"]);
        Ok(())
    }

    #[test]
    fn test_u64_keeps_full_range() -> LearnResult<()> {
        let c = Column::new("a".into(), &[Some(u64::MAX), None, Some(2)]);
        assert_eq!(record(&c)?, [format!("u64:{}", u64::MAX).as_str(), "null", "u64:2"]);
        Ok(())
    }

    #[test]
    fn test_datetime_yields_timestamps() -> LearnResult<()> {
        let c = Column::new("t".into(), &[Some(1_000i64), None])
            .cast(&DataType::Datetime(TimeUnit::Milliseconds, None))?;
        assert_eq!(record(&c)?, ["ts:1000", "null"]);
        Ok(())
    }

    #[test]
    fn test_multiple_chunks() -> LearnResult<()> {
        let mut s = Series::new("a".into(), &[Some(1.0f64), None]);
        s.append(&Series::new("a".into(), &[Some(3.0f64)]))?;
        assert_eq!(s.n_chunks(), 2);
        assert_eq!(record(&s.into())?, ["f64:1", "null", "f64:3"]);
        Ok(())
    }

    #[test]
    fn test_unsupported_dtype() {
        let c = Column::new("flag".into(), &[true, false]);
        let err = record(&c).unwrap_err();
        assert!(matches!(err, LearnError::UnsupportedType(_)));
    }

    #[test]
    fn test_typed_iteration_stops_at_first_error() {
        let ca = Float64Chunked::from_slice("a".into(), &[1.0, 2.0, 3.0]);
        let mut visited = 0usize;
        let out = iterate_over(
            &ca,
            &mut visited,
            |visited, v| {
                *visited += 1;
                if v == 2.0 {
                    learn_bail!(UnsupportedType: "stop");
                }
                Ok(())
            },
            |_| Ok(()),
        );
        assert!(out.is_err());
        assert_eq!(visited, 2);
    }
}
