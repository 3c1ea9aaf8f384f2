pub use crate::boundary::{translate_error, ErrorSlot, FallbackValue};
pub use crate::error::{LearnError, LearnResult};
pub use crate::iterate::{iterate_over, iterate_over_generic, NullAwareVisitor, Timestamp};
pub use crate::matrix::{matrix_from_columns, table_from_matrix, DenseMatrix, MatrixBuilder};
pub use crate::one_hot::one_hot_encode;
pub use crate::reconstruct::{column_from_doubles, validate_vector_layout};
pub use crate::registry::ObjectRegistry;
pub use crate::runtime::NumericRuntime;
pub use crate::{learn_bail, learn_ensure, learn_err};
