//! Table preprocessing stages.
//!
//! Each stage borrows a [`Table`] and returns a new one, so stages compose as
//! plain function calls:
//!
//! ```no_run
//! use tabprep::preprocess::{
//!     ImputeStrategy, ReadOptions, Task, impute_missing, load_table, mark_categorical,
//!     one_hot_encode,
//! };
//! use std::path::Path;
//! use std::sync::Arc;
//!
//! let raw = load_table(Path::new("heart.csv"), &ReadOptions::default())?;
//! let typed = mark_categorical(&raw, &["cp".to_owned(), "thal".to_owned()])?;
//! let (imputed, _) = impute_missing(&typed, &[], ImputeStrategy::Median, "miss_")?;
//! let (encoded, _) = one_hot_encode(&imputed)?;
//!
//! let table = Arc::new(encoded);
//! let task = Task::classification("heart", table, "target", 0.7, 42)?;
//! println!("{} training rows", task.split.train.len());
//! # Ok::<(), tabprep::error::PrepError>(())
//! ```

pub mod encode;
pub mod io;
pub mod missing;
pub mod naming;
pub mod schema;
pub mod split;
pub mod task;
pub mod types;

pub use encode::{Encoding, observed_levels, one_hot_encode, one_hot_encode_except};
pub use io::{ReadOptions, load_table, save_table};
pub use missing::{FillMethod, ImputationRecord, impute_missing};
pub use schema::{ColumnSpec, SchemaMatchMode, TableSchema, apply_schema, mark_categorical};
pub use split::{Split, random_split, stratified_split, train_size};
pub use task::{Task, TaskBundle, TaskKind, TaskRecord};
pub use types::{ColumnKind, ImputeStrategy, Table};
