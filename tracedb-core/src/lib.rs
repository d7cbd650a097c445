// SPDX-License-Identifier: AGPL-3.0-or-later
// TraceDB - Columnar Trace Analytics Engine
// Copyright (C) 2026 Sushanth Reddy Vanagala (https://github.com/sushanthpy)
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program. If not, see <https://www.gnu.org/licenses/>.

//! TraceDB Core
//!
//! Fundamental data structures for the in-memory analytical table store:
//!
//! - **Bit vector**: dense word-backed bit set with rank/select
//! - **Row map**: compact row-index sets (range, bitmap, index vector)
//! - **Columns and tables**: typed buffers with null masks and selectors
//! - **Predicate vocabulary**: constraint values and filter operators
//!
//! # Example
//!
//! ```rust
//! use tracedb_core::{Column, Table, Value};
//!
//! let table = Table::new(
//!     "slices",
//!     vec![
//!         Column::int64("ts", vec![100, 200, 300]),
//!         Column::int64_nullable("dur", vec![Some(10), None, Some(30)]),
//!     ],
//! )
//! .unwrap();
//!
//! assert_eq!(table.row_count(), 3);
//! assert_eq!(table.column(1).value_at(1), Value::Null);
//! ```

pub mod bitvec;
pub mod column;
pub mod error;
pub mod row_map;
pub mod table;
pub mod value;

pub use bitvec::BitVector;
pub use column::{Column, ColumnData, ColumnType};
pub use error::{Result, TraceDBError};
pub use row_map::{RowMap, RowMapIter, RowRange};
pub use table::Table;
pub use value::{Constraint, FilterOp, Value};

/// Library version
pub const TRACEDB_VERSION: &str = env!("CARGO_PKG_VERSION");
