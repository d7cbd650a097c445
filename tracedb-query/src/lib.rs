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

//! TraceDB Query Engine
//!
//! Columnar filter execution for the in-memory table store. One predicate
//! at a time, a constraint is pushed through a column's overlay stack down
//! to its typed storage and the surviving rows are intersected into the
//! running row map:
//!
//! ```text
//! (Constraint, SimpleColumn, RowMap) → filter_column → RowMap
//! ```
//!
//! ## Execution Strategies
//!
//! The executor picks per predicate between a **bounded** linear scan of
//! the covered storage span and an **indexed** probe of exactly the
//! candidate rows; see [`executor`] for the selection heuristic.
//!
//! ## Example
//!
//! ```rust
//! use tracedb_core::{Column, Constraint, FilterOp, Table, Value};
//! use tracedb_query::{filter_table, FilterConfig};
//!
//! let table = Table::new(
//!     "slices",
//!     vec![Column::int64_nullable(
//!         "dur",
//!         vec![Some(10), None, Some(30), Some(40)],
//!     )],
//! )
//! .unwrap();
//!
//! let rm = filter_table(
//!     &table,
//!     &[Constraint::new(0, FilterOp::Gt, Value::Int(15))],
//!     &FilterConfig::default(),
//! );
//! assert_eq!(rm.iter().collect::<Vec<u32>>(), vec![2, 3]);
//! ```

pub mod bridge;
pub mod executor;
pub mod overlay;
pub mod storage;

pub use bridge::{filter_into, filter_table};
pub use executor::{
    bounded_column_filter, filter_column, indexed_column_filter, FilterConfig, OverlayStack,
    SimpleColumn, DEFAULT_INDEXED_MAX_DENSITY, DEFAULT_INDEXED_MAX_ROWS, MAX_OVERLAY_COUNT,
};
pub use overlay::{NullOverlay, OverlayOp, StorageOverlay};
pub use storage::NumericStorage;
