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

//! Table Filter Bridge
//!
//! Entry point for filtering a whole table: builds a vectorized binding for
//! every column that supports one and applies each constraint in turn to
//! the running row map. Columns that don't fit the vectorized pipeline
//! (strings, synthetic ids, dummies, sorted or dense fast-path columns,
//! columns behind a row selector) and constraints whose value type doesn't
//! match the column fall back to a row-at-a-time scan.
//!
//! Constraints are applied strictly in order, each against the intersection
//! produced by the previous one; because every step intersects, the final
//! set is order-independent even though the work done is not.

use tracing::debug;

use tracedb_core::{
    Column, ColumnData, ColumnType, Constraint, FilterOp, RowMap, Table, Value,
};

use crate::executor::{filter_column, FilterConfig, SimpleColumn};
use crate::overlay::{NullOverlay, StorageOverlay};
use crate::storage::NumericStorage;

/// Filter `table` by every constraint, returning the matching rows.
pub fn filter_table(table: &Table, constraints: &[Constraint], config: &FilterConfig) -> RowMap {
    let mut storages: Vec<Option<NumericStorage<'_>>> = Vec::with_capacity(table.columns().len());
    let mut null_overlays: Vec<Option<NullOverlay<'_>>> = Vec::with_capacity(table.columns().len());
    for col in table.columns() {
        match storage_binding(col) {
            Some(storage) => {
                storages.push(Some(storage));
                null_overlays.push(col.null_mask().map(NullOverlay::new));
            }
            None => {
                storages.push(None);
                null_overlays.push(None);
            }
        }
    }

    let mut rm = RowMap::all(table.row_count() as u32);
    for c in constraints {
        let col = table.column(c.col);
        let mismatched_type = !value_matches_column(&c.value, col.column_type());
        let has_selector = col.selector().is_some();

        let storage = match &storages[c.col] {
            Some(storage) if !mismatched_type && !has_selector => *storage,
            _ => {
                debug!(column = col.name(), "constraint routed to row-at-a-time filter");
                filter_into(col, c.op, &c.value, &mut rm);
                continue;
            }
        };

        let mut s_col = SimpleColumn::new(storage);
        if let Some(overlay) = &null_overlays[c.col] {
            s_col.overlays.push(overlay as &dyn StorageOverlay);
        }
        filter_column(c, &s_col, &mut rm, config);
    }
    rm
}

/// Vectorized storage for a column, if it qualifies.
///
/// Sorted and dense columns keep their dedicated fast paths; string, id and
/// dummy payloads have no numeric buffer to scan.
fn storage_binding(col: &Column) -> Option<NumericStorage<'_>> {
    if col.is_sorted() || col.is_dense() {
        return None;
    }
    match col.data() {
        ColumnData::Int64(v) => Some(NumericStorage::Int64(v)),
        ColumnData::UInt64(v) => Some(NumericStorage::UInt64(v)),
        ColumnData::Float64(v) => Some(NumericStorage::Float64(v)),
        ColumnData::String(_) | ColumnData::Id(_) | ColumnData::Dummy(_) => None,
    }
}

/// True if a constraint value can be compared against cells of `ty`.
///
/// The typed null carries no value and is compatible with every column.
fn value_matches_column(value: &Value, ty: ColumnType) -> bool {
    match value {
        Value::Null => true,
        Value::Int(_) => ty == ColumnType::Int64,
        Value::UInt(_) => matches!(ty, ColumnType::UInt64 | ColumnType::Id),
        Value::Double(_) => ty == ColumnType::Float64,
        Value::String(_) => ty == ColumnType::String,
    }
}

/// Row-at-a-time fallback: evaluate the predicate against each candidate
/// row's logical value and restrict `rm` to the survivors.
pub fn filter_into(col: &Column, op: FilterOp, value: &Value, rm: &mut RowMap) {
    let mut matched = Vec::with_capacity(rm.size());
    for row in rm.iter() {
        let keep = match op {
            FilterOp::IsNull => col.is_null(row),
            FilterOp::IsNotNull => !col.is_null(row),
            _ => op.compare_values(&col.value_at(row), value),
        };
        if keep {
            matched.push(row);
        }
    }
    *rm = RowMap::from_index_vector(matched);
}
