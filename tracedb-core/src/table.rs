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

//! In-memory analytical table: a named set of equal-length typed columns.
//!
//! Construction validates that every column addresses the same number of
//! rows; everything after that point can assume a rectangular table.

use crate::column::Column;
use crate::error::{Result, TraceDBError};

/// Named collection of equal-length columns
#[derive(Debug, Clone)]
pub struct Table {
    name: String,
    columns: Vec<Column>,
    row_count: usize,
}

impl Table {
    /// Create a table, validating column lengths agree
    pub fn new(name: impl Into<String>, columns: Vec<Column>) -> Result<Self> {
        let row_count = columns.first().map(Column::row_count).unwrap_or(0);
        for col in &columns {
            if col.row_count() != row_count {
                return Err(TraceDBError::ColumnLengthMismatch {
                    column: col.name().to_string(),
                    expected: row_count,
                    actual: col.row_count(),
                });
            }
        }
        Ok(Self {
            name: name.into(),
            columns,
            row_count,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column(&self, idx: usize) -> &Column {
        &self.columns[idx]
    }

    pub fn row_count(&self) -> usize {
        self.row_count
    }
}
