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

//! Typed Columns
//!
//! A column is a typed base buffer plus the mappings that turn a table row
//! into a buffer element:
//!
//! - An optional **non-null mask**: one bit per base row, set where a value
//!   is present. The buffer holds only the present values, addressed by the
//!   rank of their mask bit, so a column of N rows with k nulls stores
//!   N − k elements.
//! - An optional **row selector**: an explicit table-row → base-row mapping.
//!   Columns carrying one are resolved row by row rather than through the
//!   vectorized pipeline.
//!
//! Nullable layout example, 4 rows with rows 1 and 3 null:
//!
//! ```text
//! mask:   1 0 1 0
//! buffer: [v0, v2]          // value_at(2) = buffer[rank(2)] = buffer[1]
//! ```

use serde::{Deserialize, Serialize};

use crate::bitvec::BitVector;
use crate::value::Value;

/// Column type tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ColumnType {
    Int64,
    UInt64,
    Float64,
    String,
    /// Synthetic identity column: the value of a row is its own index
    Id,
    /// Placeholder column with no values
    Dummy,
}

/// Typed base buffer of a column
#[derive(Debug, Clone)]
pub enum ColumnData {
    Int64(Vec<i64>),
    UInt64(Vec<u64>),
    Float64(Vec<f64>),
    String(Vec<String>),
    /// Identity column of the given length; no backing buffer
    Id(usize),
    /// Dummy column of the given length; every cell is null
    Dummy(usize),
}

impl ColumnData {
    /// Number of elements in the base buffer
    pub fn len(&self) -> usize {
        match self {
            ColumnData::Int64(v) => v.len(),
            ColumnData::UInt64(v) => v.len(),
            ColumnData::Float64(v) => v.len(),
            ColumnData::String(v) => v.len(),
            ColumnData::Id(len) | ColumnData::Dummy(len) => *len,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// One typed column of a table
#[derive(Debug, Clone)]
pub struct Column {
    name: String,
    ty: ColumnType,
    data: ColumnData,
    /// Set bit = value present; length is the base row count
    null_mask: Option<BitVector>,
    /// Table row → base row; presence disqualifies the vectorized pipeline
    selector: Option<Vec<u32>>,
    is_sorted: bool,
    is_dense: bool,
}

impl Column {
    fn build(name: impl Into<String>, ty: ColumnType, data: ColumnData) -> Self {
        Self {
            name: name.into(),
            ty,
            data,
            null_mask: None,
            selector: None,
            is_sorted: false,
            is_dense: false,
        }
    }

    /// Pack `Some`/`None` values into a buffer plus non-null mask
    fn pack<T>(values: Vec<Option<T>>) -> (Vec<T>, BitVector) {
        let mut mask = BitVector::new(values.len());
        let mut packed = Vec::with_capacity(values.len());
        for (i, v) in values.into_iter().enumerate() {
            if let Some(v) = v {
                mask.set(i);
                packed.push(v);
            }
        }
        (packed, mask)
    }

    pub fn int64(name: impl Into<String>, values: Vec<i64>) -> Self {
        Self::build(name, ColumnType::Int64, ColumnData::Int64(values))
    }

    pub fn int64_nullable(name: impl Into<String>, values: Vec<Option<i64>>) -> Self {
        let (packed, mask) = Self::pack(values);
        let mut col = Self::build(name, ColumnType::Int64, ColumnData::Int64(packed));
        col.null_mask = Some(mask);
        col
    }

    pub fn uint64(name: impl Into<String>, values: Vec<u64>) -> Self {
        Self::build(name, ColumnType::UInt64, ColumnData::UInt64(values))
    }

    pub fn uint64_nullable(name: impl Into<String>, values: Vec<Option<u64>>) -> Self {
        let (packed, mask) = Self::pack(values);
        let mut col = Self::build(name, ColumnType::UInt64, ColumnData::UInt64(packed));
        col.null_mask = Some(mask);
        col
    }

    pub fn float64(name: impl Into<String>, values: Vec<f64>) -> Self {
        Self::build(name, ColumnType::Float64, ColumnData::Float64(values))
    }

    pub fn float64_nullable(name: impl Into<String>, values: Vec<Option<f64>>) -> Self {
        let (packed, mask) = Self::pack(values);
        let mut col = Self::build(name, ColumnType::Float64, ColumnData::Float64(packed));
        col.null_mask = Some(mask);
        col
    }

    pub fn string(name: impl Into<String>, values: Vec<String>) -> Self {
        Self::build(name, ColumnType::String, ColumnData::String(values))
    }

    pub fn string_nullable(name: impl Into<String>, values: Vec<Option<String>>) -> Self {
        let (packed, mask) = Self::pack(values);
        let mut col = Self::build(name, ColumnType::String, ColumnData::String(packed));
        col.null_mask = Some(mask);
        col
    }

    pub fn id(name: impl Into<String>, len: usize) -> Self {
        Self::build(name, ColumnType::Id, ColumnData::Id(len))
    }

    pub fn dummy(name: impl Into<String>, len: usize) -> Self {
        Self::build(name, ColumnType::Dummy, ColumnData::Dummy(len))
    }

    /// Mark the column as sorted ascending
    pub fn sorted(mut self) -> Self {
        self.is_sorted = true;
        self
    }

    /// Mark the column as dense
    pub fn dense(mut self) -> Self {
        self.is_dense = true;
        self
    }

    /// Attach an explicit table-row → base-row selector
    pub fn with_selector(mut self, selector: Vec<u32>) -> Self {
        self.selector = Some(selector);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn column_type(&self) -> ColumnType {
        self.ty
    }

    pub fn data(&self) -> &ColumnData {
        &self.data
    }

    pub fn null_mask(&self) -> Option<&BitVector> {
        self.null_mask.as_ref()
    }

    pub fn selector(&self) -> Option<&[u32]> {
        self.selector.as_deref()
    }

    pub fn is_sorted(&self) -> bool {
        self.is_sorted
    }

    pub fn is_dense(&self) -> bool {
        self.is_dense
    }

    pub fn is_nullable(&self) -> bool {
        self.null_mask.is_some()
    }

    /// Number of table rows addressed by this column
    pub fn row_count(&self) -> usize {
        if let Some(sel) = &self.selector {
            return sel.len();
        }
        match &self.null_mask {
            Some(mask) => mask.len(),
            None => self.data.len(),
        }
    }

    /// True if the cell at `row` is null
    pub fn is_null(&self, row: u32) -> bool {
        let base = self.base_row(row);
        if matches!(self.data, ColumnData::Dummy(_)) {
            return true;
        }
        match &self.null_mask {
            Some(mask) => !mask.is_set(base as usize),
            None => false,
        }
    }

    /// The logical value of the cell at `row`
    pub fn value_at(&self, row: u32) -> Value {
        let base = self.base_row(row);
        let idx = match &self.null_mask {
            Some(mask) => {
                if !mask.is_set(base as usize) {
                    return Value::Null;
                }
                mask.count_set_bits_before(base as usize)
            }
            None => base as usize,
        };
        match &self.data {
            ColumnData::Int64(v) => Value::Int(v[idx]),
            ColumnData::UInt64(v) => Value::UInt(v[idx]),
            ColumnData::Float64(v) => Value::Double(v[idx]),
            ColumnData::String(v) => Value::String(v[idx].clone()),
            ColumnData::Id(_) => Value::UInt(base as u64),
            ColumnData::Dummy(_) => Value::Null,
        }
    }

    #[inline]
    fn base_row(&self, row: u32) -> u32 {
        match &self.selector {
            Some(sel) => sel[row as usize],
            None => row,
        }
    }
}
