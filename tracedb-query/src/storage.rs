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

//! Numeric Storage
//!
//! The innermost element buffer of a column, borrowed for the duration of a
//! filter call. Two search primitives back the two filter strategies:
//!
//! - `linear_search`: one contiguous pass over a range of elements,
//!   producing a storage-sized bitmap with bits set only inside the range.
//! - `index_search`: a probe over an explicit index list, producing a
//!   bitmap with one bit per probed index.
//!
//! Elements are never null at this level; `IsNull` matches nothing and
//! `IsNotNull` matches every element. A constraint value of the wrong type
//! matches nothing (callers reroute those before they get here).

use tracedb_core::{BitVector, FilterOp, RowRange, Value};

/// Borrowed typed element buffer
#[derive(Debug, Clone, Copy)]
pub enum NumericStorage<'a> {
    Int64(&'a [i64]),
    UInt64(&'a [u64]),
    Float64(&'a [f64]),
}

impl NumericStorage<'_> {
    /// Number of elements
    pub fn len(&self) -> usize {
        match self {
            NumericStorage::Int64(d) => d.len(),
            NumericStorage::UInt64(d) => d.len(),
            NumericStorage::Float64(d) => d.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Scan `range` for elements satisfying `op value`.
    ///
    /// The result always has one bit per storage element; positions outside
    /// `range` are clear.
    pub fn linear_search(&self, op: FilterOp, value: &Value, range: RowRange) -> BitVector {
        match op {
            FilterOp::IsNull => BitVector::new(self.len()),
            FilterOp::IsNotNull => {
                let mut bv = BitVector::new(self.len());
                let end = (range.end as usize).min(self.len());
                for i in (range.start as usize).min(end)..end {
                    bv.set(i);
                }
                bv
            }
            _ => match (self, value) {
                (NumericStorage::Int64(d), Value::Int(v)) => linear_kernel(d, op, v, range),
                (NumericStorage::UInt64(d), Value::UInt(v)) => linear_kernel(d, op, v, range),
                (NumericStorage::Float64(d), Value::Double(v)) => linear_kernel(d, op, v, range),
                _ => BitVector::new(self.len()),
            },
        }
    }

    /// Probe `indices` for elements satisfying `op value`.
    ///
    /// Bit `i` of the result reports on `storage[indices[i]]`.
    pub fn index_search(&self, op: FilterOp, value: &Value, indices: &[u32]) -> BitVector {
        match op {
            FilterOp::IsNull => BitVector::new(indices.len()),
            FilterOp::IsNotNull => BitVector::all_set(indices.len()),
            _ => match (self, value) {
                (NumericStorage::Int64(d), Value::Int(v)) => index_kernel(d, op, v, indices),
                (NumericStorage::UInt64(d), Value::UInt(v)) => index_kernel(d, op, v, indices),
                (NumericStorage::Float64(d), Value::Double(v)) => index_kernel(d, op, v, indices),
                _ => BitVector::new(indices.len()),
            },
        }
    }
}

fn linear_kernel<T: PartialOrd>(data: &[T], op: FilterOp, target: &T, range: RowRange) -> BitVector {
    let mut bv = BitVector::new(data.len());
    let end = (range.end as usize).min(data.len());
    for (i, item) in data
        .iter()
        .enumerate()
        .take(end)
        .skip((range.start as usize).min(end))
    {
        if op.compare(item, target) {
            bv.set(i);
        }
    }
    bv
}

fn index_kernel<T: PartialOrd>(data: &[T], op: FilterOp, target: &T, indices: &[u32]) -> BitVector {
    let mut bv = BitVector::new(indices.len());
    for (i, &idx) in indices.iter().enumerate() {
        debug_assert!((idx as usize) < data.len());
        if op.compare(&data[idx as usize], target) {
            bv.set(i);
        }
    }
    bv
}
