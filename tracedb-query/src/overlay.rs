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

//! Storage Overlays
//!
//! An overlay sits between the table's row space and a storage's element
//! space, rewriting indices on the way down and bitmaps on the way back up.
//! Overlays stack: the executor walks them outermost-first toward storage
//! and innermost-first when lifting results back to table space.
//!
//! Beyond pure index translation, an overlay may be able to answer a
//! predicate for some rows without touching storage at all.
//! `is_storage_lookup_required` partitions candidate rows into the ones the
//! overlay can decide alone and the ones that must descend; `index_search`
//! answers for the former group.
//!
//! Only null handling matters at this level, so the full operator set is
//! narrowed to [`OverlayOp`] once per predicate; value comparisons stay with
//! storage.

use tracedb_core::{BitVector, FilterOp, RowRange};

/// Overlay-facing view of a filter operator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverlayOp {
    IsNull,
    IsNotNull,
    /// Any value comparison; decided by storage
    Other,
}

impl From<FilterOp> for OverlayOp {
    fn from(op: FilterOp) -> Self {
        match op {
            FilterOp::IsNull => OverlayOp::IsNull,
            FilterOp::IsNotNull => OverlayOp::IsNotNull,
            _ => OverlayOp::Other,
        }
    }
}

/// Bidirectional mapping between an outer row space and an inner element
/// space.
///
/// Implementations are stateless with respect to a single filter call and
/// are only ever borrowed for its duration.
pub trait StorageOverlay {
    /// Narrow a contiguous outer range into the inner space
    fn map_to_storage_range(&self, range: RowRange) -> RowRange;

    /// Rewrite outer indices (already known to need storage) into inner
    /// indices, preserving order
    fn map_to_storage_index_vector(&self, indices: &[u32]) -> Vec<u32>;

    /// One bit per index: set iff the row must still consult storage
    fn is_storage_lookup_required(&self, op: OverlayOp, indices: &[u32]) -> BitVector;

    /// Answer `op` for rows that do not need storage; one bit per index
    fn index_search(&self, op: OverlayOp, indices: &[u32]) -> BitVector;

    /// Lift an inner-space result bitmap to the outer row space
    fn map_to_table_bit_vector(&self, storage: BitVector, op: OverlayOp) -> BitVector;
}

/// Overlay for nullable columns.
///
/// Wraps a non-null mask over the outer row space; the inner storage holds
/// one element per set mask bit, addressed by rank. Null rows never reach
/// storage: under `IsNull`/`IsNotNull` the mask itself is the answer, and
/// under value comparisons they simply fail.
pub struct NullOverlay<'a> {
    /// Set bit = row is non-null
    non_null: &'a BitVector,
}

impl<'a> NullOverlay<'a> {
    pub fn new(non_null: &'a BitVector) -> Self {
        Self { non_null }
    }

    /// Element count of the storage this overlay wraps
    pub fn storage_len(&self) -> usize {
        self.non_null.count_set_bits()
    }
}

impl StorageOverlay for NullOverlay<'_> {
    fn map_to_storage_range(&self, range: RowRange) -> RowRange {
        RowRange::new(
            self.non_null.count_set_bits_before(range.start as usize) as u32,
            self.non_null.count_set_bits_before(range.end as usize) as u32,
        )
    }

    fn map_to_storage_index_vector(&self, indices: &[u32]) -> Vec<u32> {
        indices
            .iter()
            .map(|&idx| {
                debug_assert!(self.non_null.is_set(idx as usize));
                self.non_null.count_set_bits_before(idx as usize) as u32
            })
            .collect()
    }

    fn is_storage_lookup_required(&self, _op: OverlayOp, indices: &[u32]) -> BitVector {
        let mut bv = BitVector::new(indices.len());
        for (i, &idx) in indices.iter().enumerate() {
            if self.non_null.is_set(idx as usize) {
                bv.set(i);
            }
        }
        bv
    }

    fn index_search(&self, op: OverlayOp, indices: &[u32]) -> BitVector {
        // only null rows land here
        match op {
            OverlayOp::IsNull => BitVector::all_set(indices.len()),
            OverlayOp::IsNotNull | OverlayOp::Other => BitVector::new(indices.len()),
        }
    }

    fn map_to_table_bit_vector(&self, storage: BitVector, op: OverlayOp) -> BitVector {
        debug_assert_eq!(storage.len(), self.storage_len());
        let mut out = BitVector::new(self.non_null.len());
        let mut storage_idx = 0;
        for (idx, non_null) in self.non_null.iter_all() {
            if non_null {
                if storage.is_set(storage_idx) {
                    out.set(idx);
                }
                storage_idx += 1;
            } else if op == OverlayOp::IsNull {
                out.set(idx);
            }
        }
        out
    }
}
