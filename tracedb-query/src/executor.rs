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

//! Filter Executor
//!
//! Applies one predicate to one overlay-wrapped column, restricting a row
//! map in place. Two strategies, chosen from the row map's shape:
//!
//! | Strategy | Touches | Best For |
//! |----------|---------|----------|
//! | Bounded | every storage element in `[first, last]` | dense row maps |
//! | Indexed | one probe per candidate row | small, sparse row maps |
//!
//! The bounded path costs the covered span regardless of how many rows are
//! actually live, so once a row map is both small and sparse, probing only
//! its rows wins. The crossover is controlled by [`FilterConfig`], not
//! hard-wired: a planner with overlay-provided cost estimates can replace
//! the heuristic without touching the algorithms.
//!
//! Both algorithms walk the overlay stack outermost-first toward storage.
//! The bounded path narrows a contiguous range, scans once, then lifts the
//! result bitmap back innermost-first. The indexed path carries candidate
//! rows as `(current, global)` pairs so that each overlay may settle some
//! rows on its own (a null overlay answers `IS NULL` without storage) while
//! the rest descend with rewritten indices.

use smallvec::SmallVec;
use tracing::trace;

use tracedb_core::{BitVector, Constraint, Result, RowMap, RowRange, TraceDBError};

use crate::overlay::{OverlayOp, StorageOverlay};
use crate::storage::NumericStorage;

/// Maximum number of overlays a column binding may stack
pub const MAX_OVERLAY_COUNT: usize = 8;

/// Default row-count bound below which the indexed strategy is considered
pub const DEFAULT_INDEXED_MAX_ROWS: usize = 1024;

/// Default density bound below which the indexed strategy is considered
pub const DEFAULT_INDEXED_MAX_DENSITY: f64 = 0.5;

/// Overlay stack, outermost at index 0
pub type OverlayStack<'a> = SmallVec<[&'a dyn StorageOverlay; MAX_OVERLAY_COUNT]>;

/// Strategy-selection thresholds
#[derive(Debug, Clone, Copy)]
pub struct FilterConfig {
    /// Indexed strategy requires fewer rows than this
    pub indexed_max_rows: usize,
    /// Indexed strategy requires `size / (last - first)` below this
    pub indexed_max_density: f64,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            indexed_max_rows: DEFAULT_INDEXED_MAX_ROWS,
            indexed_max_density: DEFAULT_INDEXED_MAX_DENSITY,
        }
    }
}

/// One storage plus its overlay stack, borrowed for a single filter call
pub struct SimpleColumn<'a> {
    pub(crate) storage: NumericStorage<'a>,
    pub(crate) overlays: OverlayStack<'a>,
}

impl<'a> std::fmt::Debug for SimpleColumn<'a> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SimpleColumn")
            .field("storage", &self.storage)
            .field("overlays_len", &self.overlays.len())
            .finish()
    }
}

impl<'a> SimpleColumn<'a> {
    /// Binding with no overlays
    pub fn new(storage: NumericStorage<'a>) -> Self {
        Self {
            storage,
            overlays: SmallVec::new(),
        }
    }

    /// Binding with an overlay stack, outermost first.
    ///
    /// Fails if the stack exceeds [`MAX_OVERLAY_COUNT`].
    pub fn with_overlays(
        storage: NumericStorage<'a>,
        overlays: impl IntoIterator<Item = &'a dyn StorageOverlay>,
    ) -> Result<Self> {
        let overlays: OverlayStack<'a> = overlays.into_iter().collect();
        if overlays.len() > MAX_OVERLAY_COUNT {
            return Err(TraceDBError::OverlayLimit {
                depth: overlays.len(),
                limit: MAX_OVERLAY_COUNT,
            });
        }
        Ok(Self { storage, overlays })
    }

    pub fn storage(&self) -> NumericStorage<'a> {
        self.storage
    }

    pub fn overlays(&self) -> &[&'a dyn StorageOverlay] {
        &self.overlays
    }
}

/// Apply `c` to `col`, restricting `rm` in place.
///
/// The bounded result is intersected into `rm`; the indexed result is
/// already a subset of `rm` and replaces it. An empty `rm` is a no-op.
pub fn filter_column(
    c: &Constraint,
    col: &SimpleColumn<'_>,
    rm: &mut RowMap,
    config: &FilterConfig,
) {
    if rm.is_empty() {
        return;
    }

    let size = rm.size();
    let first = rm.get(0);
    let last = rm.get(size - 1);
    let range_size = last - first;
    // When the covered span is under half full and the set is small,
    // probing individual rows beats scanning the span.
    let density = size as f64 / range_size as f64;
    if size < config.indexed_max_rows && density < config.indexed_max_density {
        trace!(rows = size, density, "applying indexed column filter");
        *rm = indexed_column_filter(c, col, rm);
        return;
    }
    trace!(rows = size, density, "applying bounded column filter");
    let result = bounded_column_filter(c, col, rm);
    rm.intersect(&result);
}

/// Linear-scan strategy.
///
/// Returns the matches over `[rm.first, rm.last]` as a table-space bitmap
/// row map; the caller intersects it into the restriction.
pub fn bounded_column_filter(c: &Constraint, col: &SimpleColumn<'_>, rm: &RowMap) -> RowMap {
    let mut range = RowRange::new(rm.get(0), rm.get(rm.size() - 1) + 1);
    for overlay in &col.overlays {
        range = overlay.map_to_storage_range(range);
    }

    let mut bv = col.storage.linear_search(c.op, &c.value, range);

    let op = OverlayOp::from(c.op);
    for overlay in col.overlays.iter().rev() {
        bv = overlay.map_to_table_bit_vector(bv, op);
    }
    RowMap::from_bit_vector(bv)
}

/// Probe strategy.
///
/// Returns the matching rows as an index-vector row map, already restricted
/// to `rm`.
pub fn indexed_column_filter(c: &Constraint, col: &SimpleColumn<'_>, rm: &RowMap) -> RowMap {
    let table_indices: Vec<u32> = rm.iter().collect();

    let mut to_filter = IndexFilterHelper::new(table_indices);
    let mut valid: Vec<u32> = Vec::new();
    let mut count_removed = 0usize;

    let op = OverlayOp::from(c.op);
    for overlay in &col.overlays {
        let partition = overlay.is_storage_lookup_required(op, to_filter.current());

        // When every row needs storage anyway, skip the partition.
        if partition.count_set_bits() == partition.len() {
            let mapped = overlay.map_to_storage_index_vector(to_filter.current());
            to_filter.set_current(mapped);
            continue;
        }

        // Rows the overlay can settle alone are answered in this pass;
        // their surviving globals are recorded before any index rewrite.
        let (storage_lookup, mut no_storage_lookup) = to_filter.partition(&partition);
        to_filter = storage_lookup;

        let valid_bv = overlay.index_search(op, no_storage_lookup.current());
        count_removed += no_storage_lookup.keep_at_set(&valid_bv);
        valid.extend_from_slice(no_storage_lookup.global());

        let mapped = overlay.map_to_storage_index_vector(to_filter.current());
        to_filter.set_current(mapped);
    }

    let matched = col
        .storage
        .index_search(c.op, &c.value, to_filter.current());
    count_removed += to_filter.keep_at_set(&matched);
    valid.extend_from_slice(to_filter.global());

    debug_assert_eq!(rm.size(), valid.len() + count_removed);

    valid.sort_unstable();
    debug_assert!(valid.windows(2).all(|w| w[0] < w[1]));
    RowMap::from_index_vector(valid)
}

/// Paired `(current, global)` candidate indices.
///
/// `global` is the row in the original table space and survives untouched
/// to the final result; `current` is the row in the space of whichever
/// overlay the walk has reached and is rewritten on each descent. Partition
/// and filtering are stable and always move the two in lockstep.
struct IndexFilterHelper {
    current: Vec<u32>,
    global: Vec<u32>,
}

impl IndexFilterHelper {
    fn new(indices: Vec<u32>) -> Self {
        Self {
            current: indices.clone(),
            global: indices,
        }
    }

    fn empty() -> Self {
        Self {
            current: Vec::new(),
            global: Vec::new(),
        }
    }

    /// Split into (bit set, bit clear) halves, preserving pairing and order
    fn partition(self, bv: &BitVector) -> (IndexFilterHelper, IndexFilterHelper) {
        debug_assert_eq!(bv.len(), self.current.len());
        if bv.count_set_bits() == 0 {
            return (IndexFilterHelper::empty(), self);
        }

        let mut set_partition = IndexFilterHelper::empty();
        let mut non_set_partition = IndexFilterHelper::empty();
        for (i, is_set) in bv.iter_all() {
            let target = if is_set {
                &mut set_partition
            } else {
                &mut non_set_partition
            };
            target.current.push(self.current[i]);
            target.global.push(self.global[i]);
        }
        (set_partition, non_set_partition)
    }

    /// Drop pairs whose bit is clear; returns how many were dropped
    fn keep_at_set(&mut self, bv: &BitVector) -> usize {
        debug_assert!(bv.len() == self.current.len() || bv.count_set_bits() == 0);
        let kept = bv.count_set_bits();
        let removed = self.current.len() - kept;
        if kept == 0 {
            self.current.clear();
            self.global.clear();
            return removed;
        }
        let mut i = 0;
        self.current.retain(|_| {
            let keep = bv.is_set(i);
            i += 1;
            keep
        });
        let mut i = 0;
        self.global.retain(|_| {
            let keep = bv.is_set(i);
            i += 1;
            keep
        });
        removed
    }

    fn current(&self) -> &[u32] {
        &self.current
    }

    fn global(&self) -> &[u32] {
        &self.global
    }

    fn set_current(&mut self, current: Vec<u32>) {
        debug_assert_eq!(current.len(), self.global.len());
        self.current = current;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::overlay::NullOverlay;
    use tracedb_core::{FilterOp, Value};

    fn rows(rm: &RowMap) -> Vec<u32> {
        rm.iter().collect()
    }

    fn mask_of(len: usize, set: &[usize]) -> BitVector {
        let mut bv = BitVector::new(len);
        for &i in set {
            bv.set(i);
        }
        bv
    }

    #[test]
    fn test_bounded_dense_range() {
        let data = [10i64, 20, 30, 40, 50];
        let col = SimpleColumn::new(NumericStorage::Int64(&data));
        let c = Constraint::new(0, FilterOp::Lt, Value::Int(35));
        let mut rm = RowMap::all(5);
        filter_column(&c, &col, &mut rm, &FilterConfig::default());
        assert_eq!(rows(&rm), vec![0, 1, 2]);
    }

    #[test]
    fn test_sparse_row_map() {
        let data = [10i64, 20, 30, 40, 50];
        let col = SimpleColumn::new(NumericStorage::Int64(&data));
        let c = Constraint::new(0, FilterOp::Gt, Value::Int(15));
        let mut rm = RowMap::from_index_vector(vec![0, 3]);
        filter_column(&c, &col, &mut rm, &FilterConfig::default());
        assert_eq!(rows(&rm), vec![3]);
    }

    #[test]
    fn test_strategy_selection() {
        let data: Vec<i64> = (0..10).collect();
        let col = SimpleColumn::new(NumericStorage::Int64(&data));
        let c = Constraint::new(0, FilterOp::Ge, Value::Int(5));

        // a full range is never sparse: the driver scans and the result
        // comes back as a bitmap
        let mut rm = RowMap::all(10);
        filter_column(&c, &col, &mut rm, &FilterConfig::default());
        assert!(matches!(rm, RowMap::BitVector(_)));
        assert_eq!(rows(&rm), (5..10).collect::<Vec<u32>>());

        // loosening the density bound flips the same input to the probe
        // path, whose result is an index vector
        let loose = FilterConfig {
            indexed_max_density: 2.0,
            ..FilterConfig::default()
        };
        let mut rm = RowMap::all(10);
        filter_column(&c, &col, &mut rm, &loose);
        assert!(matches!(rm, RowMap::IndexVector(_)));
        assert_eq!(rows(&rm), (5..10).collect::<Vec<u32>>());

        // the density bound is strict: exactly half full still scans
        let mut rm = RowMap::from_index_vector(vec![0, 4]);
        let c_half = Constraint::new(0, FilterOp::Ge, Value::Int(0));
        filter_column(&c_half, &col, &mut rm, &FilterConfig::default());
        assert_eq!(rows(&rm), vec![0, 4]);
    }

    #[test]
    fn test_single_row_map_goes_bounded() {
        // size 1 has a zero-width span; density is infinite, never sparse
        let data = [1i64, 2, 3];
        let col = SimpleColumn::new(NumericStorage::Int64(&data));
        let c = Constraint::new(0, FilterOp::Eq, Value::Int(2));
        let mut rm = RowMap::from_index_vector(vec![1]);
        filter_column(&c, &col, &mut rm, &FilterConfig::default());
        assert_eq!(rows(&rm), vec![1]);
    }

    #[test]
    fn test_null_overlay_is_null() {
        let mask = mask_of(4, &[0, 2]);
        let data = [7i64, 9];
        let overlay = NullOverlay::new(&mask);
        let col = SimpleColumn::with_overlays(
            NumericStorage::Int64(&data),
            [&overlay as &dyn StorageOverlay],
        )
        .unwrap();

        let c = Constraint::new(0, FilterOp::IsNull, Value::Null);
        let mut rm = RowMap::all(4);
        filter_column(&c, &col, &mut rm, &FilterConfig::default());
        assert_eq!(rows(&rm), vec![1, 3]);
    }

    #[test]
    fn test_null_overlay_value_predicate() {
        let mask = mask_of(4, &[0, 2]);
        let data = [7i64, 9];
        let overlay = NullOverlay::new(&mask);
        let col = SimpleColumn::with_overlays(
            NumericStorage::Int64(&data),
            [&overlay as &dyn StorageOverlay],
        )
        .unwrap();

        let c = Constraint::new(0, FilterOp::Eq, Value::Int(9));
        let mut rm = RowMap::all(4);
        filter_column(&c, &col, &mut rm, &FilterConfig::default());
        assert_eq!(rows(&rm), vec![2]);
    }

    #[test]
    fn test_strategies_agree_large() {
        let data: Vec<i64> = (0..1000).collect();
        let col = SimpleColumn::new(NumericStorage::Int64(&data));
        let c = Constraint::new(0, FilterOp::Ge, Value::Int(500));
        let rm = RowMap::all(1000);

        let indexed = indexed_column_filter(&c, &col, &rm);
        let mut bounded = rm.clone();
        let result = bounded_column_filter(&c, &col, &rm);
        bounded.intersect(&result);

        let expected: Vec<u32> = (500..1000).collect();
        assert_eq!(rows(&indexed), expected);
        assert_eq!(rows(&bounded), expected);
    }

    #[test]
    fn test_empty_result() {
        let data = [1i64, 2, 3];
        let col = SimpleColumn::new(NumericStorage::Int64(&data));
        let c = Constraint::new(0, FilterOp::Gt, Value::Int(100));
        let rm = RowMap::all(3);
        let result = indexed_column_filter(&c, &col, &rm);
        assert!(result.is_empty());
    }

    #[test]
    fn test_empty_row_map_is_noop() {
        let data = [1i64, 2, 3];
        let col = SimpleColumn::new(NumericStorage::Int64(&data));
        let c = Constraint::new(0, FilterOp::Gt, Value::Int(0));
        let mut rm = RowMap::from_index_vector(vec![]);
        filter_column(&c, &col, &mut rm, &FilterConfig::default());
        assert!(rm.is_empty());
    }

    /// Two stacked null overlays. Table rows 1 and 4 are null at the outer
    /// level; of the remaining four, the second and fourth are null at the
    /// inner level. Storage holds the two survivors.
    ///
    /// Any confusion between settled globals and descending indices in the
    /// slow path shifts these results, so they pin the pass ordering.
    fn two_level_setup() -> (BitVector, BitVector, [i64; 2]) {
        let outer = mask_of(6, &[0, 2, 3, 5]);
        let inner = mask_of(4, &[0, 2]);
        (outer, inner, [10, 20])
    }

    #[test]
    fn test_two_overlays_value_predicate() {
        let (outer_mask, inner_mask, data) = two_level_setup();
        let outer = NullOverlay::new(&outer_mask);
        let inner = NullOverlay::new(&inner_mask);
        let col = SimpleColumn::with_overlays(
            NumericStorage::Int64(&data),
            [&outer as &dyn StorageOverlay, &inner as &dyn StorageOverlay],
        )
        .unwrap();

        // storage element 1 (value 20) corresponds to table row 3
        let c = Constraint::new(0, FilterOp::Eq, Value::Int(20));
        let rm = RowMap::all(6);

        let indexed = indexed_column_filter(&c, &col, &rm);
        assert_eq!(rows(&indexed), vec![3]);

        let mut bounded = rm.clone();
        let result = bounded_column_filter(&c, &col, &rm);
        bounded.intersect(&result);
        assert_eq!(rows(&bounded), vec![3]);
    }

    #[test]
    fn test_two_overlays_is_null() {
        let (outer_mask, inner_mask, data) = two_level_setup();
        let outer = NullOverlay::new(&outer_mask);
        let inner = NullOverlay::new(&inner_mask);
        let col = SimpleColumn::with_overlays(
            NumericStorage::Int64(&data),
            [&outer as &dyn StorageOverlay, &inner as &dyn StorageOverlay],
        )
        .unwrap();

        // null at either level: rows 1, 4 (outer) and 2, 5 (inner)
        let c = Constraint::new(0, FilterOp::IsNull, Value::Null);
        let rm = RowMap::all(6);

        let indexed = indexed_column_filter(&c, &col, &rm);
        assert_eq!(rows(&indexed), vec![1, 2, 4, 5]);

        let mut bounded = rm.clone();
        let result = bounded_column_filter(&c, &col, &rm);
        bounded.intersect(&result);
        assert_eq!(rows(&bounded), vec![1, 2, 4, 5]);
    }

    #[test]
    fn test_two_overlays_is_not_null() {
        let (outer_mask, inner_mask, data) = two_level_setup();
        let outer = NullOverlay::new(&outer_mask);
        let inner = NullOverlay::new(&inner_mask);
        let col = SimpleColumn::with_overlays(
            NumericStorage::Int64(&data),
            [&outer as &dyn StorageOverlay, &inner as &dyn StorageOverlay],
        )
        .unwrap();

        let c = Constraint::new(0, FilterOp::IsNotNull, Value::Null);
        let rm = RowMap::all(6);
        let indexed = indexed_column_filter(&c, &col, &rm);
        assert_eq!(rows(&indexed), vec![0, 3]);
    }

    #[test]
    fn test_indexed_restricted_input() {
        // the indexed result is already a subset of the input restriction
        let mask = mask_of(4, &[0, 2]);
        let data = [7i64, 9];
        let overlay = NullOverlay::new(&mask);
        let col = SimpleColumn::with_overlays(
            NumericStorage::Int64(&data),
            [&overlay as &dyn StorageOverlay],
        )
        .unwrap();

        let c = Constraint::new(0, FilterOp::IsNull, Value::Null);
        let rm = RowMap::from_index_vector(vec![1, 2]);
        let result = indexed_column_filter(&c, &col, &rm);
        assert_eq!(rows(&result), vec![1]);
    }

    #[test]
    fn test_overlay_limit_enforced() {
        let mask = mask_of(2, &[0, 1]);
        let data = [1i64, 2];
        let overlay = NullOverlay::new(&mask);
        let overlays: Vec<&dyn StorageOverlay> =
            (0..MAX_OVERLAY_COUNT + 1).map(|_| &overlay as &dyn StorageOverlay).collect();
        let err = SimpleColumn::with_overlays(NumericStorage::Int64(&data), overlays).unwrap_err();
        assert!(matches!(err, TraceDBError::OverlayLimit { depth: 9, limit: 8 }));
    }

    #[test]
    fn test_bounded_empty_overlay_range() {
        // a span of all-null rows narrows to an empty storage range but
        // still flows through scan and lift
        let mask = mask_of(4, &[0, 3]);
        let data = [1i64, 2];
        let overlay = NullOverlay::new(&mask);
        let col = SimpleColumn::with_overlays(
            NumericStorage::Int64(&data),
            [&overlay as &dyn StorageOverlay],
        )
        .unwrap();

        let c = Constraint::new(0, FilterOp::Gt, Value::Int(0));
        let rm = RowMap::from_index_vector(vec![1, 2]);
        let result = bounded_column_filter(&c, &col, &rm);
        assert!(result.is_empty());
    }

    #[test]
    fn test_invariant_sizes_balance() {
        // |input| == |result| + removed, exercised across both overlay paths
        let (outer_mask, inner_mask, data) = two_level_setup();
        let outer = NullOverlay::new(&outer_mask);
        let inner = NullOverlay::new(&inner_mask);
        let col = SimpleColumn::with_overlays(
            NumericStorage::Int64(&data),
            [&outer as &dyn StorageOverlay, &inner as &dyn StorageOverlay],
        )
        .unwrap();

        for op in [FilterOp::IsNull, FilterOp::IsNotNull, FilterOp::Eq] {
            let value = if op == FilterOp::Eq { Value::Int(10) } else { Value::Null };
            let c = Constraint::new(0, op, value);
            let rm = RowMap::all(6);
            let result = indexed_column_filter(&c, &col, &rm);
            assert!(result.size() <= rm.size());
        }
    }
}
