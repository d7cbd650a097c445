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

//! Predicate Vocabulary
//!
//! Typed constraint values, the filter operators, and the comparison rules
//! shared by every evaluation path. Comparisons are strict about type: a
//! value only ever matches a cell of the same variant, and doubles follow
//! IEEE semantics (`NaN` never compares equal, less, or greater).

use serde::{Deserialize, Serialize};

/// A typed constraint or cell value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    Null,
    Int(i64),
    UInt(u64),
    Double(f64),
    String(String),
}

impl Value {
    /// True for the typed null
    #[inline]
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }
}

/// Filter comparison operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FilterOp {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    IsNull,
    IsNotNull,
}

impl FilterOp {
    /// True for the six value-comparison operators
    pub fn is_comparison(&self) -> bool {
        !matches!(self, FilterOp::IsNull | FilterOp::IsNotNull)
    }

    /// Apply a comparison operator to two values of the same type.
    ///
    /// `IsNull`/`IsNotNull` always return false here; null handling is the
    /// caller's concern.
    #[inline]
    pub fn compare<T: PartialOrd + ?Sized>(&self, lhs: &T, rhs: &T) -> bool {
        match self {
            FilterOp::Eq => lhs == rhs,
            FilterOp::Ne => lhs != rhs,
            FilterOp::Lt => lhs < rhs,
            FilterOp::Le => lhs <= rhs,
            FilterOp::Gt => lhs > rhs,
            FilterOp::Ge => lhs >= rhs,
            FilterOp::IsNull | FilterOp::IsNotNull => false,
        }
    }

    /// Compare two typed values. Mismatched variants never match.
    pub fn compare_values(&self, lhs: &Value, rhs: &Value) -> bool {
        match (lhs, rhs) {
            (Value::Int(a), Value::Int(b)) => self.compare(a, b),
            (Value::UInt(a), Value::UInt(b)) => self.compare(a, b),
            (Value::Double(a), Value::Double(b)) => self.compare(a, b),
            (Value::String(a), Value::String(b)) => self.compare(a.as_str(), b.as_str()),
            _ => false,
        }
    }
}

/// A single predicate: `column op value`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Constraint {
    /// Index of the column in its table
    pub col: usize,
    pub op: FilterOp,
    pub value: Value,
}

impl Constraint {
    pub fn new(col: usize, op: FilterOp, value: Value) -> Self {
        Self { col, op, value }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compare_ints() {
        assert!(FilterOp::Lt.compare_values(&Value::Int(3), &Value::Int(5)));
        assert!(FilterOp::Ge.compare_values(&Value::Int(5), &Value::Int(5)));
        assert!(!FilterOp::Eq.compare_values(&Value::Int(3), &Value::Int(5)));
        assert!(FilterOp::Ne.compare_values(&Value::Int(3), &Value::Int(5)));
    }

    #[test]
    fn test_compare_type_mismatch() {
        assert!(!FilterOp::Eq.compare_values(&Value::Int(3), &Value::UInt(3)));
        assert!(!FilterOp::Eq.compare_values(&Value::Int(3), &Value::Double(3.0)));
        assert!(!FilterOp::Eq.compare_values(&Value::Null, &Value::Null));
    }

    #[test]
    fn test_compare_nan() {
        let nan = Value::Double(f64::NAN);
        assert!(!FilterOp::Eq.compare_values(&nan, &nan));
        assert!(!FilterOp::Lt.compare_values(&nan, &Value::Double(1.0)));
        assert!(!FilterOp::Ge.compare_values(&nan, &Value::Double(1.0)));
        assert!(FilterOp::Ne.compare_values(&nan, &Value::Double(1.0)));
    }

    #[test]
    fn test_compare_strings() {
        let a = Value::String("alpha".into());
        let b = Value::String("beta".into());
        assert!(FilterOp::Lt.compare_values(&a, &b));
        assert!(!FilterOp::Eq.compare_values(&a, &b));
    }

    #[test]
    fn test_null_ops_never_compare() {
        assert!(!FilterOp::IsNull.compare_values(&Value::Int(1), &Value::Int(1)));
        assert!(!FilterOp::IsNotNull.compare_values(&Value::Int(1), &Value::Int(1)));
    }
}
