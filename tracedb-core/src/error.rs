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

//! Error types for TraceDB
//!
//! Filtering itself is infallible: by the time a predicate reaches the
//! executor its inputs have been validated or rerouted. Errors only arise
//! while constructing tables and column bindings.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum TraceDBError {
    #[error("invalid bit buffer: {0}")]
    InvalidBitBuffer(String),

    #[error("column {column}: expected {expected} rows, found {actual}")]
    ColumnLengthMismatch {
        column: String,
        expected: usize,
        actual: usize,
    },

    #[error("overlay stack depth {depth} exceeds limit {limit}")]
    OverlayLimit { depth: usize, limit: usize },

    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

pub type Result<T> = std::result::Result<T, TraceDBError>;
