// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Grid configuration: rows, columns, and paging orientation.

use core::num::NonZeroUsize;

/// Errors raised when a grid configuration is constructed or replaced.
///
/// These are the only hard failures the crate reports. Navigation requests
/// that cannot be honored are ignored instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// The grid must have at least one row.
    #[error("a paged grid needs at least one row")]
    ZeroRows,
    /// The grid must have at least one column.
    #[error("a paged grid needs at least one column")]
    ZeroColumns,
    /// `rows * columns` does not fit in `usize`.
    #[error("page capacity {rows} x {columns} overflows")]
    CapacityOverflow {
        /// Requested row count.
        rows: usize,
        /// Requested column count.
        columns: usize,
    },
    /// An orientation code other than `0` (horizontal) or `1` (vertical).
    #[error("unknown orientation code {0}; expected 0 (horizontal) or 1 (vertical)")]
    InvalidOrientation(u8),
}

/// The single axis along which pages follow each other.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Orientation {
    /// Pages are laid out left to right; only the x offset scrolls.
    #[default]
    Horizontal,
    /// Pages are stacked top to bottom; only the y offset scrolls.
    Vertical,
}

impl Orientation {
    /// Returns the other orientation.
    #[must_use]
    pub const fn flipped(self) -> Self {
        match self {
            Self::Horizontal => Self::Vertical,
            Self::Vertical => Self::Horizontal,
        }
    }

    /// Returns the axis set that scrolls under this orientation.
    #[must_use]
    pub const fn axes(self) -> ScrollAxes {
        match self {
            Self::Horizontal => ScrollAxes::HORIZONTAL,
            Self::Vertical => ScrollAxes::VERTICAL,
        }
    }
}

impl TryFrom<u8> for Orientation {
    type Error = ConfigError;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(Self::Horizontal),
            1 => Ok(Self::Vertical),
            other => Err(ConfigError::InvalidOrientation(other)),
        }
    }
}

bitflags::bitflags! {
    /// Axes along which a layout can scroll.
    ///
    /// A paged grid always reports exactly one axis, but snap logic is written
    /// against the general set so that mixed or fixed layouts can be handled.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct ScrollAxes: u8 {
        /// Scrolls along x.
        const HORIZONTAL = 0b0000_0001;
        /// Scrolls along y.
        const VERTICAL   = 0b0000_0010;
    }
}

/// Rows, columns, and orientation of a paged grid.
///
/// Each page holds `rows * columns` items, filled row by row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GridConfig {
    rows: NonZeroUsize,
    columns: NonZeroUsize,
    orientation: Orientation,
    page_capacity: NonZeroUsize,
}

impl GridConfig {
    /// Validates and builds a configuration.
    ///
    /// Fails when either dimension is zero or their product overflows.
    pub fn new(rows: usize, columns: usize, orientation: Orientation) -> Result<Self, ConfigError> {
        let rows = NonZeroUsize::new(rows).ok_or(ConfigError::ZeroRows)?;
        let columns = NonZeroUsize::new(columns).ok_or(ConfigError::ZeroColumns)?;
        let page_capacity = rows
            .checked_mul(columns)
            .ok_or(ConfigError::CapacityOverflow {
                rows: rows.get(),
                columns: columns.get(),
            })?;
        Ok(Self {
            rows,
            columns,
            orientation,
            page_capacity,
        })
    }

    /// Number of rows per page.
    #[must_use]
    pub const fn rows(&self) -> usize {
        self.rows.get()
    }

    /// Number of columns per page.
    #[must_use]
    pub const fn columns(&self) -> usize {
        self.columns.get()
    }

    /// Paging orientation.
    #[must_use]
    pub const fn orientation(&self) -> Orientation {
        self.orientation
    }

    /// Items per page (`rows * columns`).
    #[must_use]
    pub const fn page_capacity(&self) -> usize {
        self.page_capacity.get()
    }

    /// Returns a copy with a different orientation.
    #[must_use]
    pub const fn with_orientation(mut self, orientation: Orientation) -> Self {
        self.orientation = orientation;
        self
    }
}
