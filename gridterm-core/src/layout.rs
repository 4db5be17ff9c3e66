//! Grid layout registry
//!
//! A fixed catalogue of grid layouts. Each layout is identified by a
//! [`LayoutId`] and describes its label, its grid geometry and the number of
//! panes it holds. The catalogue is static; lookups never mutate anything.
//!
//! # Example
//!
//! ```
//! use gridterm_core::layout::{self, LayoutId};
//!
//! let grid = layout::layout(LayoutId::Grid2x2);
//! assert_eq!(grid.pane_count, 4);
//! assert_eq!(grid.label, "2×2 Grid");
//!
//! let solo = layout::get_layout("solo").unwrap();
//! assert_eq!(solo.pane_count, 1);
//! assert!(layout::get_layout("grid-5x5").is_err());
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised by layout lookups.
///
/// Layout ids come from the same enumeration everywhere, so a failed lookup
/// indicates a caller bug rather than a user error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LayoutError {
    /// The requested layout id is not part of the catalogue.
    #[error("layout not found: {0}")]
    NotFound(String),
}

/// Result type for layout lookups
pub type LayoutResult<T> = Result<T, LayoutError>;

/// Identifier of a layout in the catalogue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum LayoutId {
    /// One pane filling the grid
    #[serde(rename = "solo")]
    Solo,
    /// Two panes next to each other
    #[default]
    #[serde(rename = "side-by-side")]
    SideBySide,
    /// Two panes on top of each other
    #[serde(rename = "stacked")]
    Stacked,
    /// Three columns
    #[serde(rename = "cols-3")]
    Cols3,
    /// Two by two grid
    #[serde(rename = "grid-2x2")]
    Grid2x2,
    /// Three by three grid
    #[serde(rename = "grid-3x3")]
    Grid3x3,
    /// Four by four grid
    #[serde(rename = "grid-4x4")]
    Grid4x4,
}

impl LayoutId {
    /// Every layout id in canonical declaration order.
    pub const ALL: [Self; 7] = [
        Self::Solo,
        Self::SideBySide,
        Self::Stacked,
        Self::Cols3,
        Self::Grid2x2,
        Self::Grid3x3,
        Self::Grid4x4,
    ];

    /// Returns the stable string form of this id.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Solo => "solo",
            Self::SideBySide => "side-by-side",
            Self::Stacked => "stacked",
            Self::Cols3 => "cols-3",
            Self::Grid2x2 => "grid-2x2",
            Self::Grid3x3 => "grid-3x3",
            Self::Grid4x4 => "grid-4x4",
        }
    }
}

impl fmt::Display for LayoutId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LayoutId {
    type Err = LayoutError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|id| id.as_str() == s)
            .ok_or_else(|| LayoutError::NotFound(s.to_string()))
    }
}

/// Column/row shape of a layout.
///
/// Panes fill the grid row by row, so pane `i` sits at column
/// `i % columns` and row `i / columns`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GridGeometry {
    /// Number of equally sized columns
    pub columns: u16,
    /// Number of equally sized rows
    pub rows: u16,
}

impl GridGeometry {
    /// Creates a geometry with the given number of columns and rows.
    #[must_use]
    pub const fn new(columns: u16, rows: u16) -> Self {
        Self { columns, rows }
    }

    /// Number of cells in the grid.
    #[must_use]
    pub const fn cell_count(self) -> usize {
        self.columns as usize * self.rows as usize
    }

    /// Returns the `(column, row)` cell occupied by pane `index`.
    ///
    /// Returns `None` when the index lies outside the grid.
    #[must_use]
    pub const fn cell_of(self, index: usize) -> Option<(u16, u16)> {
        if self.columns == 0 || index >= self.cell_count() {
            return None;
        }
        let columns = self.columns as usize;
        Some(((index % columns) as u16, (index / columns) as u16))
    }
}

impl fmt::Display for GridGeometry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.columns, self.rows)
    }
}

/// A layout definition from the catalogue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayoutDef {
    /// Layout identifier
    pub id: LayoutId,
    /// Human-readable label for selector UIs
    pub label: &'static str,
    /// Grid shape
    pub geometry: GridGeometry,
    /// Number of panes, always `columns * rows`
    pub pane_count: usize,
}

impl LayoutDef {
    const fn new(id: LayoutId, label: &'static str, columns: u16, rows: u16) -> Self {
        let geometry = GridGeometry::new(columns, rows);
        Self {
            id,
            label,
            geometry,
            pane_count: geometry.cell_count(),
        }
    }
}

/// The layout catalogue in canonical declaration order.
pub const LAYOUTS: &[LayoutDef] = &[
    LayoutDef::new(LayoutId::Solo, "Solo", 1, 1),
    LayoutDef::new(LayoutId::SideBySide, "Side by Side", 2, 1),
    LayoutDef::new(LayoutId::Stacked, "Stacked", 1, 2),
    LayoutDef::new(LayoutId::Cols3, "3 Columns", 3, 1),
    LayoutDef::new(LayoutId::Grid2x2, "2×2 Grid", 2, 2),
    LayoutDef::new(LayoutId::Grid3x3, "3×3 Grid", 3, 3),
    LayoutDef::new(LayoutId::Grid4x4, "4×4 Grid", 4, 4),
];

/// Returns every layout in canonical declaration order.
#[must_use]
pub fn all_layouts() -> &'static [LayoutDef] {
    LAYOUTS
}

/// Largest pane count of any layout in the catalogue.
#[must_use]
pub fn max_pane_count() -> usize {
    LAYOUTS.iter().map(|def| def.pane_count).max().unwrap_or(0)
}

/// Returns the definition for a layout id.
#[must_use]
pub fn layout(id: LayoutId) -> &'static LayoutDef {
    // LAYOUTS is declared in the same order as LayoutId::ALL
    &LAYOUTS[id as usize]
}

/// Looks up a layout by its string id.
///
/// # Errors
///
/// Returns `LayoutError::NotFound` if the id is not in the catalogue.
pub fn get_layout(id: &str) -> LayoutResult<&'static LayoutDef> {
    id.parse::<LayoutId>().map(layout)
}
