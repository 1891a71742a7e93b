// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Row-oriented tabular stores addressed by spreadsheet id and A1 range.

pub mod google;
pub mod memory;
pub mod range;

use crate::error::SyncError;

pub use google::GoogleSheets;
pub use memory::MemorySheets;
pub use range::A1Range;

/// Values read from a range. `rows[0]` is sheet row `start_row`; trailing
/// empty rows and trailing empty cells are not returned.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RangeValues {
    pub start_row: u32,
    pub rows: Vec<Vec<String>>,
}

/// Each call is independent and non-transactional.
pub trait TabularStore {
    fn read_range(&self, spreadsheet_id: &str, range: &str) -> Result<RangeValues, SyncError>;

    /// Inserts `rows` after the last populated row of `range`.
    fn append_rows(
        &self,
        spreadsheet_id: &str,
        range: &str,
        rows: &[Vec<String>],
    ) -> Result<(), SyncError>;

    /// Writes literal cell values into `range`, starting at its top-left cell.
    fn write_range(
        &self,
        spreadsheet_id: &str,
        range: &str,
        rows: &[Vec<String>],
    ) -> Result<(), SyncError>;
}
