// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! In-process spreadsheet with the same range semantics as Google Sheets:
//! reads trim trailing blanks, appends land after the last populated row of
//! the range's columns, and writes must fit inside the target range.
//!
//! Clones share the same workbook.

use std::cell::RefCell;
use std::collections::HashMap;
use std::ops::Range;
use std::rc::Rc;

use super::{A1Range, RangeValues, TabularStore};
use crate::error::SyncError;

#[derive(Debug, Clone)]
pub struct MemorySheets {
    inner: Rc<RefCell<Workbook>>,
}

#[derive(Debug, Default)]
struct Workbook {
    spreadsheet_id: String,
    tabs: HashMap<String, Vec<Vec<String>>>,
    offline: bool,
}

impl MemorySheets {
    pub fn new(spreadsheet_id: impl Into<String>) -> Self {
        Self {
            inner: Rc::new(RefCell::new(Workbook {
                spreadsheet_id: spreadsheet_id.into(),
                ..Workbook::default()
            })),
        }
    }

    pub fn with_tabs(spreadsheet_id: impl Into<String>, tabs: &[&str]) -> Self {
        let sheets = Self::new(spreadsheet_id);
        for tab in tabs {
            sheets.add_tab(tab);
        }
        sheets
    }

    pub fn add_tab(&self, name: &str) {
        self.inner
            .borrow_mut()
            .tabs
            .entry(name.to_string())
            .or_default();
    }

    /// While offline every call fails with `RemoteUnavailable`.
    pub fn set_offline(&self, offline: bool) {
        self.inner.borrow_mut().offline = offline;
    }

    /// Replaces the whole content of `tab`, creating it if needed.
    pub fn seed(&self, tab: &str, rows: Vec<Vec<String>>) {
        self.inner.borrow_mut().tabs.insert(tab.to_string(), rows);
    }

    /// Raw grid of `tab`, row 1 first. Empty when the tab does not exist.
    pub fn rows(&self, tab: &str) -> Vec<Vec<String>> {
        self.inner
            .borrow()
            .tabs
            .get(tab)
            .cloned()
            .unwrap_or_default()
    }
}

impl Workbook {
    fn open(
        &mut self,
        spreadsheet_id: &str,
        range: &str,
    ) -> Result<(A1Range, &mut Vec<Vec<String>>), SyncError> {
        if self.offline {
            return Err(SyncError::RemoteUnavailable("network unreachable".into()));
        }
        if spreadsheet_id != self.spreadsheet_id {
            return Err(SyncError::RemoteUnavailable(
                "Requested entity was not found.".into(),
            ));
        }
        let parsed = A1Range::parse(range)
            .ok_or_else(|| SyncError::RemoteUnavailable(format!("Unable to parse range: {range}")))?;
        let grid = self
            .tabs
            .get_mut(&parsed.sheet)
            .ok_or_else(|| SyncError::RemoteUnavailable(format!("Unable to parse range: {range}")))?;
        Ok((parsed, grid))
    }
}

fn columns(r: &A1Range) -> Range<usize> {
    (r.start_col - 1) as usize..r.end_col as usize
}

fn populated(row: &[String], cols: Range<usize>) -> bool {
    cols.into_iter()
        .any(|c| row.get(c).is_some_and(|v| !v.is_empty()))
}

fn put_row(grid: &mut Vec<Vec<String>>, row_idx: usize, col_offset: usize, values: &[String]) {
    if grid.len() <= row_idx {
        grid.resize_with(row_idx + 1, Vec::new);
    }
    let row = &mut grid[row_idx];
    if row.len() < col_offset + values.len() {
        row.resize(col_offset + values.len(), String::new());
    }
    for (i, v) in values.iter().enumerate() {
        row[col_offset + i] = v.clone();
    }
}

fn check_width(r: &A1Range, range: &str, rows: &[Vec<String>]) -> Result<(), SyncError> {
    if rows.iter().any(|row| row.len() > r.width()) {
        return Err(SyncError::RemoteUnavailable(format!(
            "Requested writing within range [{range}], but tried writing to more columns"
        )));
    }
    Ok(())
}

impl TabularStore for MemorySheets {
    fn read_range(&self, spreadsheet_id: &str, range: &str) -> Result<RangeValues, SyncError> {
        let mut wb = self.inner.borrow_mut();
        let (r, grid) = wb.open(spreadsheet_id, range)?;
        let first = r.first_row() as usize - 1;
        let last = r
            .end_row
            .map(|e| e as usize)
            .unwrap_or(grid.len())
            .min(grid.len());

        let mut rows = Vec::new();
        for src in grid.iter().take(last).skip(first) {
            let mut row: Vec<String> = columns(&r)
                .map(|c| src.get(c).cloned().unwrap_or_default())
                .collect();
            while row.last().is_some_and(|c| c.is_empty()) {
                row.pop();
            }
            rows.push(row);
        }
        while rows.last().is_some_and(|row| row.is_empty()) {
            rows.pop();
        }
        Ok(RangeValues {
            start_row: r.first_row(),
            rows,
        })
    }

    fn append_rows(
        &self,
        spreadsheet_id: &str,
        range: &str,
        rows: &[Vec<String>],
    ) -> Result<(), SyncError> {
        let mut wb = self.inner.borrow_mut();
        let (r, grid) = wb.open(spreadsheet_id, range)?;
        check_width(&r, range, rows)?;
        let first = r.first_row() as usize - 1;
        let at = grid
            .iter()
            .enumerate()
            .skip(first)
            .filter(|(_, row)| populated(row, columns(&r)))
            .map(|(i, _)| i + 1)
            .last()
            .unwrap_or(first);
        let offset = (r.start_col - 1) as usize;
        for (k, values) in rows.iter().enumerate() {
            put_row(grid, at + k, offset, values);
        }
        Ok(())
    }

    fn write_range(
        &self,
        spreadsheet_id: &str,
        range: &str,
        rows: &[Vec<String>],
    ) -> Result<(), SyncError> {
        let mut wb = self.inner.borrow_mut();
        let (r, grid) = wb.open(spreadsheet_id, range)?;
        check_width(&r, range, rows)?;
        if let Some(height) = r.height()
            && rows.len() > height
        {
            return Err(SyncError::RemoteUnavailable(format!(
                "Requested writing within range [{range}], but tried writing {} rows",
                rows.len()
            )));
        }
        let first = r.first_row() as usize - 1;
        let offset = (r.start_col - 1) as usize;
        for (k, values) in rows.iter().enumerate() {
            put_row(grid, first + k, offset, values);
        }
        Ok(())
    }
}
