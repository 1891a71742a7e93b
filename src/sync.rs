// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Mirrors the ledger collections into three named ranges of a tabular store,
//! joined on the record id in column A.
//!
//! Row addressing is 1-based and counts the header: with a header in row 1,
//! the n-th data row (0-based) lives at sheet row n + 2. Deletes blank a row
//! in place instead of removing it, so rows located by an earlier scan keep
//! their position.

use rust_decimal::Decimal;
use tracing::{debug, warn};

use crate::error::SyncError;
use crate::models::{Child, Investment, Transaction};
use crate::sheets::TabularStore;
use crate::sheets::range::column_name;

/// Data rows written by a full children replace; shorter lists are padded
/// with blank rows so a previously longer list leaves nothing behind.
pub const CHILD_CAPACITY: usize = 50;

/// A record kind with a fixed column layout in its own sheet.
pub trait SheetRecord: Sized {
    const SHEET: &'static str;
    /// Header names in column order. The first is the id column.
    const COLUMNS: &'static [&'static str];

    fn id(&self) -> &str;
    fn to_row(&self) -> Vec<String>;
    /// `None` when the row cannot be read as this kind.
    fn from_row(row: &[String]) -> Option<Self>;
}

/// Kinds patched row-by-row through an id scan.
pub trait RowSynced: SheetRecord {}

impl RowSynced for Transaction {}
impl RowSynced for Investment {}

fn cell(row: &[String], i: usize) -> &str {
    row.get(i).map(String::as_str).unwrap_or("")
}

fn text(row: &[String], i: usize) -> String {
    cell(row, i).to_string()
}

// Formatted sheet values may carry thousands separators.
fn number(row: &[String], i: usize) -> Decimal {
    let raw = cell(row, i).trim().replace(',', "");
    if raw.is_empty() {
        return Decimal::ZERO;
    }
    raw.parse::<Decimal>().unwrap_or_else(|_| {
        warn!(value = %raw, "non-numeric cell read as zero");
        Decimal::ZERO
    })
}

fn num_text(d: &Decimal) -> String {
    d.normalize().to_string()
}

impl SheetRecord for Child {
    const SHEET: &'static str = "Children";
    const COLUMNS: &'static [&'static str] = &["ID", "Name", "Avatar"];

    fn id(&self) -> &str {
        &self.id
    }

    fn to_row(&self) -> Vec<String> {
        vec![self.id.clone(), self.name.clone(), self.avatar.clone()]
    }

    fn from_row(row: &[String]) -> Option<Self> {
        if cell(row, 1).trim().is_empty() {
            return None;
        }
        Some(Child {
            id: text(row, 0),
            name: text(row, 1),
            avatar: text(row, 2),
        })
    }
}

impl SheetRecord for Transaction {
    const SHEET: &'static str = "Transactions";
    const COLUMNS: &'static [&'static str] = &[
        "ID",
        "ChildID",
        "Date",
        "Type",
        "Category",
        "Amount",
        "Description",
    ];

    fn id(&self) -> &str {
        &self.id
    }

    fn to_row(&self) -> Vec<String> {
        vec![
            self.id.clone(),
            self.child_id.clone(),
            self.date.clone(),
            self.r#type.to_string(),
            self.category.clone(),
            num_text(&self.amount),
            self.description.clone(),
        ]
    }

    fn from_row(row: &[String]) -> Option<Self> {
        let r#type = cell(row, 3).parse().ok()?;
        Some(Transaction {
            id: text(row, 0),
            child_id: text(row, 1),
            date: text(row, 2),
            r#type,
            category: text(row, 4),
            amount: number(row, 5),
            description: text(row, 6),
        })
    }
}

impl SheetRecord for Investment {
    const SHEET: &'static str = "Investments";
    const COLUMNS: &'static [&'static str] = &[
        "ID",
        "ChildID",
        "Date",
        "Symbol",
        "CompanyName",
        "Quantity",
        "Price",
        "TotalAmount",
        "Action",
    ];

    fn id(&self) -> &str {
        &self.id
    }

    fn to_row(&self) -> Vec<String> {
        vec![
            self.id.clone(),
            self.child_id.clone(),
            self.date.clone(),
            self.symbol.clone(),
            self.company_name.clone(),
            num_text(&self.quantity),
            num_text(&self.price),
            num_text(&self.total_amount),
            self.action.to_string(),
        ]
    }

    fn from_row(row: &[String]) -> Option<Self> {
        let action = cell(row, 8).parse().ok()?;
        Some(Investment {
            id: text(row, 0),
            child_id: text(row, 1),
            date: text(row, 2),
            symbol: text(row, 3),
            company_name: text(row, 4),
            quantity: number(row, 5),
            price: number(row, 6),
            total_amount: number(row, 7),
            action,
        })
    }
}

fn last_column<K: SheetRecord>() -> String {
    column_name(K::COLUMNS.len() as u32)
}

/// `Sheet!A:<last>`
fn full_range<K: SheetRecord>() -> String {
    format!("{}!A:{}", K::SHEET, last_column::<K>())
}

/// `Sheet!A<row>:<last><row>`
fn row_range<K: SheetRecord>(row: u32) -> String {
    let last = last_column::<K>();
    format!("{}!A{row}:{last}{row}", K::SHEET)
}

pub struct SyncClient<T> {
    store: T,
    spreadsheet_id: Option<String>,
}

impl<T: TabularStore> SyncClient<T> {
    /// A blank `spreadsheet_id` leaves the client misconfigured: every
    /// operation then fails with [`SyncError::MisconfiguredStore`].
    pub fn new(store: T, spreadsheet_id: impl Into<String>) -> Self {
        let id = spreadsheet_id.into().trim().to_string();
        Self {
            store,
            spreadsheet_id: (!id.is_empty()).then_some(id),
        }
    }

    pub fn spreadsheet_id(&self) -> Option<&str> {
        self.spreadsheet_id.as_deref()
    }

    fn sheet(&self) -> Result<&str, SyncError> {
        self.spreadsheet_id
            .as_deref()
            .ok_or(SyncError::MisconfiguredStore)
    }

    /// Reads every populated row of `K`'s sheet. A first row whose first
    /// cell is the id header (any case) is skipped; rows without an id are
    /// dropped.
    pub fn list<K: SheetRecord>(&self) -> Result<Vec<K>, SyncError> {
        let values = self.store.read_range(self.sheet()?, &full_range::<K>())?;
        let mut rows = values.rows.as_slice();
        if let Some(first) = rows.first()
            && cell(first, 0).trim().eq_ignore_ascii_case(K::COLUMNS[0])
        {
            rows = &rows[1..];
        }

        let mut out = Vec::with_capacity(rows.len());
        for row in rows {
            if cell(row, 0).trim().is_empty() {
                continue;
            }
            match K::from_row(row) {
                Some(record) => out.push(record),
                None => warn!(
                    sheet = K::SHEET,
                    id = cell(row, 0),
                    "skipping row with an unrecognised type or action"
                ),
            }
        }
        Ok(out)
    }

    /// Adds `record` after the last populated row. The caller guarantees the
    /// id is not already present remotely.
    pub fn append<K: SheetRecord>(&self, record: &K) -> Result<(), SyncError> {
        self.store
            .append_rows(self.sheet()?, &full_range::<K>(), &[record.to_row()])
    }

    /// Rewrites the whole children range: header, one row per child, then
    /// blank rows up to [`CHILD_CAPACITY`].
    pub fn replace_children(&self, children: &[Child]) -> Result<(), SyncError> {
        let spreadsheet_id = self.sheet()?;
        if children.len() > CHILD_CAPACITY {
            return Err(SyncError::CapacityExceeded {
                capacity: CHILD_CAPACITY,
                len: children.len(),
            });
        }
        let width = Child::COLUMNS.len();
        let mut values: Vec<Vec<String>> = Vec::with_capacity(CHILD_CAPACITY + 1);
        values.push(Child::COLUMNS.iter().map(|h| h.to_string()).collect());
        values.extend(children.iter().map(Child::to_row));
        values.resize(CHILD_CAPACITY + 1, vec![String::new(); width]);

        let range = format!(
            "{}!A1:{}{}",
            Child::SHEET,
            last_column::<Child>(),
            CHILD_CAPACITY + 1
        );
        self.store.write_range(spreadsheet_id, &range, &values)
    }

    /// Sheet row (1-based) holding `id`, found by scanning column A top to
    /// bottom.
    pub fn find_row<K: RowSynced>(&self, id: &str) -> Result<Option<u32>, SyncError> {
        let spreadsheet_id = self.sheet()?;
        if id.is_empty() {
            return Ok(None);
        }
        let values = self
            .store
            .read_range(spreadsheet_id, &format!("{}!A:A", K::SHEET))?;
        Ok(values
            .rows
            .iter()
            .position(|row| cell(row, 0) == id)
            .map(|p| values.start_row + p as u32))
    }

    /// Overwrites the row holding `record.id()`. A missing row is not an
    /// error: the remote side may not have caught up with the append yet.
    pub fn update<K: RowSynced>(&self, record: &K) -> Result<(), SyncError> {
        match self.find_row::<K>(record.id())? {
            Some(row) => self.store.write_range(
                self.sheet()?,
                &row_range::<K>(row),
                &[record.to_row()],
            ),
            None => {
                debug!(sheet = K::SHEET, id = record.id(), "update skipped, row not found");
                Ok(())
            }
        }
    }

    /// Blanks every cell of the row holding `id`; other rows keep their
    /// position. A missing row is not an error.
    pub fn remove<K: RowSynced>(&self, id: &str) -> Result<(), SyncError> {
        match self.find_row::<K>(id)? {
            Some(row) => self.store.write_range(
                self.sheet()?,
                &row_range::<K>(row),
                &[vec![String::new(); K::COLUMNS.len()]],
            ),
            None => {
                debug!(sheet = K::SHEET, id, "remove skipped, row not found");
                Ok(())
            }
        }
    }
}
