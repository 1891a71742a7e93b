// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! A1 notation, e.g. `Transactions!A2:G`, `'My Sheet'!A1:C51`, `Children!A:A`.

use once_cell::sync::Lazy;
use regex::Regex;

static A1: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:'(?P<quoted>[^']+)'|(?P<bare>[^!']+))!(?P<c1>[A-Z]+)(?P<r1>\d*)(?::(?P<c2>[A-Z]+)(?P<r2>\d*))?$")
        .expect("A1 pattern is valid")
});

/// A rectangular range. Columns are 1-based; a missing row bound means the
/// range is open in that direction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct A1Range {
    pub sheet: String,
    pub start_col: u32,
    pub start_row: Option<u32>,
    pub end_col: u32,
    pub end_row: Option<u32>,
}

impl A1Range {
    pub fn parse(s: &str) -> Option<Self> {
        let caps = A1.captures(s.trim())?;
        let sheet = caps
            .name("quoted")
            .or_else(|| caps.name("bare"))?
            .as_str()
            .to_string();
        let start_col = column_index(&caps["c1"])?;
        let start_row = parse_row(caps.name("r1").map(|m| m.as_str()))?;
        let (end_col, end_row) = match caps.name("c2") {
            Some(c2) => (
                column_index(c2.as_str())?,
                parse_row(caps.name("r2").map(|m| m.as_str()))?,
            ),
            None => (start_col, start_row),
        };
        if end_col < start_col {
            return None;
        }
        if let (Some(a), Some(b)) = (start_row, end_row)
            && b < a
        {
            return None;
        }
        Some(Self {
            sheet,
            start_col,
            start_row,
            end_col,
            end_row,
        })
    }

    /// First sheet row covered by the range.
    pub fn first_row(&self) -> u32 {
        self.start_row.unwrap_or(1)
    }

    pub fn width(&self) -> usize {
        (self.end_col - self.start_col + 1) as usize
    }

    /// Number of rows when both bounds are known.
    pub fn height(&self) -> Option<usize> {
        self.end_row
            .map(|end| (end - self.first_row() + 1) as usize)
    }
}

// Empty means "no bound"; a present but zero row number is invalid.
fn parse_row(s: Option<&str>) -> Option<Option<u32>> {
    match s {
        None | Some("") => Some(None),
        Some(digits) => match digits.parse::<u32>() {
            Ok(0) | Err(_) => None,
            Ok(n) => Some(Some(n)),
        },
    }
}

/// `A` -> 1, `Z` -> 26, `AA` -> 27.
pub fn column_index(name: &str) -> Option<u32> {
    if name.is_empty() {
        return None;
    }
    let mut n: u32 = 0;
    for ch in name.chars() {
        if !ch.is_ascii_uppercase() {
            return None;
        }
        n = n.checked_mul(26)?.checked_add(ch as u32 - 'A' as u32 + 1)?;
    }
    Some(n)
}

/// 1 -> `A`, 26 -> `Z`, 27 -> `AA`.
pub fn column_name(mut index: u32) -> String {
    let mut out = Vec::new();
    while index > 0 {
        let rem = (index - 1) % 26;
        out.push((b'A' + rem as u8) as char);
        index = (index - 1) / 26;
    }
    out.iter().rev().collect()
}
