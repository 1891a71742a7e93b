// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Google Sheets v4 `spreadsheets.values` client.

use anyhow::Result;
use reqwest::Url;
use reqwest::blocking::{Client, RequestBuilder};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use super::{A1Range, RangeValues, TabularStore};
use crate::error::SyncError;
use crate::utils::http_client;

const SHEETS_API: &str = "https://sheets.googleapis.com/v4/spreadsheets";

pub struct GoogleSheets {
    client: Client,
    access_token: String,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct ValueRange {
    range: Option<String>,
    #[serde(default)]
    values: Vec<Vec<Value>>,
}

#[derive(Debug, Serialize)]
struct ValuesBody<'a> {
    values: &'a [Vec<String>],
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    message: String,
}

impl GoogleSheets {
    pub fn new(access_token: impl Into<String>) -> Result<Self> {
        Ok(Self {
            client: http_client()?,
            access_token: access_token.into(),
            base_url: SHEETS_API.to_string(),
        })
    }

    /// `{base}/{spreadsheet_id}/values/{range}{suffix}?valueInputOption=...`
    fn values_url(
        &self,
        spreadsheet_id: &str,
        range: &str,
        suffix: &str,
        user_entered: bool,
    ) -> Result<Url, SyncError> {
        let mut url = Url::parse(&self.base_url)
            .map_err(|e| SyncError::RemoteUnavailable(format!("invalid API url: {e}")))?;
        url.path_segments_mut()
            .map_err(|_| SyncError::RemoteUnavailable("invalid API url".into()))?
            .pop_if_empty()
            .push(spreadsheet_id)
            .push("values")
            .push(&format!("{range}{suffix}"));
        if user_entered {
            url.query_pairs_mut()
                .append_pair("valueInputOption", "USER_ENTERED");
        }
        Ok(url)
    }

    fn send(&self, req: RequestBuilder) -> Result<reqwest::blocking::Response, SyncError> {
        let resp = req
            .bearer_auth(&self.access_token)
            .send()
            .map_err(|e| SyncError::RemoteUnavailable(e.to_string()))?;
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }
        let message = resp
            .json::<ApiErrorBody>()
            .map(|b| b.error.message)
            .unwrap_or_else(|_| format!("Google Sheets API error ({status})"));
        Err(SyncError::RemoteUnavailable(message))
    }
}

fn cell_text(v: Value) -> String {
    match v {
        Value::String(s) => s,
        Value::Null => String::new(),
        Value::Bool(b) => (if b { "TRUE" } else { "FALSE" }).to_string(),
        other => other.to_string(),
    }
}

impl TabularStore for GoogleSheets {
    fn read_range(&self, spreadsheet_id: &str, range: &str) -> Result<RangeValues, SyncError> {
        debug!(range, "sheets: read");
        let url = self.values_url(spreadsheet_id, range, "", false)?;
        let body: ValueRange = self
            .send(self.client.get(url))?
            .json()
            .map_err(|e| SyncError::RemoteUnavailable(e.to_string()))?;
        // The echoed range tells us which sheet row values[0] belongs to.
        let start_row = body
            .range
            .as_deref()
            .and_then(A1Range::parse)
            .or_else(|| A1Range::parse(range))
            .map(|r| r.first_row())
            .unwrap_or(1);
        let rows = body
            .values
            .into_iter()
            .map(|row| row.into_iter().map(cell_text).collect())
            .collect();
        Ok(RangeValues { start_row, rows })
    }

    fn append_rows(
        &self,
        spreadsheet_id: &str,
        range: &str,
        rows: &[Vec<String>],
    ) -> Result<(), SyncError> {
        debug!(range, rows = rows.len(), "sheets: append");
        let url = self.values_url(spreadsheet_id, range, ":append", true)?;
        self.send(self.client.post(url).json(&ValuesBody { values: rows }))?;
        Ok(())
    }

    fn write_range(
        &self,
        spreadsheet_id: &str,
        range: &str,
        rows: &[Vec<String>],
    ) -> Result<(), SyncError> {
        debug!(range, rows = rows.len(), "sheets: write");
        let url = self.values_url(spreadsheet_id, range, "", true)?;
        self.send(self.client.put(url).json(&ValuesBody { values: rows }))?;
        Ok(())
    }
}
