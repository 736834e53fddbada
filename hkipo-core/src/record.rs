//! Typed IPO records built from the upstream's untyped rows.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::category::Milestone;

/// One upstream row (`rows[].cell`), as delivered.
pub type RawIpoRecord = serde_json::Map<String, Value>;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Market segment of a listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Market {
    MainBoard,
    GemBoard,
    Other(String),
}

impl Market {
    pub fn parse(value: &str) -> Self {
        let lower = value.to_lowercase();
        if value.contains("主板") || lower.contains("main") {
            Market::MainBoard
        } else if value.contains("创业板") || lower.contains("gem") || lower.contains("growth") {
            Market::GemBoard
        } else {
            Market::Other(value.to_string())
        }
    }
}

impl fmt::Display for Market {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Market::MainBoard => write!(f, "Main Board"),
            Market::GemBoard => write!(f, "GEM"),
            Market::Other(s) => write!(f, "{s}"),
        }
    }
}

/// One company's IPO snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IpoRecord {
    pub stock_code: String,
    pub name: String,
    pub market: Option<Market>,
    pub apply_start: Option<NaiveDate>,
    pub apply_end: Option<NaiveDate>,
    pub listing: Option<NaiveDate>,
    pub price_range: Option<String>,
    pub issue_price: Option<String>,
    /// In hundreds of millions of shares, as published
    pub total_shares: Option<String>,
    pub underwriter: Option<String>,
    pub ref_company: Option<String>,
    pub green_shoe: Option<String>,
}

impl IpoRecord {
    /// Normalize an upstream row. Never fails: unknown keys are ignored and
    /// missing, empty, `"-"` or unparseable values become `None`.
    pub fn from_raw(raw: &RawIpoRecord) -> Self {
        let name = text(raw, "stock_nm").unwrap_or_else(|| "Unknown Company".to_string());

        IpoRecord {
            stock_code: text(raw, "stock_cd").unwrap_or_default(),
            market: text(raw, "market").map(|m| Market::parse(&m)),
            apply_start: date(raw, "apply_dt2", &name),
            apply_end: date(raw, "apply_end_dt2", &name),
            listing: date(raw, "list_dt2", &name),
            price_range: text(raw, "price_range"),
            issue_price: text(raw, "issue_price"),
            total_shares: text(raw, "total_shares"),
            underwriter: text(raw, "underwriter"),
            ref_company: text(raw, "ref_company"),
            green_shoe: text(raw, "green_rt"),
            name,
        }
    }

    /// Every present date, tagged with the field it came from.
    pub fn milestones(&self) -> Vec<(Milestone, NaiveDate)> {
        [
            (Milestone::ApplyStart, self.apply_start),
            (Milestone::ApplyEnd, self.apply_end),
            (Milestone::Listing, self.listing),
        ]
        .into_iter()
        .filter_map(|(milestone, date)| date.map(|d| (milestone, d)))
        .collect()
    }

    pub fn has_dates(&self) -> bool {
        self.apply_start.is_some() || self.apply_end.is_some() || self.listing.is_some()
    }
}

impl fmt::Display for IpoRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.stock_code)?;
        if let Some(market) = &self.market {
            write!(f, " [{market}]")?;
        }
        Ok(())
    }
}

/// Normalize a batch of rows, logging the ones that carry no dates at all.
pub fn normalize(raw: &[RawIpoRecord]) -> Vec<IpoRecord> {
    raw.iter()
        .map(IpoRecord::from_raw)
        .inspect(|record| {
            if !record.has_dates() {
                log::info!("{record} has no application or listing dates, skipping");
            }
        })
        .collect()
}

fn text(raw: &RawIpoRecord, key: &str) -> Option<String> {
    let value = match raw.get(key)? {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => return None,
    };

    if value.is_empty() || value == "-" {
        None
    } else {
        Some(value)
    }
}

fn date(raw: &RawIpoRecord, key: &str, name: &str) -> Option<NaiveDate> {
    let value = text(raw, key)?;
    match NaiveDate::parse_from_str(&value, DATE_FORMAT) {
        Ok(d) => Some(d),
        Err(_) => {
            log::warn!("Invalid date format for {name}: {key}={value}");
            None
        }
    }
}
