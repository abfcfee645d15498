//! # Two-line element sets
//!
//! Splitting a raw catalog dump into [`TlePair`]s. Two layouts are understood:
//!
//! - [`CatalogFormat::Tle`]: bare line pairs, as returned by the `tle` catalog format.
//!   Consecutive non-overlapping pairs are taken; a trailing unpaired line is dropped.
//! - [`CatalogFormat::ThreeLe`]: each pair preceded by a name line (`0 NAME`), as returned
//!   by the `3le` format. A trailing incomplete group is dropped.
//!
//! Lines are right-trimmed and whitespace-only lines are ignored before grouping. No
//! checksum or field validation happens here: the propagator rejects malformed pairs one
//! by one, so a single bad entry never fails the whole catalog.
use std::fmt;

use hifitime::Epoch;
use itertools::Itertools;
use serde::Deserialize;

use crate::constants::NoradId;
use crate::debris_errors::{DebrisError, SkipReason};
use crate::time::tle_epoch;

/// Layout of the catalog text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CatalogFormat {
    #[default]
    Tle,
    #[serde(rename = "3le")]
    ThreeLe,
}

impl CatalogFormat {
    /// Value of the `format` predicate in a catalog query.
    pub fn query_value(&self) -> &'static str {
        match self {
            CatalogFormat::Tle => "tle",
            CatalogFormat::ThreeLe => "3le",
        }
    }

    /// Parse `raw` according to this layout.
    pub fn parse(&self, raw: &str) -> Result<Vec<TlePair>, DebrisError> {
        match self {
            CatalogFormat::Tle => parse_catalog(raw),
            CatalogFormat::ThreeLe => parse_catalog_3le(raw),
        }
    }
}

impl fmt::Display for CatalogFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.query_value())
    }
}

/// One raw, unvalidated element set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TlePair {
    /// Catalog name, only known for the three-line layout.
    pub name: Option<String>,
    pub line1: String,
    pub line2: String,
}

impl TlePair {
    pub fn new(line1: impl Into<String>, line2: impl Into<String>) -> Self {
        TlePair {
            name: None,
            line1: line1.into(),
            line2: line2.into(),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        let name = name.into();
        self.name = (!name.trim().is_empty()).then(|| name.trim().to_string());
        self
    }

    /// NORAD catalog number, columns 3–7 of line 1.
    pub fn norad_id(&self) -> Result<NoradId, SkipReason> {
        let field = self
            .line1
            .get(2..7)
            .ok_or_else(|| SkipReason::MalformedElements("line 1 too short".into()))?;
        field.trim().parse().map_err(|_| {
            SkipReason::MalformedElements(format!("invalid catalog number {field:?}"))
        })
    }

    /// Epoch of the mean elements, columns 19–32 of line 1 (`YYDDD.DDDDDDDD`).
    ///
    /// Return
    /// ------
    /// * The element set epoch in UTC, or [`SkipReason::MalformedElements`] if the field
    ///   is missing or not numeric.
    pub fn epoch(&self) -> Result<Epoch, SkipReason> {
        let field = self
            .line1
            .get(18..32)
            .ok_or_else(|| SkipReason::MalformedElements("line 1 too short".into()))?;

        let malformed =
            || SkipReason::MalformedElements(format!("invalid epoch field {field:?}"));

        let (year, day) = field.trim().split_at_checked(2).ok_or_else(malformed)?;
        let year: u32 = year.parse().map_err(|_| malformed())?;
        let day: f64 = day.parse().map_err(|_| malformed())?;

        if !(1.0..367.0).contains(&day) {
            return Err(malformed());
        }
        Ok(tle_epoch(year, day))
    }
}

fn clean_lines(raw: &str) -> impl Iterator<Item = &str> {
    raw.lines()
        .map(str::trim_end)
        .filter(|line| !line.trim().is_empty())
}

/// Split a catalog dump of bare line pairs into [`TlePair`]s.
///
/// Pairs are `(line[2i], line[2i+1])`; a trailing unpaired line is silently discarded.
///
/// Return
/// ------
/// * The pairs in catalog order, or [`DebrisError::EmptyCatalog`] if not even one full
///   pair is present.
pub fn parse_catalog(raw: &str) -> Result<Vec<TlePair>, DebrisError> {
    let pairs: Vec<TlePair> = clean_lines(raw)
        .tuples()
        .map(|(line1, line2)| TlePair::new(line1, line2))
        .collect();

    if pairs.is_empty() {
        return Err(DebrisError::EmptyCatalog);
    }
    Ok(pairs)
}

/// Split a three-line catalog dump (name line + two element lines) into [`TlePair`]s.
///
/// The leading `"0 "` marker of the name line is removed when present.
pub fn parse_catalog_3le(raw: &str) -> Result<Vec<TlePair>, DebrisError> {
    let pairs: Vec<TlePair> = clean_lines(raw)
        .tuples()
        .map(|(name, line1, line2)| {
            let name = match name {
                "0" => "",
                name => name.strip_prefix("0 ").unwrap_or(name),
            };
            TlePair::new(line1, line2).with_name(name)
        })
        .collect();

    if pairs.is_empty() {
        return Err(DebrisError::EmptyCatalog);
    }
    Ok(pairs)
}
