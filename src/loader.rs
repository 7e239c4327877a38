//! CSV loaders for barriers, stops, and route membership.
//!
//! Malformed rows are skipped and counted, never fatal. A table that cannot
//! be read at all, or that lacks a required column, is an error.

use anyhow::{Context, Result, anyhow, bail};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::collections::{BTreeSet, HashMap};
use tracing::{info, warn};

use crate::types::{Barrier, Stop};

/// Row counts for one loaded table.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct LoadReport {
    pub accepted: usize,
    pub skipped: usize,
}

/// Records accepted from one table plus how many rows were dropped.
#[derive(Debug)]
pub struct Loaded<T> {
    pub records: Vec<T>,
    pub report: LoadReport,
}

/// Stop id -> sorted, duplicate-free route codes.
pub type RouteMap = HashMap<String, BTreeSet<String>>;

#[derive(Debug, Deserialize)]
struct BarrierRow {
    #[serde(rename = "geometry/coordinates/0")]
    lon: String,
    #[serde(rename = "geometry/coordinates/1")]
    lat: String,
    #[serde(rename = "properties/is_temporary")]
    is_temporary: String,
    #[serde(rename = "properties/severity")]
    severity: String,
    #[serde(rename = "properties/label_type")]
    label_type: String,
    #[serde(rename = "properties/neighborhood")]
    neighborhood: String,
    #[serde(rename = "properties/attribute_id")]
    attribute_id: String,
}

const BARRIER_COLUMNS: &[&str] = &[
    "geometry/coordinates/0",
    "geometry/coordinates/1",
    "properties/is_temporary",
    "properties/severity",
    "properties/label_type",
    "properties/neighborhood",
    "properties/attribute_id",
];

#[derive(Debug, Deserialize)]
struct StopRow {
    #[serde(rename = "STOP_ID")]
    stop_id: String,
    lat: String,
    lon: String,
    #[serde(rename = "HASTUS_CROSS_STREET_NAME")]
    name: String,
}

const STOP_COLUMNS: &[&str] = &["STOP_ID", "lat", "lon", "HASTUS_CROSS_STREET_NAME"];

#[derive(Debug, Deserialize)]
struct RouteRow {
    #[serde(rename = "STOP_ID")]
    stop_id: String,
    #[serde(rename = "ROUTE_NUM")]
    route_num: String,
}

const ROUTE_COLUMNS: &[&str] = &["STOP_ID", "ROUTE_NUM"];

fn parse_coord(value: &str, field: &str) -> Result<f64> {
    let parsed: f64 = value
        .trim()
        .parse()
        .with_context(|| format!("{field} {value:?} is not a number"))?;
    if !parsed.is_finite() {
        bail!("{field} {value:?} is not finite");
    }
    Ok(parsed)
}

fn parse_severity(value: &str) -> Result<Option<u8>> {
    let value = value.trim();
    if value.is_empty() {
        return Ok(None);
    }
    let level = value
        .parse()
        .with_context(|| format!("severity {value:?} is not an integer"))?;
    Ok(Some(level))
}

/// Ids are compared verbatim; only an empty value is rejected.
fn require_id(value: &str, field: &str) -> Result<String> {
    if value.is_empty() {
        return Err(anyhow!("{field} is empty"));
    }
    Ok(value.to_string())
}

impl TryFrom<BarrierRow> for Barrier {
    type Error = anyhow::Error;

    fn try_from(row: BarrierRow) -> Result<Self> {
        let neighborhood = Some(row.neighborhood).filter(|n| !n.is_empty());
        Ok(Barrier {
            id: require_id(&row.attribute_id, "attribute_id")?,
            lon: parse_coord(&row.lon, "longitude")?,
            lat: parse_coord(&row.lat, "latitude")?,
            severity: parse_severity(&row.severity)?,
            label_type: row.label_type,
            is_temporary: row.is_temporary == "true",
            neighborhood,
        })
    }
}

/// Deserializes every row of `bytes` as `R`, converting with `convert`.
fn read_rows<R, T>(
    bytes: &[u8],
    table: &str,
    required: &[&str],
    mut convert: impl FnMut(R) -> Result<T>,
) -> Result<Loaded<T>>
where
    R: DeserializeOwned,
{
    let mut rdr = csv::Reader::from_reader(bytes);
    let headers = rdr
        .headers()
        .with_context(|| format!("reading {table} header"))?
        .clone();

    for column in required {
        if !headers.iter().any(|h| h == *column) {
            bail!("{table} table is missing required column {column:?}");
        }
    }

    let mut records = Vec::new();
    let mut report = LoadReport::default();

    for result in rdr.records() {
        let row = result.with_context(|| format!("reading {table} rows"))?;
        let line = row.position().map(|p| p.line()).unwrap_or_default();

        let converted = row
            .deserialize::<R>(Some(&headers))
            .map_err(anyhow::Error::from)
            .and_then(&mut convert);

        match converted {
            Ok(record) => {
                records.push(record);
                report.accepted += 1;
            }
            Err(e) => {
                warn!(table, line, error = %e, "Skipping malformed row");
                report.skipped += 1;
            }
        }
    }

    info!(table, accepted = report.accepted, skipped = report.skipped, "Table loaded");
    Ok(Loaded { records, report })
}

/// Parses the barrier table.
#[tracing::instrument(skip(bytes), fields(bytes = bytes.len()))]
pub fn load_barriers(bytes: &[u8]) -> Result<Loaded<Barrier>> {
    read_rows(bytes, "barriers", BARRIER_COLUMNS, |row: BarrierRow| {
        Barrier::try_from(row)
    })
}

/// Parses the route-membership table into per-stop route sets.
#[tracing::instrument(skip(bytes), fields(bytes = bytes.len()))]
pub fn load_routes(bytes: &[u8]) -> Result<(RouteMap, LoadReport)> {
    let loaded = read_rows(bytes, "routes", ROUTE_COLUMNS, |row: RouteRow| {
        Ok((
            require_id(&row.stop_id, "STOP_ID")?,
            require_id(&row.route_num, "ROUTE_NUM")?,
        ))
    })?;

    let mut routes = RouteMap::new();
    for (stop_id, route) in loaded.records {
        routes.entry(stop_id).or_default().insert(route);
    }
    Ok((routes, loaded.report))
}

/// Parses the stop table, attaching each stop's routes from `routes`.
#[tracing::instrument(skip(bytes, routes), fields(bytes = bytes.len()))]
pub fn load_stops(bytes: &[u8], routes: &RouteMap) -> Result<Loaded<Stop>> {
    read_rows(bytes, "stops", STOP_COLUMNS, |row: StopRow| {
        let id = require_id(&row.stop_id, "STOP_ID")?;
        Ok(Stop {
            routes: routes.get(&id).cloned().unwrap_or_default(),
            lon: parse_coord(&row.lon, "lon")?,
            lat: parse_coord(&row.lat, "lat")?,
            name: row.name,
            id,
        })
    })
}
