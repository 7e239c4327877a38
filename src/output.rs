//! Serialization and persistence of the run's JSON artifacts.
//!
//! All three artifacts are encoded in memory and staged next to their final
//! names before any of them is moved into place.

use anyhow::{Context, Result};
use flate2::Compression;
use flate2::write::GzEncoder;
use serde::Serialize;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::pipeline::Artifacts;

pub const STOPS_FILE: &str = "stops.json";
pub const NEIGHBORHOODS_FILE: &str = "neighborhoods.json";
pub const ROUTES_FILE: &str = "routes.json";

fn encode(value: &impl Serialize, gzip: bool) -> Result<Vec<u8>> {
    let json = serde_json::to_vec(value)?;
    if !gzip {
        return Ok(json);
    }
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(&json)?;
    Ok(encoder.finish()?)
}

/// Encodes each artifact, paired with its file name.
pub fn render(artifacts: &Artifacts, gzip: bool) -> Result<Vec<(String, Vec<u8>)>> {
    let suffix = if gzip { ".gz" } else { "" };
    Ok(vec![
        (format!("{STOPS_FILE}{suffix}"), encode(&artifacts.stops, gzip)?),
        (
            format!("{NEIGHBORHOODS_FILE}{suffix}"),
            encode(&artifacts.neighborhoods, gzip)?,
        ),
        (format!("{ROUTES_FILE}{suffix}"), encode(&artifacts.routes, gzip)?),
    ])
}

/// Writes all artifacts into `out_dir`, returning the final paths.
#[tracing::instrument(skip(out_dir, artifacts), fields(out_dir = %out_dir.display()))]
pub fn write_artifacts(out_dir: &Path, artifacts: &Artifacts, gzip: bool) -> Result<Vec<PathBuf>> {
    let rendered = render(artifacts, gzip)?;
    fs::create_dir_all(out_dir).with_context(|| format!("creating {}", out_dir.display()))?;

    let mut staged = Vec::with_capacity(rendered.len());
    for (name, bytes) in &rendered {
        let tmp = out_dir.join(format!("{name}.tmp"));
        fs::write(&tmp, bytes).with_context(|| format!("writing {}", tmp.display()))?;
        debug!(path = %tmp.display(), bytes = bytes.len(), "Staged artifact");
        staged.push((tmp, out_dir.join(name)));
    }

    let mut written = Vec::with_capacity(staged.len());
    for (tmp, path) in staged {
        fs::rename(&tmp, &path).with_context(|| format!("moving {} into place", path.display()))?;
        written.push(path);
    }

    info!(
        stops = artifacts.stops.len(),
        neighborhoods = artifacts.neighborhoods.len(),
        routes = artifacts.routes.len(),
        gzip,
        "Artifacts written"
    );
    Ok(written)
}
