//! Simulator output inspection.
//!
//! The column and table names EnergyPlus uses for end-use totals are not
//! pinned down anywhere in this service, so the extractors only recognise
//! output that has not been specified yet and report no data. Runs with
//! artifacts but no usable figures fall back to mock data.

use crate::core::energy::EnergyByType;
use std::path::{Path, PathBuf};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::debug;

/// Output files found in a run directory, grouped by kind.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct OutputArtifacts {
    /// `*.csv` files, sorted by path
    pub csv: Vec<PathBuf>,
    /// `*.html` files, sorted by path
    pub html: Vec<PathBuf>,
}

impl OutputArtifacts {
    /// Total number of candidate files.
    #[must_use]
    pub fn len(&self) -> usize {
        self.csv.len() + self.html.len()
    }

    /// True when the run left no candidate files.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Energy figures extracted from simulator output.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedOutput {
    /// Consumption per category
    pub energy_by_type: EnergyByType,
    /// Files the figures came from
    pub source_files: Vec<PathBuf>,
}

/// Lists CSV and HTML files directly inside `dir`.
pub async fn collect_artifacts(dir: &Path) -> std::io::Result<OutputArtifacts> {
    let mut artifacts = OutputArtifacts::default();
    let mut entries = tokio::fs::read_dir(dir).await?;
    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        if !entry.file_type().await?.is_file() {
            continue;
        }
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("csv") => artifacts.csv.push(path),
            Some(ext) if ext.eq_ignore_ascii_case("html") => artifacts.html.push(path),
            _ => {}
        }
    }
    artifacts.csv.sort();
    artifacts.html.sort();
    Ok(artifacts)
}

/// Tries CSV output first, then the first HTML report.
pub async fn parse_artifacts(artifacts: &OutputArtifacts) -> Option<ParsedOutput> {
    if !artifacts.csv.is_empty() {
        if let Some(parsed) = extract_from_csv(&artifacts.csv).await {
            return Some(parsed);
        }
    }
    let html = artifacts.html.first()?;
    extract_from_html(html).await
}

async fn extract_from_csv(files: &[PathBuf]) -> Option<ParsedOutput> {
    for file in files {
        match read_header(file).await {
            Ok(header) => {
                let columns = header.as_deref().map_or(0, |h| h.split(',').count());
                debug!(file = %file.display(), columns, "inspected CSV output");
            }
            Err(e) => debug!(file = %file.display(), error = %e, "could not read CSV output"),
        }
    }
    None
}

/// Reads only the first line; simulator CSVs can run to hundreds of megabytes.
async fn read_header(file: &Path) -> std::io::Result<Option<String>> {
    let reader = BufReader::new(tokio::fs::File::open(file).await?);
    reader.lines().next_line().await
}

async fn extract_from_html(file: &Path) -> Option<ParsedOutput> {
    match tokio::fs::metadata(file).await {
        Ok(meta) => {
            debug!(file = %file.display(), bytes = meta.len(), "inspected HTML output");
        }
        Err(e) => debug!(file = %file.display(), error = %e, "could not read HTML output"),
    }
    None
}
