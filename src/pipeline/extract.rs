use std::collections::{BTreeSet, HashMap};
use std::io::{Cursor, Read};
use std::path::{Path, PathBuf};

use flate2::read::GzDecoder;
use tempfile::TempDir;
use zip::ZipArchive;

use crate::error::{ExtractError, ParseError};
use crate::pipeline::parse;
use crate::types::activity::{decompressed_name, is_gzip, DerivedActivity, FileFormat};
use crate::types::geo::{CoordinateRecord, ExtractionReport, FileOutcome, FileReport};

/// Scratch directory for decompressed activity streams, removed when dropped.
pub struct Workspace {
    dir: TempDir,
}

impl Workspace {
    pub fn new() -> Result<Self, ExtractError> {
        let dir = tempfile::Builder::new().prefix("runhelper-").tempdir()?;
        Ok(Self { dir })
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    fn store(&self, slot: usize, filename: &str, bytes: &[u8]) -> Result<PathBuf, ExtractError> {
        let base = Path::new(filename)
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or("activity");
        let path = self.path().join(format!("{}-{}", slot, base));
        std::fs::write(&path, bytes)?;
        Ok(path)
    }
}

/// Extracts the first fix of every readable activity file the activities reference.
///
/// Only an unreadable archive or a workspace failure is fatal; each file's own
/// problems land in the report and the batch carries on. No entry is inflated
/// past `max_stream_bytes`.
pub fn extract_coordinates(
    archive: &[u8],
    activities: &[DerivedActivity],
    max_stream_bytes: usize,
) -> Result<ExtractionReport, ExtractError> {
    let mut zip = ZipArchive::new(Cursor::new(archive))
        .map_err(|e| ExtractError::InvalidArchive(e.to_string()))?;

    let wanted: BTreeSet<&str> = activities
        .iter()
        .filter_map(|activity| activity.record.filename.as_deref())
        .filter(|filename| FileFormat::from_filename(filename).is_some())
        .collect();

    let entries = index_entries(&zip);
    let workspace = Workspace::new()?;
    tracing::debug!(
        "Extracting {} activity files into {}",
        wanted.len(),
        workspace.path().display()
    );

    let mut files = Vec::with_capacity(wanted.len());
    for (slot, filename) in wanted.into_iter().enumerate() {
        let outcome = match lookup(&entries, filename) {
            Some(entry) => {
                read_entry(&mut zip, entry, filename, slot, &workspace, max_stream_bytes)?
            }
            None => FileOutcome::Missing,
        };

        match &outcome {
            FileOutcome::DecodeFailed { reason } => {
                tracing::warn!("Skipping {}: {}", filename, reason);
            }
            FileOutcome::NoCoordinate => {
                tracing::debug!("No coordinate in {}", filename);
            }
            FileOutcome::Missing => {
                tracing::debug!("{} is not in the archive", filename);
            }
            FileOutcome::Located { .. } => {}
        }

        files.push(FileReport {
            filename: filename.to_string(),
            outcome,
        });
    }

    let report = ExtractionReport::from_files(files);
    tracing::info!(
        "Activity files: {} located, {} without coordinates, {} failed, {} missing",
        report.located,
        report.no_coordinate,
        report.failed,
        report.missing
    );
    Ok(report)
}

/// Archive entry names keyed by normalised path.
fn index_entries<R: Read + std::io::Seek>(zip: &ZipArchive<R>) -> HashMap<String, String> {
    zip.file_names()
        .map(|name| (normalize(name), name.to_string()))
        .collect()
}

fn normalize(path: &str) -> String {
    path.replace('\\', "/").trim_start_matches("./").to_string()
}

/// Exact path match first, then an entry nested under an extra top-level folder.
fn lookup<'a>(entries: &'a HashMap<String, String>, filename: &str) -> Option<&'a str> {
    let wanted = normalize(filename);
    if let Some(entry) = entries.get(&wanted) {
        return Some(entry.as_str());
    }

    let suffix = format!("/{}", wanted);
    let mut nested: Vec<&String> = entries
        .iter()
        .filter(|(path, _)| path.ends_with(&suffix))
        .map(|(_, entry)| entry)
        .collect();
    nested.sort();
    nested.first().map(|entry| entry.as_str())
}

fn read_entry<R: Read + std::io::Seek>(
    zip: &mut ZipArchive<R>,
    entry: &str,
    filename: &str,
    slot: usize,
    workspace: &Workspace,
    max_stream_bytes: usize,
) -> Result<FileOutcome, ExtractError> {
    let Some(format) = FileFormat::from_filename(filename) else {
        return Ok(FileOutcome::NoCoordinate);
    };

    let raw = match zip.by_name(entry) {
        Ok(file) => match read_bounded(file, max_stream_bytes) {
            Ok(raw) => raw,
            Err(e) => {
                return Ok(FileOutcome::DecodeFailed {
                    reason: format!("Failed to read archive entry: {}", e),
                })
            }
        },
        Err(e) => {
            return Ok(FileOutcome::DecodeFailed {
                reason: format!("Failed to open archive entry: {}", e),
            })
        }
    };

    let stream = if is_gzip(filename) {
        match gunzip(&raw, max_stream_bytes) {
            Ok(stream) => stream,
            Err(e) => {
                return Ok(FileOutcome::DecodeFailed {
                    reason: e.to_string(),
                })
            }
        }
    } else {
        raw
    };

    let path = workspace.store(slot, decompressed_name(filename), &stream)?;
    let bytes = std::fs::read(&path)?;

    Ok(match parse::first_fix(&bytes, format) {
        Ok(Some(fix)) => FileOutcome::Located {
            coordinate: CoordinateRecord::new(decompressed_name(filename), fix),
        },
        Ok(None) => FileOutcome::NoCoordinate,
        Err(e) => FileOutcome::DecodeFailed {
            reason: e.to_string(),
        },
    })
}

fn gunzip(raw: &[u8], limit: usize) -> Result<Vec<u8>, ParseError> {
    read_bounded(GzDecoder::new(raw), limit).map_err(|e| ParseError::Gzip(e.to_string()))
}

/// Reads at most `limit` bytes; a longer stream is an error rather than a silent cut.
fn read_bounded<R: Read>(reader: R, limit: usize) -> std::io::Result<Vec<u8>> {
    let mut stream = Vec::new();
    reader
        .take(limit as u64 + 1)
        .read_to_end(&mut stream)?;
    if stream.len() > limit {
        return Err(std::io::Error::new(
            std::io::ErrorKind::InvalidData,
            format!("stream exceeds {} bytes", limit),
        ));
    }
    Ok(stream)
}
