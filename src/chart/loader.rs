use std::path::Path;

use tracing::{debug, warn};

use super::{Beat, BeatKind, Chart, ChartError};

/// Loads a chart from comma-separated rows: `timestamp[,kind[,holdDuration]]`,
/// no header. Parsing is deliberately forgiving so a hand-edited chart file
/// with a few bad rows still loads; malformed rows are dropped, not fatal.
pub struct ChartLoader;

impl ChartLoader {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Chart, ChartError> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|e| ChartError::NotFound {
            path: path.to_path_buf(),
            source: e,
        })?;
        Ok(Self::parse(&source))
    }

    /// Recoverable loading path: a missing chart file logs a warning and
    /// yields an empty chart, so the session can still start (it will just
    /// run out of beats immediately).
    pub fn load_or_empty<P: AsRef<Path>>(path: P) -> Chart {
        match Self::load(path) {
            Ok(chart) => chart,
            Err(e) => {
                warn!("{e}; starting with an empty chart");
                Chart::new()
            }
        }
    }

    pub fn parse(source: &str) -> Chart {
        source
            .lines()
            .enumerate()
            .filter_map(|(line_no, line)| {
                let beat = Self::parse_row(line);
                if beat.is_none() && !line.trim().is_empty() {
                    debug!(line_no = line_no + 1, row = line, "dropping malformed chart row");
                }
                beat
            })
            .collect()
    }

    fn parse_row(line: &str) -> Option<Beat> {
        let mut cols = line.split(',').map(str::trim);

        let timestamp: f64 = cols.next()?.parse().ok()?;
        if !timestamp.is_finite() || timestamp < 0.0 {
            return None;
        }

        // A missing kind column means a plain tap row.
        let kind = match cols.next() {
            None | Some("") => BeatKind::Tap,
            Some(kind) if kind.eq_ignore_ascii_case("tap") => BeatKind::Tap,
            Some(kind) if kind.eq_ignore_ascii_case("hold") => {
                let duration: f64 = cols.next()?.parse().ok()?;
                if !duration.is_finite() || duration <= 0.0 {
                    return None;
                }
                BeatKind::Hold { duration }
            }
            Some(_) => return None,
        };

        Some(Beat { timestamp, kind })
    }
}
