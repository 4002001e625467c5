//! Series and keypoint file readers with full input validation.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tempo_dtw::TimeSeries;
use tempo_motion::Keypoint;
use tracing::{debug, info, instrument};

use crate::IoError;
use crate::domain::SeriesFormat;

/// One step of a JSON series: a feature vector or a bare scalar.
#[derive(Deserialize)]
#[serde(untagged)]
enum JsonStep {
    Vector(Vec<f64>),
    Scalar(f64),
}

/// Reads a time series from a JSON or CSV file.
///
/// The format is chosen by extension:
/// - `.json`: `[[x0, y0, ...], [x1, y1, ...], ...]`, one inner array per step.
///   A flat `[v0, v1, ...]` array is read as a single-dimension series.
/// - `.csv`: header row, then one step per row with every column numeric.
///
/// # Errors
///
/// | Variant | Condition |
/// |---|---|
/// | [`IoError::UnsupportedFormat`] | Extension is neither `.json` nor `.csv` |
/// | [`IoError::FileNotFound`] | File doesn't exist or is unreadable |
/// | [`IoError::JsonParse`] | Malformed JSON or wrong shape |
/// | [`IoError::MixedSteps`] | JSON mixes scalar and vector steps |
/// | [`IoError::CsvParse`] | Malformed CSV record |
/// | [`IoError::Empty`] | Zero steps |
/// | [`IoError::InconsistentRowLength`] | CSV row has different column count than header |
/// | [`IoError::NonFiniteValue`] | CSV cell is NaN, Inf, or unparseable float |
/// | [`IoError::InvalidSeries`] | Ragged or zero-width steps |
pub struct SeriesReader {
    path: PathBuf,
}

impl SeriesReader {
    /// Create a new reader for the given file path.
    pub fn new(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
        }
    }

    /// Read and validate the file, returning a [`TimeSeries`].
    #[instrument(skip(self), fields(path = %self.path.display()))]
    pub fn read(&self) -> Result<TimeSeries, IoError> {
        let series = match SeriesFormat::from_path(&self.path)? {
            SeriesFormat::Json => self.read_json()?,
            SeriesFormat::Csv => self.read_csv()?,
        };
        info!(len = series.len(), dim = series.dim(), "series loaded");
        Ok(series)
    }

    fn read_json(&self) -> Result<TimeSeries, IoError> {
        let content = read_to_string(&self.path)?;
        let steps: Vec<JsonStep> =
            serde_json::from_str(&content).map_err(|e| IoError::json(self.path.clone(), e))?;
        if steps.is_empty() {
            return Err(IoError::Empty {
                path: self.path.clone(),
            });
        }
        debug!(steps = steps.len(), "parsed JSON steps");

        let series = if matches!(steps[0], JsonStep::Scalar(_)) {
            let mut values = Vec::with_capacity(steps.len());
            for (step, value) in steps.into_iter().enumerate() {
                match value {
                    JsonStep::Scalar(v) => values.push(v),
                    JsonStep::Vector(_) => return Err(self.mixed(step)),
                }
            }
            TimeSeries::from_scalars(values)
        } else {
            let mut frames = Vec::with_capacity(steps.len());
            for (step, value) in steps.into_iter().enumerate() {
                match value {
                    JsonStep::Vector(v) => frames.push(v),
                    JsonStep::Scalar(_) => return Err(self.mixed(step)),
                }
            }
            TimeSeries::new(frames)
        };
        series.map_err(|source| IoError::InvalidSeries {
            path: self.path.clone(),
            source,
        })
    }

    fn read_csv(&self) -> Result<TimeSeries, IoError> {
        let file = fs::File::open(&self.path).map_err(|e| IoError::FileNotFound {
            path: self.path.clone(),
            source: e,
        })?;

        // flexible(true) so the row length check below reports the row instead
        // of a low-level CsvParse error.
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(file);

        let header = rdr.headers().map_err(|e| self.csv_error(e))?;
        let expected = header.len();
        debug!(expected_cols = expected, "read CSV header");

        let mut data = Vec::new();
        let mut rows = 0;
        for (row_index, result) in rdr.records().enumerate() {
            let record = result.map_err(|e| self.csv_error(e))?;
            if record.len() != expected {
                return Err(IoError::InconsistentRowLength {
                    path: self.path.clone(),
                    row_index,
                    expected,
                    got: record.len(),
                });
            }
            for (col_index, raw) in record.iter().enumerate() {
                match raw.parse::<f64>() {
                    Ok(value) if value.is_finite() => data.push(value),
                    _ => {
                        return Err(IoError::NonFiniteValue {
                            path: self.path.clone(),
                            row_index,
                            col_index,
                            raw: raw.to_string(),
                        });
                    }
                }
            }
            rows += 1;
        }

        if rows == 0 {
            return Err(IoError::Empty {
                path: self.path.clone(),
            });
        }

        TimeSeries::from_flat(expected, data).map_err(|source| IoError::InvalidSeries {
            path: self.path.clone(),
            source,
        })
    }

    fn mixed(&self, step: usize) -> IoError {
        IoError::MixedSteps {
            path: self.path.clone(),
            step,
        }
    }

    fn csv_error(&self, e: csv::Error) -> IoError {
        IoError::CsvParse {
            path: self.path.clone(),
            offset: e.position().map_or(0, |p| p.byte()),
            source: e,
        }
    }
}

/// Reads pose keypoint frames from a JSON file.
///
/// Expected format: an array of frames, each an array of
/// `{"x": .., "y": .., "confidence": ..}` objects in detector order.
///
/// # Errors
///
/// | Variant | Condition |
/// |---|---|
/// | [`IoError::FileNotFound`] | File doesn't exist or is unreadable |
/// | [`IoError::JsonParse`] | Malformed JSON or wrong shape |
/// | [`IoError::Empty`] | Zero frames |
pub struct KeypointReader {
    path: PathBuf,
}

impl KeypointReader {
    /// Create a new reader for the given JSON file path.
    pub fn new(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
        }
    }

    /// Read every keypoint frame in file order.
    #[instrument(skip(self), fields(path = %self.path.display()))]
    pub fn read(&self) -> Result<Vec<Vec<Keypoint>>, IoError> {
        let content = read_to_string(&self.path)?;
        let frames: Vec<Vec<Keypoint>> =
            serde_json::from_str(&content).map_err(|e| IoError::json(self.path.clone(), e))?;
        if frames.is_empty() {
            return Err(IoError::Empty {
                path: self.path.clone(),
            });
        }
        info!(n_frames = frames.len(), "keypoint frames loaded");
        Ok(frames)
    }
}

fn read_to_string(path: &Path) -> Result<String, IoError> {
    fs::read_to_string(path).map_err(|e| IoError::FileNotFound {
        path: path.to_path_buf(),
        source: e,
    })
}
