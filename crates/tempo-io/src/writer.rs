//! JSON report writer for shape and speed comparisons.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tempo_dtw::{Comparison, TimeSeries};
use tempo_motion::{Grade, SpeedScores};
use tracing::{debug, info, instrument};

use crate::IoError;
use crate::domain::SessionName;

/// Writes comparison reports and feature series to JSON files.
///
/// Creates the output directory on construction if it does not exist.
/// Output files are named `{session}_shape.json`, `{session}_speed.json`
/// and `{session}_features.json`.
pub struct ReportWriter {
    output_dir: PathBuf,
    session: SessionName,
}

impl ReportWriter {
    /// Create a new writer targeting the given directory and session name.
    ///
    /// # Errors
    ///
    /// Returns [`IoError::OutputDirCreate`] if the directory cannot be created.
    #[instrument(skip_all, fields(dir = %output_dir.display(), session = %session))]
    pub fn new(output_dir: &Path, session: SessionName) -> Result<Self, IoError> {
        fs::create_dir_all(output_dir).map_err(|e| IoError::OutputDirCreate {
            path: output_dir.to_path_buf(),
            source: e,
        })?;
        debug!("output directory ready");
        Ok(Self {
            output_dir: output_dir.to_path_buf(),
            session,
        })
    }

    /// Write a shape comparison to `{session}_shape.json` and return its path.
    ///
    /// The warping path is always included. With `include_matrices` the
    /// distance and cost matrices are written too, for heatmap rendering.
    ///
    /// # Errors
    ///
    /// Returns [`IoError::WriteFile`] if the file cannot be written.
    #[instrument(skip_all, fields(include_matrices = include_matrices))]
    pub fn write_shape(
        &self,
        comparison: &Comparison,
        include_matrices: bool,
    ) -> Result<PathBuf, IoError> {
        let path = self.file_path("shape");
        let alignment = &comparison.alignment;

        let artifact = ShapeArtifact {
            session: self.session.as_str(),
            score: comparison.score.value(),
            score_display: comparison.score.to_string(),
            grade: Grade::from_score(comparison.score),
            cost: alignment.cost(),
            recorded_len: comparison.distances.rows(),
            reference_len: comparison.distances.cols(),
            path: alignment.path.to_pairs(),
            distance_matrix: include_matrices.then(|| comparison.distances.to_rows()),
            cost_matrix: include_matrices.then(|| alignment.cost_matrix.to_rows()),
        };

        self.write_json(&path, &artifact)?;
        info!(path = %path.display(), "shape report written");
        Ok(path)
    }

    /// Write speed comparison scores to `{session}_speed.json` and return its path.
    ///
    /// # Errors
    ///
    /// Returns [`IoError::WriteFile`] if the file cannot be written.
    #[instrument(skip_all)]
    pub fn write_speed(
        &self,
        scores: &SpeedScores,
        fast_factor: f64,
        recorded_len: usize,
        reference_len: usize,
    ) -> Result<PathBuf, IoError> {
        let path = self.file_path("speed");

        let artifact = SpeedArtifact {
            session: self.session.as_str(),
            recorded_len,
            reference_len,
            fast_factor,
            normal: ScoreEntry {
                score: scores.normal.value(),
                score_display: scores.normal.to_string(),
                grade: scores.normal_grade(),
            },
            fast: ScoreEntry {
                score: scores.fast.value(),
                score_display: scores.fast.to_string(),
                grade: scores.fast_grade(),
            },
        };

        self.write_json(&path, &artifact)?;
        info!(path = %path.display(), "speed report written");
        Ok(path)
    }

    /// Write a feature series to `{session}_features.json` and return its path.
    ///
    /// The file uses the array-of-steps layout that
    /// [`SeriesReader`](crate::SeriesReader) reads back bit-for-bit.
    ///
    /// # Errors
    ///
    /// Returns [`IoError::WriteFile`] if the file cannot be written.
    #[instrument(skip_all, fields(len = series.len(), dim = series.dim()))]
    pub fn write_features(&self, series: &TimeSeries) -> Result<PathBuf, IoError> {
        let path = self.file_path("features");
        let steps: Vec<&[f64]> = series.frames().collect();
        self.write_json(&path, &steps)?;
        info!(path = %path.display(), "feature series written");
        Ok(path)
    }

    fn file_path(&self, kind: &str) -> PathBuf {
        self.output_dir
            .join(format!("{}_{kind}.json", self.session.as_str()))
    }

    fn write_json<T: Serialize + ?Sized>(&self, path: &Path, value: &T) -> Result<(), IoError> {
        let json = serde_json::to_string_pretty(value).map_err(|e| IoError::Serialize {
            path: path.to_path_buf(),
            source: e,
        })?;
        fs::write(path, &json).map_err(|e| IoError::WriteFile {
            path: path.to_path_buf(),
            source: e,
        })
    }
}

// --- Shadow structs for JSON serialization ---

#[derive(Serialize)]
struct ShapeArtifact<'a> {
    session: &'a str,
    score: f64,
    score_display: String,
    grade: Grade,
    cost: f64,
    recorded_len: usize,
    reference_len: usize,
    path: Vec<(usize, usize)>,
    #[serde(skip_serializing_if = "Option::is_none")]
    distance_matrix: Option<Vec<Vec<f64>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    cost_matrix: Option<Vec<Vec<f64>>>,
}

#[derive(Serialize)]
struct SpeedArtifact<'a> {
    session: &'a str,
    recorded_len: usize,
    reference_len: usize,
    fast_factor: f64,
    normal: ScoreEntry,
    fast: ScoreEntry,
}

#[derive(Serialize)]
struct ScoreEntry {
    score: f64,
    score_display: String,
    grade: Grade,
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;
    use tempo_dtw::Dtw;
    use tempo_motion::compare_speed;

    fn writer(dir: &TempDir, name: &str) -> ReportWriter {
        ReportWriter::new(dir.path(), SessionName::new(name.into()).unwrap()).unwrap()
    }

    fn read_json(path: &Path) -> serde_json::Value {
        serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap()
    }

    fn identity_comparison() -> Comparison {
        let s = TimeSeries::new(vec![vec![1.0, 0.0], vec![0.0, 1.0]]).unwrap();
        Dtw::cosine().compare(s.as_view(), s.as_view()).unwrap()
    }

    #[test]
    fn creates_nested_output_dir() {
        let dir = TempDir::new().unwrap();
        let nested = dir.path().join("a").join("b");
        ReportWriter::new(&nested, SessionName::new("s".into()).unwrap()).unwrap();
        assert!(nested.is_dir());
    }

    #[test]
    fn write_shape_json_structure() {
        let dir = TempDir::new().unwrap();
        let path = writer(&dir, "shape_test")
            .write_shape(&identity_comparison(), false)
            .unwrap();
        assert_eq!(path, dir.path().join("shape_test_shape.json"));

        let content = read_json(&path);
        assert_eq!(content["session"], "shape_test");
        assert_eq!(content["score"].as_f64().unwrap(), 0.0);
        assert_eq!(content["score_display"], "0.00000");
        assert_eq!(content["grade"], "Perfect");
        assert_eq!(content["recorded_len"], 2);
        assert_eq!(content["reference_len"], 2);
        assert_eq!(content["path"], serde_json::json!([[0, 0], [1, 1]]));
        assert!(content.get("distance_matrix").is_none());
        assert!(content.get("cost_matrix").is_none());
    }

    #[test]
    fn write_shape_with_matrices() {
        let dir = TempDir::new().unwrap();
        let path = writer(&dir, "heat")
            .write_shape(&identity_comparison(), true)
            .unwrap();
        let content = read_json(&path);
        assert_eq!(
            content["distance_matrix"],
            serde_json::json!([[0.0, 1.0], [1.0, 0.0]])
        );
        assert_eq!(
            content["cost_matrix"],
            serde_json::json!([[0.0, 1.0], [1.0, 0.0]])
        );
    }

    #[test]
    fn write_speed_json_structure() {
        let dir = TempDir::new().unwrap();
        let recorded = TimeSeries::from_scalars(vec![0.0, 1.0]).unwrap();
        let reference = TimeSeries::from_scalars(vec![0.0, 2.0]).unwrap();
        let scores = compare_speed(&recorded, &reference).unwrap();
        let path = writer(&dir, "speed_test")
            .write_speed(&scores, 2.0, 2, 2)
            .unwrap();

        let content = read_json(&path);
        assert_eq!(content["session"], "speed_test");
        assert_eq!(content["fast_factor"].as_f64().unwrap(), 2.0);
        assert_eq!(content["normal"]["score"].as_f64().unwrap(), -1.75);
        assert_eq!(content["normal"]["score_display"], "-1.75000");
        assert_eq!(content["normal"]["grade"], "Perfect");
        assert_eq!(content["fast"]["score"].as_f64().unwrap(), -3.75);
    }

    #[test]
    fn write_features_layout() {
        let dir = TempDir::new().unwrap();
        let series = TimeSeries::new(vec![vec![1.5, -2.0], vec![0.25, 4.0]]).unwrap();
        let path = writer(&dir, "feat").write_features(&series).unwrap();
        assert_eq!(
            read_json(&path),
            serde_json::json!([[1.5, -2.0], [0.25, 4.0]])
        );
    }

    #[test]
    fn unwritable_target_is_write_error() {
        let dir = TempDir::new().unwrap();
        let w = writer(&dir, "blocked");
        // A directory occupying the report path makes the write fail.
        fs::create_dir(dir.path().join("blocked_shape.json")).unwrap();
        let err = w.write_shape(&identity_comparison(), false).unwrap_err();
        assert!(matches!(err, IoError::WriteFile { .. }));
    }
}
