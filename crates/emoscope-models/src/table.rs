//! The accumulated emotion time-series table.
//!
//! One row per (frame, face) pair. The table is append-only while the
//! ingestion loop runs and frozen afterward; all analytics consume it as an
//! immutable value.
//!
//! Invariants, enforced at append time:
//! - rows are grouped by non-decreasing `frame_index`;
//! - within a frame, `face_id` values are 1..k with no gaps, where k is the
//!   number of faces detected in that frame.

use std::path::Path;
use std::str::FromStr;

use crate::emotion::{EmotionCategory, EmotionScores};
use crate::error::{ModelError, ModelResult};
use crate::observation::FaceObservation;
use crate::range::FrameRange;

/// Append-only accumulator for the ingestion loop.
///
/// `push` validates the table invariants; `freeze` hands the finished rows
/// off as an immutable [`TimeSeriesTable`].
#[derive(Debug, Default)]
pub struct TableBuilder {
    rows: Vec<FaceObservation>,
    last_frame: Option<u64>,
    next_face_id: u32,
}

impl TableBuilder {
    /// Create an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of rows appended so far.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Append one observation, validating frame ordering and the within-frame
    /// 1..k face-id sequence.
    pub fn push(&mut self, obs: FaceObservation) -> ModelResult<()> {
        let expected = match self.last_frame {
            Some(last) if obs.frame_index < last => {
                return Err(ModelError::NonMonotonicFrame {
                    frame: obs.frame_index,
                    last,
                });
            }
            Some(last) if obs.frame_index == last => self.next_face_id,
            _ => 1,
        };

        if obs.face_id != expected {
            return Err(ModelError::FaceIdGap {
                frame: obs.frame_index,
                expected,
                got: obs.face_id,
            });
        }

        self.last_frame = Some(obs.frame_index);
        self.next_face_id = expected + 1;
        self.rows.push(obs);
        Ok(())
    }

    /// Freeze the builder into an immutable table.
    ///
    /// A table with zero rows cannot support any analytics, so an empty
    /// builder is an error.
    pub fn freeze(self) -> ModelResult<TimeSeriesTable> {
        if self.rows.is_empty() {
            return Err(ModelError::EmptyTable);
        }
        Ok(TimeSeriesTable { rows: self.rows })
    }
}

/// Immutable, frozen emotion time-series table.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeSeriesTable {
    rows: Vec<FaceObservation>,
}

impl TimeSeriesTable {
    /// All rows in append order.
    pub fn rows(&self) -> &[FaceObservation] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Sorted, deduplicated set of sampled frame indices.
    pub fn sampled_frames(&self) -> Vec<u64> {
        let mut frames: Vec<u64> = self.rows.iter().map(|r| r.frame_index).collect();
        frames.sort_unstable();
        frames.dedup();
        frames
    }

    /// Sorted, deduplicated set of face ids present anywhere in the table.
    pub fn face_ids(&self) -> Vec<u32> {
        let mut ids: Vec<u32> = self.rows.iter().map(|r| r.face_id).collect();
        ids.sort_unstable();
        ids.dedup();
        ids
    }

    /// Categories with at least one reported value anywhere in the table,
    /// in canonical order.
    pub fn available_emotions(&self) -> Vec<EmotionCategory> {
        EmotionCategory::ALL
            .iter()
            .copied()
            .filter(|c| self.rows.iter().any(|r| r.emotion_scores.get(*c).is_some()))
            .collect()
    }

    /// Borrowed view of the rows falling inside a resolved window.
    pub fn window(&self, range: FrameRange) -> Vec<&FaceObservation> {
        self.rows
            .iter()
            .filter(|r| range.contains(r.frame_index))
            .collect()
    }

    /// Borrowed view of every row.
    pub fn all_rows(&self) -> Vec<&FaceObservation> {
        self.rows.iter().collect()
    }

    /// Persist the table as a row-oriented CSV file.
    ///
    /// Columns: `frame`, `face_id`, one column per available emotion
    /// category, and `second` when a frame rate is supplied. An absent score
    /// is written as an empty cell, never as zero.
    pub fn write_csv(&self, path: impl AsRef<Path>, fps: Option<f64>) -> ModelResult<()> {
        let emotions = self.available_emotions();
        let mut writer = csv::Writer::from_path(path.as_ref())?;

        let mut header: Vec<String> = vec!["frame".into(), "face_id".into()];
        header.extend(emotions.iter().map(|c| c.as_str().to_string()));
        if fps.is_some() {
            header.push("second".into());
        }
        writer.write_record(&header)?;

        for row in &self.rows {
            let mut record: Vec<String> = vec![row.frame_index.to_string(), row.face_id.to_string()];
            for category in &emotions {
                match row.emotion_scores.get(*category) {
                    Some(value) => record.push(value.to_string()),
                    None => record.push(String::new()),
                }
            }
            if let Some(fps) = fps {
                record.push(row.second(fps).to_string());
            }
            writer.write_record(&record)?;
        }

        writer.flush()?;
        Ok(())
    }

    /// Load a table previously persisted with [`write_csv`].
    ///
    /// Rows pass through [`TableBuilder`] again, so a file that violates the
    /// frame-ordering or face-id invariants is rejected rather than silently
    /// accepted. A file without a `face_id` column loads with face ids
    /// assigned 1..k within each frame group. The `second` column is derived
    /// data and is dropped on load.
    ///
    /// [`write_csv`]: TimeSeriesTable::write_csv
    pub fn read_csv(path: impl AsRef<Path>) -> ModelResult<TimeSeriesTable> {
        let mut reader = csv::Reader::from_path(path.as_ref())?;

        #[derive(Clone, Copy)]
        enum Column {
            Frame,
            FaceId,
            Second,
            Emotion(EmotionCategory),
        }

        let mut columns = Vec::new();
        for name in reader.headers()?.iter() {
            let column = match name {
                "frame" => Column::Frame,
                "face_id" => Column::FaceId,
                "second" => Column::Second,
                other => Column::Emotion(
                    EmotionCategory::from_str(other)
                        .map_err(|_| ModelError::UnrecognizedColumn(other.to_string()))?,
                ),
            };
            columns.push(column);
        }

        let mut builder = TableBuilder::new();
        let mut prev_frame = None;
        let mut next_face_id = 1u32;
        for (row_idx, record) in reader.records().enumerate() {
            let record = record?;
            let mut frame_index = None;
            let mut face_id = None;
            let mut scores = EmotionScores::new();

            for (column, field) in columns.iter().zip(record.iter()) {
                match column {
                    Column::Frame => {
                        frame_index = Some(parse_field::<u64>("frame", row_idx, field)?);
                    }
                    Column::FaceId => {
                        face_id = Some(parse_field::<u32>("face_id", row_idx, field)?);
                    }
                    Column::Second => {}
                    Column::Emotion(category) => {
                        if !field.is_empty() {
                            let value =
                                parse_field::<f64>(category.as_str(), row_idx, field)?;
                            scores.insert(*category, value);
                        }
                    }
                }
            }

            let frame_index = frame_index.ok_or_else(|| ModelError::InvalidValue {
                column: "frame".into(),
                row: row_idx,
                value: String::new(),
            })?;

            // Without a face_id column, number rows 1..k within each frame
            // group so files with several rows per frame still load.
            let face_id = match face_id {
                Some(id) => id,
                None => {
                    if prev_frame == Some(frame_index) {
                        next_face_id += 1;
                    } else {
                        next_face_id = 1;
                    }
                    next_face_id
                }
            };
            prev_frame = Some(frame_index);

            builder.push(FaceObservation::new(frame_index, face_id, scores))?;
        }

        builder.freeze()
    }
}

fn parse_field<T: FromStr>(column: &str, row: usize, field: &str) -> ModelResult<T> {
    // frame may be serialized as a float by other tools; accept "300.0".
    if let Ok(value) = field.parse::<T>() {
        return Ok(value);
    }
    if let Ok(float) = field.parse::<f64>() {
        if float.fract() == 0.0 {
            if let Ok(value) = format!("{}", float as i64).parse::<T>() {
                return Ok(value);
            }
        }
    }
    Err(ModelError::InvalidValue {
        column: column.to_string(),
        row,
        value: field.to_string(),
    })
}
