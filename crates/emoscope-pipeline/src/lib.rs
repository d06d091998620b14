//! The ingestion loop.
//!
//! Walks a frame source at the configured sampling interval, sends each
//! sampled frame to the detector, adapts the raw detections into table rows
//! and accumulates them in a [`TableBuilder`]. Ingestion is strictly
//! sequential: one frame is in flight at a time, and rows arrive in sampled
//! order, which is what lets the table enforce its ordering invariants on
//! append.
//!
//! A detector failure never aborts the run; the frame is logged and skipped
//! and the loop moves on. Only an entirely empty result is fatal.
//!
//! [`TableBuilder`]: emoscope_models::TableBuilder

pub mod config;
pub mod error;

use std::path::Path;

use tracing::{debug, info, warn};

use emoscope_detector::{DetectionAdapter, EmotionDetector};
use emoscope_media::{FfmpegFrameSource, FrameSampler, FrameSource};
use emoscope_models::{ModelError, TableBuilder, TimeSeriesTable};

pub use config::ProcessConfig;
pub use error::{PipelineError, PipelineResult};

/// A finished ingestion run.
#[derive(Debug)]
pub struct IngestOutcome {
    /// The frozen table.
    pub table: TimeSeriesTable,
    /// Frames that survived sampling and were sent to the detector.
    pub frames_sampled: u64,
    /// Sampled frames dropped because the detector failed on them.
    pub frames_failed: u64,
}

/// Run the ingestion loop over an already-open frame source.
pub async fn process_frames<S, D>(
    source: S,
    detector: &D,
    config: &ProcessConfig,
) -> PipelineResult<IngestOutcome>
where
    S: FrameSource,
    D: EmotionDetector + ?Sized,
{
    let mut sampler = FrameSampler::new(source, config.sampling_interval)?;
    let adapter = DetectionAdapter::new(config.face_mode);
    let mut builder = TableBuilder::new();

    let mut frames_sampled = 0u64;
    let mut frames_failed = 0u64;

    while let Some(frame) = sampler.next_frame().await? {
        frames_sampled += 1;

        let detections = match detector.detect(&frame).await {
            Ok(detections) => detections,
            Err(e) => {
                warn!(
                    frame = frame.index,
                    detector = detector.name(),
                    error = %e,
                    "detection failed, skipping frame"
                );
                frames_failed += 1;
                continue;
            }
        };

        let observations = adapter.observe_frame(frame.index, detections);
        if observations.is_empty() {
            debug!(frame = frame.index, "no faces in frame");
            continue;
        }
        for obs in observations {
            builder.push(obs)?;
        }
    }

    let rows = builder.len();
    let table = builder.freeze().map_err(|e| match e {
        ModelError::EmptyTable => PipelineError::EmptyResult,
        other => PipelineError::Model(other),
    })?;

    info!(
        frames_sampled,
        frames_failed, rows, "ingestion finished"
    );

    Ok(IngestOutcome {
        table,
        frames_sampled,
        frames_failed,
    })
}

/// Open a video file and run the ingestion loop over its frames.
pub async fn process_video<D>(
    path: impl AsRef<Path>,
    detector: &D,
    config: &ProcessConfig,
) -> PipelineResult<IngestOutcome>
where
    D: EmotionDetector + ?Sized,
{
    let path = path.as_ref();
    info!(
        path = %path.display(),
        interval = config.sampling_interval,
        mode = ?config.face_mode,
        "starting ingestion"
    );

    let source = FfmpegFrameSource::open(path).await?;
    process_frames(source, detector, config).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::collections::BTreeMap;
    use std::sync::atomic::{AtomicU64, Ordering};

    use emoscope_detector::{DetectorError, DetectorResult, FaceMode, RawDetection};
    use emoscope_media::{Frame, MediaResult};

    struct SyntheticSource {
        count: u64,
        next: u64,
    }

    impl SyntheticSource {
        fn new(count: u64) -> Self {
            Self { count, next: 1 }
        }
    }

    #[async_trait]
    impl FrameSource for SyntheticSource {
        async fn next_frame(&mut self) -> MediaResult<Option<Frame>> {
            if self.next > self.count {
                return Ok(None);
            }
            let frame = Frame {
                index: self.next,
                width: 2,
                height: 2,
                data: vec![0; Frame::rgb24_len(2, 2)],
            };
            self.next += 1;
            Ok(Some(frame))
        }

        fn width(&self) -> u32 {
            2
        }

        fn height(&self) -> u32 {
            2
        }
    }

    /// Scripted detector: one happy face per frame, failing on frames for
    /// which `fail` returns true.
    struct ScriptedDetector<F> {
        fail: F,
        calls: AtomicU64,
    }

    impl<F> ScriptedDetector<F> {
        fn new(fail: F) -> Self {
            Self {
                fail,
                calls: AtomicU64::new(0),
            }
        }
    }

    #[async_trait]
    impl<F: Fn(u64) -> bool + Send + Sync> EmotionDetector for ScriptedDetector<F> {
        async fn detect(&self, frame: &Frame) -> DetectorResult<Vec<RawDetection>> {
            self.calls.fetch_add(1, Ordering::Relaxed);
            if (self.fail)(frame.index) {
                return Err(DetectorError::RequestFailed("scripted failure".into()));
            }
            let mut emotions = BTreeMap::new();
            emotions.insert("happiness".to_string(), 0.9);
            emotions.insert("neutral".to_string(), 0.1);
            Ok(vec![RawDetection {
                bbox: None,
                emotions,
                action_units: None,
            }])
        }

        fn name(&self) -> &'static str {
            "scripted"
        }
    }

    fn config(interval: u64, mode: FaceMode) -> ProcessConfig {
        ProcessConfig {
            sampling_interval: interval,
            face_mode: mode,
        }
    }

    #[tokio::test]
    async fn test_300_frames_every_10th_yields_30_rows() {
        let detector = ScriptedDetector::new(|_| false);
        let outcome = process_frames(
            SyntheticSource::new(300),
            &detector,
            &config(10, FaceMode::Single),
        )
        .await
        .unwrap();

        assert_eq!(outcome.frames_sampled, 30);
        assert_eq!(outcome.frames_failed, 0);
        assert_eq!(outcome.table.len(), 30);
        assert!(outcome.table.rows().iter().all(|r| r.face_id == 1));
        assert_eq!(outcome.table.sampled_frames().first(), Some(&10));
        assert_eq!(outcome.table.sampled_frames().last(), Some(&300));
        // Unsampled frames never reach the detector.
        assert_eq!(detector.calls.load(Ordering::Relaxed), 30);
    }

    #[tokio::test]
    async fn test_failing_frames_are_skipped_not_fatal() {
        let detector = ScriptedDetector::new(|index| index == 20);
        let outcome = process_frames(
            SyntheticSource::new(50),
            &detector,
            &config(10, FaceMode::Single),
        )
        .await
        .unwrap();

        assert_eq!(outcome.frames_sampled, 5);
        assert_eq!(outcome.frames_failed, 1);
        assert_eq!(outcome.table.sampled_frames(), vec![10, 30, 40, 50]);
    }

    #[tokio::test]
    async fn test_all_frames_failing_is_empty_result() {
        let detector = ScriptedDetector::new(|_| true);
        let err = process_frames(
            SyntheticSource::new(50),
            &detector,
            &config(10, FaceMode::Single),
        )
        .await
        .unwrap_err();

        assert!(matches!(err, PipelineError::EmptyResult));
    }

    #[tokio::test]
    async fn test_empty_source_is_empty_result() {
        let detector = ScriptedDetector::new(|_| false);
        let err = process_frames(
            SyntheticSource::new(0),
            &detector,
            &config(1, FaceMode::Single),
        )
        .await
        .unwrap_err();

        assert!(matches!(err, PipelineError::EmptyResult));
    }

    /// Detector returning two faces per frame.
    struct TwoFaceDetector;

    #[async_trait]
    impl EmotionDetector for TwoFaceDetector {
        async fn detect(&self, _frame: &Frame) -> DetectorResult<Vec<RawDetection>> {
            let face = |emotion: &str| {
                let mut emotions = BTreeMap::new();
                emotions.insert(emotion.to_string(), 0.8);
                RawDetection {
                    bbox: None,
                    emotions,
                    action_units: None,
                }
            };
            Ok(vec![face("happiness"), face("sadness")])
        }

        fn name(&self) -> &'static str {
            "two-face"
        }
    }

    #[tokio::test]
    async fn test_multi_face_mode_appends_all_faces_in_order() {
        let outcome = process_frames(
            SyntheticSource::new(20),
            &TwoFaceDetector,
            &config(10, FaceMode::Multi),
        )
        .await
        .unwrap();

        assert_eq!(outcome.table.len(), 4);
        assert_eq!(outcome.table.face_ids(), vec![1, 2]);
    }

    #[tokio::test]
    async fn test_single_face_mode_keeps_first_face_only() {
        let outcome = process_frames(
            SyntheticSource::new(20),
            &TwoFaceDetector,
            &config(10, FaceMode::Single),
        )
        .await
        .unwrap();

        assert_eq!(outcome.table.len(), 2);
        assert_eq!(outcome.table.face_ids(), vec![1]);
    }
}
