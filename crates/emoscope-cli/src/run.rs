//! End-to-end run orchestration.
//!
//! Ingest the video, persist the table, then fan analytics out per face:
//! trend and heatmap over the whole table, dominant-share, radar and cluster
//! over the resolved window. Every recoverable condition degrades to fewer
//! artifacts; only ingestion failures abort the run.

use std::fs;

use anyhow::Context;
use tracing::{info, warn};

use emoscope_analytics::{
    charts, downsample, fan_out, project, resolve_range, Projection, ProjectorOptions, Resolution,
};
use emoscope_detector::{DetectorConfig, FaceMode, HttpDetector};
use emoscope_models::TimeSeriesTable;
use emoscope_pipeline::{process_video, ProcessConfig};

use crate::args::Args;
use crate::report::{write_artifact, write_report, Artifact, RunSummary};

const DEFAULT_FPS: f64 = 30.0;

pub async fn run(args: Args) -> anyhow::Result<()> {
    let fps = if args.fps > 0.0 && args.fps.is_finite() {
        args.fps
    } else {
        warn!(supplied = args.fps, "invalid fps, using default");
        DEFAULT_FPS
    };

    fs::create_dir_all(&args.output_dir)
        .with_context(|| format!("creating {}", args.output_dir.display()))?;

    let detector = HttpDetector::new(DetectorConfig::from_env().with_multi_face(args.multi_face))?;
    if !detector.health_check().await? {
        warn!("detector health check failed, proceeding anyway");
    }

    let config = ProcessConfig {
        sampling_interval: args.sampling_rate,
        face_mode: if args.multi_face {
            FaceMode::Multi
        } else {
            FaceMode::Single
        },
    };
    let outcome = process_video(&args.video_path, &detector, &config).await?;
    let table = &outcome.table;

    let csv_path = args
        .output_csv
        .clone()
        .unwrap_or_else(|| args.output_dir.join("emotions.csv"));
    table.write_csv(&csv_path, Some(fps))?;
    info!(path = %csv_path.display(), rows = table.len(), "wrote emotion table");

    let artifacts = write_chart_artifacts(&args, table, fps)?;

    let summary = RunSummary {
        video: args.video_path.display().to_string(),
        rows: table.len(),
        faces: table.face_ids().len(),
        frames_sampled: outcome.frames_sampled,
        frames_failed: outcome.frames_failed,
        csv_file: csv_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| csv_path.display().to_string()),
    };
    let report_path = write_report(&args.output_dir, &summary, &artifacts)?;

    info!(
        report = %report_path.display(),
        artifacts = artifacts.len(),
        "analysis complete"
    );
    Ok(())
}

/// Write every chart artifact the table supports into the output directory.
///
/// Each artifact carries the face id of the unit it was computed from, even
/// when the table holds a single face: the table always carries face ids, so
/// the artifact names always do too.
fn write_chart_artifacts(
    args: &Args,
    table: &TimeSeriesTable,
    fps: f64,
) -> anyhow::Result<Vec<Artifact>> {
    let mut artifacts: Vec<Artifact> = Vec::new();

    // Whole-table charts.
    let all_rows = table.all_rows();
    for unit in fan_out(&all_rows) {
        let face = Some(unit.face_id);
        if let Some(data) = charts::trend(&unit.rows, fps, face) {
            artifacts.push(write_artifact(&args.output_dir, "trend", &data.title, face, &data)?);
        }
        if let Some(data) = charts::heatmap(&unit.rows, fps, face) {
            artifacts.push(write_artifact(&args.output_dir, "heatmap", &data.title, face, &data)?);
        }
    }

    // Window-scoped charts.
    match resolve_range(&table.sampled_frames(), args.start_frame, args.end_frame) {
        Resolution::EmptyWindow => {
            warn!(
                start = ?args.start_frame,
                end = ?args.end_frame,
                "requested window holds no sampled frames, skipping window charts"
            );
        }
        Resolution::Window(range) => {
            info!(start = range.start, end = range.end, "resolved analysis window");
            let window_rows = table.window(range);
            for unit in fan_out(&window_rows) {
                let face = Some(unit.face_id);

                if let Some(data) = charts::dominant_share(&unit.rows, face) {
                    artifacts.push(write_artifact(
                        &args.output_dir,
                        "dominant_share",
                        &data.title,
                        face,
                        &data,
                    )?);
                }
                if let Some(data) = charts::radar(&unit.rows, face) {
                    artifacts.push(write_artifact(
                        &args.output_dir,
                        "radar",
                        &data.title,
                        face,
                        &data,
                    )?);
                }

                let subset = downsample(&unit.rows, args.cluster_stride);
                let opts = ProjectorOptions {
                    method: args.method.clone(),
                    perplexity: args.perplexity,
                    n_neighbors: args.n_neighbors,
                    umap_available: true,
                };
                match project(&subset, &opts) {
                    Projection::Embedded(result) => {
                        let data = charts::cluster(&subset, &result, face);
                        artifacts.push(write_artifact(
                            &args.output_dir,
                            "cluster",
                            &data.title,
                            face,
                            &data,
                        )?);
                    }
                    Projection::Degenerate { n_samples } => {
                        warn!(
                            face_id = unit.face_id,
                            n_samples, "too few samples for clustering, skipping cluster chart"
                        );
                    }
                    Projection::NoEmotionData => {
                        warn!(
                            face_id = unit.face_id,
                            "no emotion data in window, skipping cluster chart"
                        );
                    }
                }
            }
        }
    }

    Ok(artifacts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    use emoscope_models::{EmotionCategory, EmotionScores, FaceObservation, TableBuilder};

    fn one_face_table() -> TimeSeriesTable {
        let mut builder = TableBuilder::new();
        for frame in (1..=8u64).map(|i| i * 10) {
            let scores: EmotionScores = [
                (EmotionCategory::Happiness, 0.5 + (frame % 3) as f64 * 0.1),
                (EmotionCategory::Neutral, 0.2),
            ]
            .into_iter()
            .collect();
            builder.push(FaceObservation::new(frame, 1, scores)).unwrap();
        }
        builder.freeze().unwrap()
    }

    fn args_for(dir: &std::path::Path) -> Args {
        Args::parse_from([
            "emoscope",
            "clip.mp4",
            "--output-dir",
            dir.to_str().unwrap(),
        ])
    }

    #[test]
    fn test_single_face_artifacts_keep_face_suffix() {
        let dir = tempfile::tempdir().unwrap();
        let table = one_face_table();
        let artifacts = write_chart_artifacts(&args_for(dir.path()), &table, 30.0).unwrap();

        // The table carries face ids, so the artifacts do too.
        assert!(dir.path().join("trend_face1.json").exists());
        assert!(dir.path().join("heatmap_face1.json").exists());
        assert!(dir.path().join("dominant_share_face1.json").exists());
        assert!(!dir.path().join("trend.json").exists());
        assert!(artifacts.iter().all(|a| a.file.ends_with("_face1.json")));
        assert!(artifacts.iter().all(|a| a.title.contains("Face 1")));
    }

    #[test]
    fn test_two_face_table_writes_per_face_artifacts() {
        let dir = tempfile::tempdir().unwrap();
        let mut builder = TableBuilder::new();
        for frame in (1..=4u64).map(|i| i * 10) {
            let scores: EmotionScores = [(EmotionCategory::Fear, 0.6)].into_iter().collect();
            builder.push(FaceObservation::new(frame, 1, scores.clone())).unwrap();
            builder.push(FaceObservation::new(frame, 2, scores)).unwrap();
        }
        let table = builder.freeze().unwrap();
        write_chart_artifacts(&args_for(dir.path()), &table, 30.0).unwrap();

        assert!(dir.path().join("trend_face1.json").exists());
        assert!(dir.path().join("trend_face2.json").exists());
    }
}
