//! Command-line arguments.

use std::path::PathBuf;

use clap::Parser;

/// Batch emotion time-series analysis over a video file.
#[derive(Debug, Parser)]
#[command(name = "emoscope", version, about)]
pub struct Args {
    /// Path to the input video file
    pub video_path: PathBuf,

    /// Keep every k-th frame of the video
    #[arg(long, default_value_t = 10)]
    pub sampling_rate: u64,

    /// Where to write the emotion table CSV (default: <output-dir>/emotions.csv)
    #[arg(long)]
    pub output_csv: Option<PathBuf>,

    /// First frame of the analysis window (inclusive)
    #[arg(long)]
    pub start_frame: Option<u64>,

    /// Last frame of the analysis window (inclusive)
    #[arg(long)]
    pub end_frame: Option<u64>,

    /// Frame rate used for the seconds axis
    #[arg(long, default_value_t = 30.0)]
    pub fps: f64,

    /// Projection method for the cluster chart: tsne or umap
    #[arg(long)]
    pub method: Option<String>,

    /// t-SNE perplexity override
    #[arg(long)]
    pub perplexity: Option<f64>,

    /// UMAP neighbor-count override
    #[arg(long)]
    pub n_neighbors: Option<usize>,

    /// Explicit frame-index stride for clustering input
    #[arg(long)]
    pub cluster_stride: Option<u64>,

    /// Keep every detected face instead of only the first
    #[arg(long)]
    pub multi_face: bool,

    /// Directory receiving the CSV, chart artifacts and report
    #[arg(long, default_value = "emoscope_out")]
    pub output_dir: PathBuf,
}
