//! FFmpeg-backed video access for the emoscope pipeline.
//!
//! Provides:
//! - ffprobe metadata probing ([`probe_video`])
//! - a sequential raw-frame source ([`FfmpegFrameSource`])
//! - interval-based frame sampling ([`FrameSampler`])
//!
//! Video decoding is treated as a sequential frame source yielding raw RGB24
//! buffers in decode order. The source is forward-only and not restartable;
//! iterating twice requires a fresh handle.

pub mod error;
pub mod frame;
pub mod probe;
pub mod sampler;
pub mod source;

pub use error::{MediaError, MediaResult};
pub use frame::Frame;
pub use probe::{probe_video, VideoInfo};
pub use sampler::FrameSampler;
pub use source::{FfmpegFrameSource, FrameSource};
