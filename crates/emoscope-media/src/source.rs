//! Sequential frame sources.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::io::AsyncReadExt;
use tokio::process::{Child, ChildStdout, Command};
use tracing::debug;

use crate::error::{MediaError, MediaResult};
use crate::frame::Frame;
use crate::probe::probe_video;

/// A forward-only sequence of decoded frames.
///
/// Implementations yield frames in decode order with 1-based indices and are
/// not restartable.
#[async_trait]
pub trait FrameSource: Send {
    /// Next frame in decode order, or `None` at end of stream.
    async fn next_frame(&mut self) -> MediaResult<Option<Frame>>;

    /// Frame width in pixels.
    fn width(&self) -> u32;

    /// Frame height in pixels.
    fn height(&self) -> u32;
}

/// Frame source decoding a video file through the FFmpeg CLI.
///
/// Spawns ffmpeg writing rawvideo RGB24 to stdout and reads one fixed-size
/// frame per call.
#[derive(Debug)]
pub struct FfmpegFrameSource {
    path: PathBuf,
    child: Child,
    stdout: ChildStdout,
    width: u32,
    height: u32,
    next_index: u64,
    finished: bool,
}

impl FfmpegFrameSource {
    /// Open a video file for sequential decoding.
    ///
    /// Fails with [`MediaError::SourceUnavailable`] when the file is missing
    /// or carries no decodable video stream.
    pub async fn open(path: impl AsRef<Path>) -> MediaResult<Self> {
        let path = path.as_ref();

        which::which("ffmpeg").map_err(|_| MediaError::FfmpegNotFound)?;

        let info = probe_video(path).await.map_err(|e| match e {
            MediaError::SourceUnavailable { .. } | MediaError::FfprobeNotFound => e,
            other => MediaError::source_unavailable(path, other.to_string()),
        })?;

        if info.width == 0 || info.height == 0 {
            return Err(MediaError::source_unavailable(
                path,
                "video stream has no dimensions",
            ));
        }

        let mut child = Command::new("ffmpeg")
            .args(["-v", "error", "-nostdin", "-i"])
            .arg(path)
            .args(["-f", "rawvideo", "-pix_fmt", "rgb24", "-"])
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| MediaError::source_unavailable(path, e.to_string()))?;

        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| MediaError::source_unavailable(path, "no stdout from ffmpeg"))?;

        debug!(
            path = %path.display(),
            width = info.width,
            height = info.height,
            fps = info.fps,
            "opened ffmpeg frame source"
        );

        Ok(Self {
            path: path.to_path_buf(),
            child,
            stdout,
            width: info.width,
            height: info.height,
            next_index: 1,
            finished: false,
        })
    }

    /// Read exactly one frame worth of bytes. Returns the number of bytes
    /// read; 0 means clean end of stream.
    async fn fill_frame(&mut self, buf: &mut [u8]) -> MediaResult<usize> {
        let mut read = 0;
        while read < buf.len() {
            let n = self.stdout.read(&mut buf[read..]).await?;
            if n == 0 {
                break;
            }
            read += n;
        }
        Ok(read)
    }
}

#[async_trait]
impl FrameSource for FfmpegFrameSource {
    async fn next_frame(&mut self) -> MediaResult<Option<Frame>> {
        if self.finished {
            return Ok(None);
        }

        let expected = Frame::rgb24_len(self.width, self.height);
        let mut data = vec![0u8; expected];
        let got = self.fill_frame(&mut data).await?;

        if got == 0 {
            self.finished = true;
            // Reap the decoder; a non-zero exit after frames were delivered
            // only means trailing stream damage, which the sampler tolerates.
            let status = self.child.wait().await?;
            debug!(path = %self.path.display(), ?status, "ffmpeg frame source drained");
            return Ok(None);
        }

        if got < expected {
            self.finished = true;
            return Err(MediaError::TruncatedFrame {
                index: self.next_index,
                expected,
                got,
            });
        }

        let frame = Frame {
            index: self.next_index,
            width: self.width,
            height: self.height,
            data,
        };
        self.next_index += 1;
        Ok(Some(frame))
    }

    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }
}
