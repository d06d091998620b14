//! Interval-based frame sampling.

use crate::error::{MediaError, MediaResult};
use crate::frame::Frame;
use crate::source::FrameSource;

/// Yields every k-th frame of an underlying source.
///
/// A frame is kept when its 1-based decode ordinal is divisible by the
/// sampling interval. The sequence is lazy, finite and forward-only; like
/// the sources it wraps, it cannot be restarted.
#[derive(Debug)]
pub struct FrameSampler<S> {
    source: S,
    interval: u64,
}

impl<S: FrameSource> FrameSampler<S> {
    /// Wrap a source with a sampling interval `k >= 1`.
    pub fn new(source: S, interval: u64) -> MediaResult<Self> {
        if interval == 0 {
            return Err(MediaError::InvalidInterval(interval));
        }
        Ok(Self { source, interval })
    }

    /// Next sampled frame, or `None` when the source is exhausted.
    pub async fn next_frame(&mut self) -> MediaResult<Option<Frame>> {
        while let Some(frame) = self.source.next_frame().await? {
            if frame.index % self.interval == 0 {
                return Ok(Some(frame));
            }
        }
        Ok(None)
    }

    /// The configured sampling interval.
    pub fn interval(&self) -> u64 {
        self.interval
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    /// In-memory source producing `count` tiny frames.
    #[derive(Debug)]
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

    async fn collect_indices(count: u64, interval: u64) -> Vec<u64> {
        let mut sampler = FrameSampler::new(SyntheticSource::new(count), interval).unwrap();
        let mut indices = Vec::new();
        while let Some(frame) = sampler.next_frame().await.unwrap() {
            indices.push(frame.index);
        }
        indices
    }

    #[tokio::test]
    async fn test_every_third_frame() {
        assert_eq!(collect_indices(10, 3).await, vec![3, 6, 9]);
    }

    #[tokio::test]
    async fn test_interval_one_keeps_all() {
        assert_eq!(collect_indices(4, 1).await, vec![1, 2, 3, 4]);
    }

    #[tokio::test]
    async fn test_interval_larger_than_source_yields_nothing() {
        assert_eq!(collect_indices(5, 10).await, Vec::<u64>::new());
    }

    #[test]
    fn test_zero_interval_is_rejected() {
        let err = FrameSampler::new(SyntheticSource::new(1), 0).unwrap_err();
        assert!(matches!(err, MediaError::InvalidInterval(0)));
    }
}
