//! Raw decoded frame buffers.

/// One decoded video frame in RGB24 layout.
#[derive(Debug, Clone)]
pub struct Frame {
    /// 1-based decode ordinal of this frame within the source video.
    pub index: u64,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Packed RGB24 pixel data, `width * height * 3` bytes.
    pub data: Vec<u8>,
}

impl Frame {
    /// Byte length of one RGB24 frame at the given dimensions.
    pub fn rgb24_len(width: u32, height: u32) -> usize {
        width as usize * height as usize * 3
    }

    /// Whether the buffer length matches the declared dimensions.
    pub fn is_complete(&self) -> bool {
        self.data.len() == Self::rgb24_len(self.width, self.height)
    }
}
