use crate::constants::{BUFFER_LEN, REPORT_FRAME_LEN};

/// Configuration settings for the LD2410 driver.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Config {
    /// Number of bytes accumulated while waiting for a frame tail before the
    /// read is abandoned as corrupt. Kept between one report frame and the
    /// internal buffer size.
    pub max_frame_len: usize,
    /// A frame read gives up with `Error::Timeout` once this many reads have
    /// timed out. Zero behaves like one.
    pub max_timeouts: u8,
}

impl Config {
    /// Creates a new `Config` instance.
    ///
    /// # Arguments
    ///
    /// * `max_frame_len` - Byte limit for a single frame read.
    /// * `max_timeouts` - Timed-out reads allowed per frame read.
    pub fn new(max_frame_len: usize, max_timeouts: u8) -> Config {
        Config {
            max_frame_len: max_frame_len.clamp(REPORT_FRAME_LEN, BUFFER_LEN),
            max_timeouts,
        }
    }

    /// Sets the byte limit for a single frame read.
    pub fn max_frame_len(mut self, max_frame_len: usize) -> Self {
        self.max_frame_len = max_frame_len.clamp(REPORT_FRAME_LEN, BUFFER_LEN);
        self
    }

    /// Sets how many timed-out reads are allowed per frame read.
    pub fn max_timeouts(mut self, max_timeouts: u8) -> Self {
        self.max_timeouts = max_timeouts;
        self
    }
}

impl Default for Config {
    /// Returns the default configuration.
    ///
    /// Uses the whole internal buffer and gives up on the first timed-out read.
    fn default() -> Config {
        Config {
            max_frame_len: BUFFER_LEN,
            max_timeouts: 1,
        }
    }
}
