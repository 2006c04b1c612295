use crate::constants::{REPORT_PAYLOAD_LEN, REPORT_PREFIX_LEN, REPORT_SUFFIX_LEN};
use crate::error::Error;
use crate::frame::FrameKind;

/// Target state reported in the first payload byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetState {
    NoTarget,
    MovingTarget,
    StaticTarget,
    BothTargets,
    /// Any state byte outside `0x00..=0x03`.
    Unknown,
}

impl From<u8> for TargetState {
    fn from(value: u8) -> Self {
        match value {
            0x00 => TargetState::NoTarget,
            0x01 => TargetState::MovingTarget,
            0x02 => TargetState::StaticTarget,
            0x03 => TargetState::BothTargets,
            _ => TargetState::Unknown,
        }
    }
}

/// A single basic-mode target report decoded from the radar stream.
///
/// Distances are in centimeters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TargetReport {
    pub target_state: TargetState,
    pub moving_target_distance: u16,
    pub moving_target_energy: u8,
    pub static_target_distance: u16,
    pub static_target_energy: u8,
    /// Detection distance, the primary measurement.
    pub distance: u16,
}

impl TargetReport {
    /// Decodes the bytes found between the report header and tail.
    ///
    /// The 4-byte prefix (length, data type, head marker) and the 2 trailing
    /// bytes are skipped; what remains must be exactly the 9-byte target
    /// payload, otherwise `Error::CorruptFrame` is returned.
    pub fn from_frame_data(data: &[u8]) -> Result<TargetReport, Error> {
        if data.len() < REPORT_PREFIX_LEN + REPORT_SUFFIX_LEN {
            return Err(Error::CorruptFrame);
        }
        Self::from_payload(&data[REPORT_PREFIX_LEN..data.len() - REPORT_SUFFIX_LEN])
    }

    /// Decodes the 9-byte target payload.
    pub fn from_payload(payload: &[u8]) -> Result<TargetReport, Error> {
        if payload.len() != REPORT_PAYLOAD_LEN {
            return Err(Error::CorruptFrame);
        }

        Ok(TargetReport {
            target_state: TargetState::from(payload[0]),
            moving_target_distance: sign_magnitude([payload[1], payload[2]]),
            moving_target_energy: payload[3],
            static_target_distance: sign_magnitude([payload[4], payload[5]]),
            static_target_energy: payload[6],
            distance: sign_magnitude([payload[7], payload[8]]),
        })
    }

    /// True when the radar sees any target.
    pub fn presence(&self) -> bool {
        !matches!(
            self.target_state,
            TargetState::NoTarget | TargetState::Unknown
        )
    }
}

/// Decodes a raw buffer that ends with a report tail, as read from the wire.
pub fn parse_report(buf: &[u8]) -> Result<TargetReport, Error> {
    let data = FrameKind::Report.extract(buf).ok_or(Error::CorruptFrame)?;
    TargetReport::from_frame_data(data)
}

/// Magnitude of a little-endian 16-bit sign-magnitude field.
///
/// Bit 15 is the sign flag and is dropped. Reading the same bytes as a
/// two's-complement `x` gives the same result as `x` for `x >= 0` and
/// `|-32768 - x|` otherwise.
pub fn sign_magnitude(bytes: [u8; 2]) -> u16 {
    u16::from_le_bytes(bytes) & 0x7FFF
}
