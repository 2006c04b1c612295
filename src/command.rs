use crate::constants::{ACK_FLAG, COMMAND_HEADER, COMMAND_TAIL, STATUS_OFFSET};
use crate::error::Error;

/// A command frame sent to the radar.
///
/// Wire layout: `FD FC FB FA | length | command word | value | 04 03 02 01`,
/// where `length` counts the command word and value bytes. All words are
/// little-endian.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandFrame<'a> {
    pub length: u16,
    pub command_word: u16,
    pub value: &'a [u8],
}

impl<'a> CommandFrame<'a> {
    pub fn new(command_word: u16, value: &'a [u8]) -> Self {
        Self {
            length: u16::try_from(2 + value.len()).unwrap_or(u16::MAX),
            command_word,
            value,
        }
    }

    /// Total number of bytes of the encoded frame.
    pub fn encoded_len(&self) -> usize {
        COMMAND_HEADER.len() + 2 + 2 + self.value.len() + COMMAND_TAIL.len()
    }

    /// Writes the frame into `buf` and returns the number of bytes written.
    ///
    /// Fails with `Error::BufferOverflow` when `buf` is too small or the value
    /// does not fit the 16-bit length field.
    pub fn encode(&self, buf: &mut [u8]) -> Result<usize, Error> {
        let length = u16::try_from(2 + self.value.len()).map_err(|_| Error::BufferOverflow)?;
        let len = self.encoded_len();
        if buf.len() < len || length != self.length {
            return Err(Error::BufferOverflow);
        }

        let value_start = COMMAND_HEADER.len() + 4;
        let tail_start = value_start + self.value.len();
        buf[..4].copy_from_slice(&COMMAND_HEADER);
        buf[4..6].copy_from_slice(&self.length.to_le_bytes());
        buf[6..8].copy_from_slice(&self.command_word.to_le_bytes());
        buf[value_start..tail_start].copy_from_slice(self.value);
        buf[tail_start..len].copy_from_slice(&COMMAND_TAIL);
        Ok(len)
    }
}

/// Why a command exchange did not succeed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureReason {
    /// The radar answered with a status code outside the accepted set.
    Code(u16),
    /// The reply is too short to carry a status field.
    TruncatedResponse,
    /// No reply tail arrived before the read timed out.
    Timeout,
}

/// Outcome of a command exchange.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseStatus {
    Success,
    Failure(FailureReason),
}

impl ResponseStatus {
    pub fn is_success(&self) -> bool {
        matches!(self, ResponseStatus::Success)
    }
}

impl From<ResponseStatus> for Result<(), Error> {
    fn from(status: ResponseStatus) -> Self {
        match status {
            ResponseStatus::Success => Ok(()),
            ResponseStatus::Failure(FailureReason::Code(code)) => Err(Error::CommandFailed(code)),
            ResponseStatus::Failure(FailureReason::TruncatedResponse) => {
                Err(Error::TruncatedResponse)
            }
            ResponseStatus::Failure(FailureReason::Timeout) => Err(Error::Timeout),
        }
    }
}

/// Reads the little-endian status word at bytes 8..10 of a reply and checks
/// it against `accepted`.
pub fn decode_status(response: &[u8], accepted: &[u16]) -> ResponseStatus {
    match status_code(response) {
        Some(code) if accepted.contains(&code) => ResponseStatus::Success,
        Some(code) => ResponseStatus::Failure(FailureReason::Code(code)),
        None => ResponseStatus::Failure(FailureReason::TruncatedResponse),
    }
}

/// Raw status word of a reply, if present.
pub fn status_code(response: &[u8]) -> Option<u16> {
    response
        .get(STATUS_OFFSET..STATUS_OFFSET + 2)
        .map(|bytes| u16::from_le_bytes([bytes[0], bytes[1]]))
}

/// Command word echoed by a reply, bytes 6..8.
pub fn ack_word(response: &[u8]) -> Option<u16> {
    response
        .get(6..8)
        .map(|bytes| u16::from_le_bytes([bytes[0], bytes[1]]))
}

/// Command word a reply to `command_word` is expected to carry.
pub fn expected_ack(command_word: u16) -> u16 {
    command_word | ACK_FLAG
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::{
        CMD_ENABLE_CONFIG, CMD_END_CONFIG, DEFAULT_ACCEPTED, ENABLE_CONFIG_ACCEPTED,
        ENABLE_CONFIG_VALUE,
    };
    use crate::frame::FrameKind;

    fn encode(word: u16, value: &[u8]) -> Vec<u8> {
        let frame = CommandFrame::new(word, value);
        let mut buf = vec![0u8; frame.encoded_len()];
        let len = frame.encode(&mut buf).unwrap();
        assert_eq!(len, buf.len());
        buf
    }

    fn reply(word: u16, status: u16) -> Vec<u8> {
        let mut buf = Vec::new();
        buf.extend_from_slice(&COMMAND_HEADER);
        buf.extend_from_slice(&4u16.to_le_bytes());
        buf.extend_from_slice(&expected_ack(word).to_le_bytes());
        buf.extend_from_slice(&status.to_le_bytes());
        buf.extend_from_slice(&COMMAND_TAIL);
        buf
    }

    #[test]
    fn encodes_enable_config() {
        assert_eq!(
            encode(CMD_ENABLE_CONFIG, &ENABLE_CONFIG_VALUE),
            [0xFD, 0xFC, 0xFB, 0xFA, 0x04, 0x00, 0xFF, 0x00, 0x01, 0x00, 0x04, 0x03, 0x02, 0x01]
        );
    }

    #[test]
    fn encodes_end_config() {
        assert_eq!(
            encode(CMD_END_CONFIG, &[]),
            [0xFD, 0xFC, 0xFB, 0xFA, 0x02, 0x00, 0xFE, 0x00, 0x04, 0x03, 0x02, 0x01]
        );
    }

    #[test]
    fn extracting_encoded_frame_recovers_word_and_value() {
        let value = [0x10, 0x20, 0x30];
        let bytes = encode(0x0064, &value);
        let data = FrameKind::Command.extract(&bytes).unwrap();
        assert_eq!(u16::from_le_bytes([data[0], data[1]]), 5);
        assert_eq!(&data[2..], &[0x64, 0x00, 0x10, 0x20, 0x30]);
    }

    #[test]
    fn encode_into_small_buffer_overflows() {
        let mut buf = [0u8; 11];
        assert_eq!(
            CommandFrame::new(CMD_END_CONFIG, &[]).encode(&mut buf),
            Err(Error::BufferOverflow)
        );
    }

    #[test]
    fn value_too_long_for_length_field_overflows() {
        let value = vec![0u8; u16::MAX as usize - 1];
        let frame = CommandFrame::new(0x0064, &value);
        assert_eq!(frame.length, u16::MAX);
        let mut buf = vec![0u8; frame.encoded_len()];
        assert_eq!(frame.encode(&mut buf), Err(Error::BufferOverflow));

        let value = vec![0u8; u16::MAX as usize - 2];
        let frame = CommandFrame::new(0x0064, &value);
        let mut buf = vec![0u8; frame.encoded_len()];
        assert_eq!(frame.encode(&mut buf), Ok(buf.len()));
        assert_eq!(&buf[4..6], &[0xFF, 0xFF]);
    }

    #[test]
    fn status_success_only_for_accepted_codes() {
        for code in [0u16, 1, 128, 0x0100, 32896, 32928, u16::MAX] {
            let response = reply(CMD_END_CONFIG, code);
            let expected = if DEFAULT_ACCEPTED.contains(&code) {
                ResponseStatus::Success
            } else {
                ResponseStatus::Failure(FailureReason::Code(code))
            };
            assert_eq!(decode_status(&response, &DEFAULT_ACCEPTED), expected);
        }
    }

    #[test]
    fn enable_config_accepts_widened_set() {
        for code in ENABLE_CONFIG_ACCEPTED {
            let response = reply(CMD_ENABLE_CONFIG, code);
            assert!(decode_status(&response, &ENABLE_CONFIG_ACCEPTED).is_success());
        }
        let response = reply(CMD_ENABLE_CONFIG, 0x0001);
        assert_eq!(
            decode_status(&response, &ENABLE_CONFIG_ACCEPTED),
            ResponseStatus::Failure(FailureReason::Code(1))
        );
    }

    #[test]
    fn short_response_is_truncated() {
        let truncated = ResponseStatus::Failure(FailureReason::TruncatedResponse);
        assert_eq!(decode_status(&[], &DEFAULT_ACCEPTED), truncated);
        assert_eq!(decode_status(&[0u8; 9], &DEFAULT_ACCEPTED), truncated);
        assert!(decode_status(&[0u8; 10], &DEFAULT_ACCEPTED).is_success());
    }

    #[test]
    fn status_converts_to_result() {
        let ok: Result<(), Error> = ResponseStatus::Success.into();
        assert_eq!(ok, Ok(()));
        let failed: Result<(), Error> = ResponseStatus::Failure(FailureReason::Code(7)).into();
        assert_eq!(failed, Err(Error::CommandFailed(7)));
        let timeout: Result<(), Error> = ResponseStatus::Failure(FailureReason::Timeout).into();
        assert_eq!(timeout, Err(Error::Timeout));
    }

    #[test]
    fn reads_ack_word() {
        let response = reply(CMD_END_CONFIG, 0);
        assert_eq!(ack_word(&response), Some(0x01FE));
        assert_eq!(ack_word(&response[..7]), None);
    }
}
