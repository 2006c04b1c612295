// REPORT_HEADER marks the beginning of a target report frame sent by the radar.
pub const REPORT_HEADER: [u8; 4] = [0xF4, 0xF3, 0xF2, 0xF1];

// REPORT_TAIL marks the end of a target report frame.
pub const REPORT_TAIL: [u8; 4] = [0xF8, 0xF7, 0xF6, 0xF5];

// COMMAND_HEADER marks the beginning of a command frame or of its reply.
pub const COMMAND_HEADER: [u8; 4] = [0xFD, 0xFC, 0xFB, 0xFA];

// COMMAND_TAIL marks the end of a command frame or of its reply.
pub const COMMAND_TAIL: [u8; 4] = [0x04, 0x03, 0x02, 0x01];

// Report frame data layout: 2-byte length, data type and 0xAA head precede the
// target payload, then a 0x55 tail and a check byte follow it.
pub const REPORT_PREFIX_LEN: usize = 4;
pub const REPORT_SUFFIX_LEN: usize = 2;
pub const REPORT_PAYLOAD_LEN: usize = 9;

// Encoded size of a basic report frame: header, prefix, payload, suffix, tail.
pub const REPORT_FRAME_LEN: usize =
    4 + REPORT_PREFIX_LEN + REPORT_PAYLOAD_LEN + REPORT_SUFFIX_LEN + 4;

// Offset of the little-endian status word in a reply, counted from the first
// header byte: header(4) + length(2) + ack word(2).
pub const STATUS_OFFSET: usize = 8;

// Replies echo the command word with this bit set.
pub const ACK_FLAG: u16 = 0x0100;

pub const CMD_ENABLE_CONFIG: u16 = 0x00FF;
pub const CMD_END_CONFIG: u16 = 0x00FE;
pub const CMD_READ_CONFIG: u16 = 0x0061;
pub const CMD_ENABLE_ENGINEERING: u16 = 0x0062;
pub const CMD_DISABLE_ENGINEERING: u16 = 0x0063;

// Value sent along with CMD_ENABLE_CONFIG, little-endian 0x0001.
pub const ENABLE_CONFIG_VALUE: [u8; 2] = [0x01, 0x00];

// Status codes the radar has been seen to return when entering configuration
// mode successfully. No documented meaning, keep as is.
pub const ENABLE_CONFIG_ACCEPTED: [u16; 4] = [0, 128, 32896, 32928];

// Status codes accepted for every other command.
pub const DEFAULT_ACCEPTED: [u16; 1] = [0];

// Size of the internal frame buffer. Basic report frames are 23 bytes and
// configuration replies stay well below this.
pub const BUFFER_LEN: usize = 64;
