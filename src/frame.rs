use crate::constants::{COMMAND_HEADER, COMMAND_TAIL, REPORT_HEADER, REPORT_TAIL};

/// The two frame families spoken by the radar, told apart by their delimiters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameKind {
    /// Target report streamed by the radar.
    Report,
    /// Command sent to the radar, or its reply.
    Command,
}

impl FrameKind {
    /// Returns the `(header, tail)` delimiter pair of this frame kind.
    pub fn delimiters(self) -> (&'static [u8; 4], &'static [u8; 4]) {
        match self {
            FrameKind::Report => (&REPORT_HEADER, &REPORT_TAIL),
            FrameKind::Command => (&COMMAND_HEADER, &COMMAND_TAIL),
        }
    }

    /// Returns the bytes between this kind's delimiters in `buf`, if any.
    pub fn extract(self, buf: &[u8]) -> Option<&[u8]> {
        let (header, tail) = self.delimiters();
        extract_frame(buf, header, tail)
    }

    /// Classifies the first complete frame found in `buf`.
    ///
    /// When both kinds are present the one whose header comes first wins.
    pub fn classify(buf: &[u8]) -> Option<FrameKind> {
        let start = |kind: FrameKind| {
            let (header, tail) = kind.delimiters();
            let head_idx = find(buf, header)?;
            find(&buf[head_idx + header.len()..], tail).map(|_| head_idx)
        };

        match (start(FrameKind::Report), start(FrameKind::Command)) {
            (Some(report), Some(command)) if command < report => Some(FrameKind::Command),
            (Some(_), _) => Some(FrameKind::Report),
            (None, Some(_)) => Some(FrameKind::Command),
            (None, None) => None,
        }
    }
}

/// Returns the bytes strictly between the first `header` in `buf` and the
/// first `tail` that follows it.
///
/// `None` is a normal outcome for truncated or interleaved reads: no header,
/// or no tail after the header. A tail that only appears before the header
/// belongs to an earlier partial frame and is ignored.
///
/// Tail bytes that happen to occur inside the payload cut the frame short;
/// the protocol has nothing to tell them apart from a real tail.
pub fn extract_frame<'a>(buf: &'a [u8], header: &[u8], tail: &[u8]) -> Option<&'a [u8]> {
    let start = find(buf, header)? + header.len();
    let rest = &buf[start..];
    let end = find(rest, tail)?;
    Some(&rest[..end])
}

// Position of the first occurrence of `needle` in `haystack`.
pub(crate) fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    if needle.is_empty() || haystack.len() < needle.len() {
        return None;
    }
    haystack
        .windows(needle.len())
        .position(|window| window == needle)
}
