use super::{Progress, Status, Transform};

/// Whether a byte is dropped by [`StripWhitespace`].
#[must_use]
pub const fn is_whitespace(byte: u8) -> bool {
    matches!(byte, b'\t' | b'\r' | b'\n' | b' ')
}

/// Removes every tab, carriage-return, line-feed and space byte.
///
/// Classification is per byte, so buffer boundaries never matter.
#[derive(Debug, Clone, Copy, Default)]
pub struct StripWhitespace;

impl Transform for StripWhitespace {
    fn transform(&mut self, dst: &mut [u8], src: &[u8], _at_eof: bool) -> Progress {
        let mut produced = 0;
        for (consumed, &byte) in src.iter().enumerate() {
            if is_whitespace(byte) {
                continue;
            }
            if produced == dst.len() {
                return Progress::new(consumed, produced, Status::ShortDestination);
            }
            dst[produced] = byte;
            produced += 1;
        }
        Progress::new(src.len(), produced, Status::Done)
    }

    fn reset(&mut self) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transform::transform_bytes;

    #[test]
    fn test_strips_all_whitespace_kinds() {
        let out = transform_bytes(StripWhitespace, b" a\tb\r\nc \n d ");
        assert_eq!(out, b"abcd");
    }

    #[test]
    fn test_keeps_other_control_bytes() {
        let out = transform_bytes(StripWhitespace, b"a\x0bb\x0cc\0");
        assert_eq!(out, b"a\x0bb\x0cc\0");
    }

    #[test]
    fn test_short_destination_reports_position() {
        let mut dst = [0u8; 2];
        let progress = StripWhitespace.transform(&mut dst, b"a b c", false);
        assert_eq!(progress.status, Status::ShortDestination);
        assert_eq!(progress.produced, 2);
        // stops on 'c', after consuming "a b "
        assert_eq!(progress.consumed, 4);
        assert_eq!(&dst, b"ab");
    }

    #[test]
    fn test_all_whitespace_fits_empty_destination() {
        let progress = StripWhitespace.transform(&mut [], b" \t\r\n", false);
        assert_eq!(progress, Progress::new(4, 0, Status::Done));
    }
}
