use super::{Progress, Status, Transform};

/// Line-ending convention a [`LineEndingSwitch`] has committed to produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineEnding {
    /// Unix `\n`
    Lf,
    /// Windows `\r\n`
    Crlf,
}

/// Converts text to the other platform's line endings.
///
/// The first line break seen decides the direction for the rest of the
/// stream: a CRLF commits to [`LineEnding::Lf`] (every CRLF becomes LF, lone
/// CR bytes are kept), a lone LF commits to [`LineEnding::Crlf`] (every LF
/// becomes CRLF). Until then bytes pass through unchanged.
///
/// A CR at the end of one buffer is held until the next byte arrives, so a
/// CRLF split across reads is still recognised. At end of stream a held CR
/// is emitted as is.
#[derive(Debug, Clone, Default)]
pub struct LineEndingSwitch {
    target: Option<LineEnding>,
    pending_cr: bool,
}

impl LineEndingSwitch {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The convention being produced, once the first line break was seen.
    #[must_use]
    pub const fn target(&self) -> Option<LineEnding> {
        self.target
    }
}

impl Transform for LineEndingSwitch {
    fn transform(&mut self, dst: &mut [u8], src: &[u8], at_eof: bool) -> Progress {
        let mut consumed = 0;
        let mut produced = 0;

        while consumed < src.len() {
            let byte = src[consumed];

            if self.pending_cr {
                if produced == dst.len() {
                    return Progress::new(consumed, produced, Status::ShortDestination);
                }
                self.pending_cr = false;
                if byte == b'\n' {
                    self.target = Some(LineEnding::Lf);
                    dst[produced] = b'\n';
                    produced += 1;
                    consumed += 1;
                } else {
                    // lone CR; `byte` is handled on the next pass
                    dst[produced] = b'\r';
                    produced += 1;
                }
                continue;
            }

            match (self.target, byte) {
                (None | Some(LineEnding::Crlf), b'\n') => {
                    if dst.len() - produced < 2 {
                        return Progress::new(consumed, produced, Status::ShortDestination);
                    }
                    self.target = Some(LineEnding::Crlf);
                    dst[produced] = b'\r';
                    dst[produced + 1] = b'\n';
                    produced += 2;
                }
                (None | Some(LineEnding::Lf), b'\r') => self.pending_cr = true,
                _ => {
                    if produced == dst.len() {
                        return Progress::new(consumed, produced, Status::ShortDestination);
                    }
                    dst[produced] = byte;
                    produced += 1;
                }
            }
            consumed += 1;
        }

        if at_eof && self.pending_cr {
            if produced == dst.len() {
                return Progress::new(consumed, produced, Status::ShortDestination);
            }
            dst[produced] = b'\r';
            produced += 1;
            self.pending_cr = false;
        }

        Progress::new(consumed, produced, Status::Done)
    }

    fn reset(&mut self) {
        self.target = None;
        self.pending_cr = false;
    }
}
