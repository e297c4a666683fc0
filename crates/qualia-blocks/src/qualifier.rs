//! The line-at-a-time qualify state machine.
//!
//! Lines outside blocks stream straight through. Lines inside a block are
//! held until its `END` delimiter arrives, at which point the whole block is
//! commented or uncommented depending on whether its quality is active.

use std::collections::HashSet;
use std::io::{BufRead, Write};

use crate::commenter::Commenter;
use crate::error::{Error, Result};
use crate::parser::{BlockAttrs, find_block_start, trim_line_end};

/// The set of active qualities for one run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Qualities(HashSet<Vec<u8>>);

impl Qualities {
    pub fn contains(&self, quality: &[u8]) -> bool {
        self.0.contains(quality)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<S: Into<Vec<u8>>> FromIterator<S> for Qualities {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

#[derive(Debug)]
enum State {
    Idle,
    InBlock {
        attrs: BlockAttrs,
        lines: Vec<Vec<u8>>,
    },
}

/// Rewrites qualified blocks one line at a time.
#[derive(Debug)]
pub struct Qualifier {
    qualities: Qualities,
    state: State,
}

impl Qualifier {
    pub fn new(qualities: Qualities) -> Self {
        Self {
            qualities,
            state: State::Idle,
        }
    }

    /// Returns true while a block is open.
    pub fn in_block(&self) -> bool {
        matches!(self.state, State::InBlock { .. })
    }

    /// Feeds one line, without its terminator, and returns the lines that
    /// are ready to be written.
    ///
    /// Delimiter lines are always returned verbatim. Lines inside a block
    /// are held back, so this returns nothing for them until the block's
    /// `END` delimiter is fed.
    pub fn feed_line(&mut self, line: Vec<u8>) -> Vec<Vec<u8>> {
        match std::mem::replace(&mut self.state, State::Idle) {
            State::Idle => {
                if let Some(attrs) = find_block_start(&line) {
                    tracing::debug!(
                        prefix = %attrs.prefix.escape_ascii(),
                        quality = %attrs.quality.escape_ascii(),
                        "Block opened"
                    );
                    self.state = State::InBlock {
                        attrs,
                        lines: Vec::with_capacity(8),
                    };
                }
                vec![line]
            }
            State::InBlock { attrs, mut lines } if !attrs.closes(&line) => {
                lines.push(line);
                self.state = State::InBlock { attrs, lines };
                Vec::new()
            }
            State::InBlock { attrs, lines } => {
                let commenter = Commenter::new(attrs.prefix);
                let active = self.qualities.contains(&attrs.quality);
                let action = if active { "uncomment" } else { "comment" };
                tracing::debug!(
                    prefix = %commenter.marker().escape_ascii(),
                    quality = %attrs.quality.escape_ascii(),
                    lines = lines.len(),
                    action,
                    "Block closed"
                );
                let mut out = if active {
                    commenter.uncomment(lines)
                } else {
                    commenter.comment(lines)
                };
                out.push(line);
                out
            }
        }
    }

    /// Ends input, returning the still-open block and its untransformed
    /// lines, if any. The qualifier is idle afterwards.
    pub fn finish(&mut self) -> Option<(BlockAttrs, Vec<Vec<u8>>)> {
        match std::mem::replace(&mut self.state, State::Idle) {
            State::Idle => None,
            State::InBlock { attrs, lines } => Some((attrs, lines)),
        }
    }
}

/// Qualifies the lines read from `reader` and writes them to `writer`.
///
/// Input is treated as bytes, so text in any ASCII-compatible encoding
/// passes through. A trailing `\n` or `\r\n` is stripped from each line and
/// every output line is terminated with `\n`. Lines are written as soon as
/// they are resolved. If the input ends inside a block, the block's lines
/// are written unchanged and [`Error::UnclosedBlock`] is returned.
///
/// # Example
/// ```
/// use qualia_blocks::qualify;
///
/// let input = "# BEGIN laptop\n#export A=1\n# END laptop\n";
/// let mut out = Vec::new();
/// qualify(["laptop"], input.as_bytes(), &mut out).unwrap();
/// assert_eq!(String::from_utf8(out).unwrap(), "# BEGIN laptop\nexport A=1\n# END laptop\n");
/// ```
pub fn qualify<I, S, R, W>(qualities: I, mut reader: R, mut writer: W) -> Result<()>
where
    I: IntoIterator<Item = S>,
    S: Into<Vec<u8>>,
    R: BufRead,
    W: Write,
{
    let mut qualifier = Qualifier::new(qualities.into_iter().collect());
    let mut buf = Vec::new();

    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf)? == 0 {
            break;
        }
        for out in qualifier.feed_line(trim_line_end(&buf).to_vec()) {
            write_line(&mut writer, &out)?;
        }
    }

    if let Some((attrs, lines)) = qualifier.finish() {
        tracing::warn!(
            quality = %attrs.quality.escape_ascii(),
            lines = lines.len(),
            "Unclosed block at end of input"
        );
        for out in &lines {
            write_line(&mut writer, out)?;
        }
        writer.flush()?;
        return Err(Error::UnclosedBlock {
            prefix: String::from_utf8_lossy(&attrs.prefix).into_owned(),
            quality: String::from_utf8_lossy(&attrs.quality).into_owned(),
        });
    }

    writer.flush()?;
    Ok(())
}

fn write_line<W: Write>(writer: &mut W, line: &[u8]) -> std::io::Result<()> {
    writer.write_all(line)?;
    writer.write_all(b"\n")
}
