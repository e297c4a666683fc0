//! Delimiter recognition for qualified blocks.
//!
//! Blocks are fenced by a pair of delimiter lines:
//! ```text
//! # BEGIN laptop
//! content here
//! # END laptop
//! ```
//!
//! The token before the keyword is the block's comment prefix and the token
//! after it is the block's quality. An `END` line closes a block only when
//! both tokens equal those of the `BEGIN` line.

use regex::bytes::Regex;
use std::sync::LazyLock;

use crate::commenter::Commenter;

/// Regex for matching block opening delimiters.
/// Whitespace is the ASCII set `[\t\n\f\r ]`; tokens are any other bytes.
static BEGIN_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?-u)^[\t\n\f\r ]*([^\t\n\f\r ]+)[\t\n\f\r ]*BEGIN[\t\n\f\r ]+([^\t\n\f\r ]+)")
        .expect("Invalid BEGIN regex")
});

/// Regex for matching block closing delimiters.
static END_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?-u)^[\t\n\f\r ]*([^\t\n\f\r ]+)[\t\n\f\r ]*END[\t\n\f\r ]+([^\t\n\f\r ]+)")
        .expect("Invalid END regex")
});

/// Attributes captured from a `BEGIN` delimiter line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockAttrs {
    /// The comment prefix, e.g. `#` in `# BEGIN laptop`.
    pub prefix: Vec<u8>,
    /// The quality, e.g. `laptop` in `# BEGIN laptop`.
    pub quality: Vec<u8>,
}

impl BlockAttrs {
    /// Returns true if `line` is the `END` delimiter for this block.
    ///
    /// Both the prefix and the quality must match exactly; any other
    /// `END`-shaped line is ordinary block content.
    pub fn closes(&self, line: &[u8]) -> bool {
        END_REGEX
            .captures(line)
            .is_some_and(|caps| caps[1] == *self.prefix && caps[2] == *self.quality)
    }
}

/// Parses a `BEGIN` delimiter line.
///
/// Anything after the quality token is ignored.
///
/// # Example
/// ```
/// use qualia_blocks::parser::find_block_start;
///
/// let attrs = find_block_start(b"  #BEGIN laptop extra words").unwrap();
/// assert_eq!(attrs.prefix, b"#");
/// assert_eq!(attrs.quality, b"laptop");
///
/// assert!(find_block_start(b"# BEGIN").is_none());
/// ```
pub fn find_block_start(line: &[u8]) -> Option<BlockAttrs> {
    let caps = BEGIN_REGEX.captures(line)?;
    Some(BlockAttrs {
        prefix: caps[1].to_vec(),
        quality: caps[2].to_vec(),
    })
}

/// Strips one trailing `\n`, then one trailing `\r`.
pub(crate) fn trim_line_end(line: &[u8]) -> &[u8] {
    let line = line.strip_suffix(b"\n").unwrap_or(line);
    line.strip_suffix(b"\r").unwrap_or(line)
}

/// Whether a block's content is currently commented out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockState {
    /// Every line carries the block's prefix. Empty blocks count as commented.
    Commented,
    /// No line carries the block's prefix.
    Uncommented,
    /// Some lines are commented and some are not.
    Mixed,
}

impl std::fmt::Display for BlockState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Commented => "commented",
            Self::Uncommented => "uncommented",
            Self::Mixed => "mixed",
        };
        f.write_str(s)
    }
}

/// A closed qualified block found in some text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    /// Prefix and quality from the opening delimiter.
    pub attrs: BlockAttrs,
    /// The lines between the delimiters.
    pub lines: Vec<Vec<u8>>,
    /// The 1-based line number of the `BEGIN` delimiter.
    pub start_line: usize,
    /// The 1-based line number of the `END` delimiter.
    pub end_line: usize,
}

impl Block {
    /// Classifies the block's content against its prefix.
    pub fn state(&self) -> BlockState {
        let commenter = Commenter::new(self.attrs.prefix.as_slice());
        if commenter.is_commented(&self.lines) {
            BlockState::Commented
        } else if self
            .lines
            .iter()
            .any(|l| commenter.is_commented(std::slice::from_ref(l)))
        {
            BlockState::Mixed
        } else {
            BlockState::Uncommented
        }
    }
}

/// Parses all closed blocks from the given content, in order of appearance.
///
/// Lines are split the same way [`qualify`](crate::qualify) reads them.
/// Blocks do not nest: while a block is open, `BEGIN` lines are content.
/// A block still open at the end of the content is not returned.
///
/// # Example
/// ```
/// use qualia_blocks::parser::parse_blocks;
///
/// let content = b"x\n# BEGIN laptop\n#export A=1\n# END laptop\n";
/// let blocks = parse_blocks(content);
/// assert_eq!(blocks.len(), 1);
/// assert_eq!(blocks[0].attrs.quality, b"laptop");
/// assert_eq!(blocks[0].start_line, 2);
/// assert_eq!(blocks[0].end_line, 4);
/// ```
pub fn parse_blocks(content: &[u8]) -> Vec<Block> {
    let mut blocks = Vec::new();
    let mut open: Option<(BlockAttrs, usize, Vec<Vec<u8>>)> = None;

    let content_lines = content.split_inclusive(|&b| b == b'\n').map(trim_line_end);
    for (idx, line) in content_lines.enumerate() {
        let line_no = idx + 1;
        match open.take() {
            None => {
                open = find_block_start(line).map(|attrs| (attrs, line_no, Vec::new()));
            }
            Some((attrs, start_line, lines)) if attrs.closes(line) => {
                blocks.push(Block {
                    attrs,
                    lines,
                    start_line,
                    end_line: line_no,
                });
            }
            Some((attrs, start_line, mut lines)) => {
                lines.push(line.to_vec());
                open = Some((attrs, start_line, lines));
            }
        }
    }

    blocks
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_block_start_with_space() {
        let attrs = find_block_start(b"# BEGIN spam").unwrap();
        assert_eq!(attrs.prefix, b"#");
        assert_eq!(attrs.quality, b"spam");
    }

    #[test]
    fn test_find_block_start_without_space() {
        let attrs = find_block_start(b"#BEGIN spam").unwrap();
        assert_eq!(attrs.prefix, b"#");
        assert_eq!(attrs.quality, b"spam");
    }

    #[test]
    fn test_find_block_start_missing_quality() {
        assert!(find_block_start(b"# BEGIN").is_none());
        assert!(find_block_start(b"# BEGIN   ").is_none());
    }

    #[test]
    fn test_vertical_tab_is_not_whitespace() {
        let attrs = find_block_start(b"\x0B# BEGIN spam").unwrap();
        assert_eq!(attrs.prefix, b"\x0B#");
        assert!(find_block_start(b"# BEGIN\x0Bspam").is_none());
    }

    #[test]
    fn test_closes_requires_same_prefix() {
        let attrs = find_block_start(b"# BEGIN spam").unwrap();
        assert!(attrs.closes(b"# END spam"));
        assert!(attrs.closes(b"  #END spam trailing"));
        assert!(!attrs.closes(b"// END spam"));
        assert!(!attrs.closes(b"# END eggs"));
        assert!(!attrs.closes(b"# BEGIN spam"));
    }

    #[test]
    fn test_trim_line_end() {
        assert_eq!(trim_line_end(b"a\r\n"), b"a");
        assert_eq!(trim_line_end(b"a\n"), b"a");
        assert_eq!(trim_line_end(b"a"), b"a");
        assert_eq!(trim_line_end(b"a\r"), b"a");
    }

    #[test]
    fn test_parse_blocks_skips_unclosed() {
        let blocks = parse_blocks(b"# BEGIN spam\n#spam\n");
        assert!(blocks.is_empty());
    }
}
