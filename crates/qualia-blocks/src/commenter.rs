//! Commenting and uncommenting groups of lines.
//!
//! A [`Commenter`] works on whole groups of lines rather than single lines:
//! a group counts as commented only when every line in it starts with the
//! marker after optional leading whitespace. Both [`Commenter::comment`] and
//! [`Commenter::uncomment`] are idempotent.
//!
//! Lines are raw bytes. Leading whitespace means the ASCII set
//! `[\t\n\x0C\r ]`; vertical tab and non-ASCII spaces are content.

/// Comments and uncomments lines for a single comment marker such as `#`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Commenter {
    marker: Vec<u8>,
}

impl Commenter {
    /// Creates a commenter for `marker`. The marker is matched literally.
    pub fn new(marker: impl Into<Vec<u8>>) -> Self {
        Self {
            marker: marker.into(),
        }
    }

    /// The comment marker this commenter inserts and strips.
    pub fn marker(&self) -> &[u8] {
        &self.marker
    }

    /// Returns true if every line is commented. An empty group is commented.
    pub fn is_commented<S: AsRef<[u8]>>(&self, lines: &[S]) -> bool {
        lines.iter().all(|l| self.marker_at(l.as_ref()).is_some())
    }

    /// Comments out the lines.
    ///
    /// Lines that are already commented as a group are returned unchanged.
    /// Otherwise the marker is inserted after the indentation shared by all
    /// lines, so deeper lines keep their relative indentation.
    ///
    /// ```
    /// use qualia_blocks::Commenter;
    ///
    /// let c = Commenter::new("#");
    /// let lines = vec![b"  foo".to_vec(), b"    bar".to_vec()];
    /// assert_eq!(c.comment(lines), vec![b"  #foo".to_vec(), b"  #  bar".to_vec()]);
    /// ```
    pub fn comment(&self, lines: Vec<Vec<u8>>) -> Vec<Vec<u8>> {
        if lines.is_empty() || self.is_commented(&lines) {
            return lines;
        }
        let indent = common_indent(&lines);
        lines
            .iter()
            .map(|l| {
                let mut out = Vec::with_capacity(l.len() + self.marker.len());
                out.extend_from_slice(&l[..indent]);
                out.extend_from_slice(&self.marker);
                out.extend_from_slice(&l[indent..]);
                out
            })
            .collect()
    }

    /// Uncomments the lines.
    ///
    /// One marker is stripped from every line per pass, keeping whitespace
    /// before the marker, for as long as the group as a whole stays
    /// commented. A group where any line lacks the marker is left alone.
    /// Whitespace after the marker belongs to the line content and is kept,
    /// so `"# bar"` becomes `" bar"`.
    pub fn uncomment(&self, mut lines: Vec<Vec<u8>>) -> Vec<Vec<u8>> {
        if self.marker.is_empty() {
            return lines;
        }
        while !lines.is_empty() && self.is_commented(&lines) {
            for line in &mut lines {
                if let Some(at) = self.marker_at(line) {
                    line.drain(at..at + self.marker.len());
                }
            }
        }
        lines
    }

    /// Offset of the marker if it directly follows leading whitespace.
    ///
    /// The longest whitespace run that still leaves the marker in place
    /// wins, so markers that themselves start with whitespace still match.
    fn marker_at(&self, line: &[u8]) -> Option<usize> {
        let ws = leading_whitespace(line);
        (0..=ws)
            .rev()
            .find(|&at| line[at..].starts_with(&self.marker))
    }
}

/// Whitespace bytes allowed before a marker or delimiter.
fn is_space(b: u8) -> bool {
    matches!(b, b'\t' | b'\n' | b'\x0C' | b'\r' | b' ')
}

fn leading_whitespace(line: &[u8]) -> usize {
    line.iter().take_while(|&&b| is_space(b)).count()
}

/// Length of the longest run of leading whitespace shared by all lines.
fn common_indent<S: AsRef<[u8]>>(lines: &[S]) -> usize {
    let mut iter = lines.iter().map(|l| {
        let l = l.as_ref();
        &l[..leading_whitespace(l)]
    });
    let Some(first) = iter.next() else {
        return 0;
    };
    iter.fold(first.len(), |common, indent| {
        first[..common]
            .iter()
            .zip(indent)
            .take_while(|(a, b)| a == b)
            .count()
    })
}
