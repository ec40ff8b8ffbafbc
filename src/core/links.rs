//! # Link Extraction
//!
//! Finds URL-shaped substrings (`http://` or `https://` followed by
//! non-whitespace) in section text. Both the reducer (how many links does
//! this section have?) and the renderer (which byte ranges get link styling?)
//! call into here, so it stays pure and cheap: the pattern is compiled once
//! per process.

use regex::{Regex, RegexBuilder};
use std::ops::Range;
use std::sync::LazyLock;

/// `None` only if the constant pattern fails to compile, in which case no
/// text is treated as a link.
static URL_PATTERN: LazyLock<Option<Regex>> =
    LazyLock::new(|| RegexBuilder::new(r"https?://\S+").build().ok());

/// A link found in a section, with enough position info to highlight
/// the exact occurrence (duplicates of the same URL stay distinguishable).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Link<'a> {
    /// The literal URL text.
    pub text: &'a str,
    /// Index of the line the link was found on.
    pub line: usize,
    /// Byte offset of the link within its line.
    pub start: usize,
}

impl Link<'_> {
    /// Byte range of the link within its line.
    pub fn range(&self) -> Range<usize> {
        self.start..self.start + self.text.len()
    }
}

/// Byte ranges of every link in a single line, left to right.
pub fn link_ranges(line: &str) -> impl Iterator<Item = Range<usize>> + '_ {
    URL_PATTERN
        .iter()
        .flat_map(move |re| re.find_iter(line))
        .map(|m| m.range())
}

/// Extracts all links from `lines`, top to bottom and left to right.
pub fn extract_links<S: AsRef<str>>(lines: &[S]) -> Vec<Link<'_>> {
    lines
        .iter()
        .enumerate()
        .flat_map(|(line, text)| {
            let text = text.as_ref();
            link_ranges(text).map(move |range| Link {
                text: &text[range.clone()],
                line,
                start: range.start,
            })
        })
        .collect()
}

/// Number of links in `lines`, without materializing them.
pub fn count_links<S: AsRef<str>>(lines: &[S]) -> usize {
    lines
        .iter()
        .map(|line| link_ranges(line.as_ref()).count())
        .sum()
}
