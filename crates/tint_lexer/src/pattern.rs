//! The pattern matcher: one compiled regular expression per rule.

use regex::{Captures, Regex};

/// Match options applied uniformly to every pattern of a table.
///
/// These correspond to the pattern flags a rule-table definition carries
/// (the original tables set "dot matches newline" for whole-file comment
/// rules). They are fixed at build time; the engine never re-reads them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MatchFlags {
    /// `.` also matches `\n`.
    pub dot_matches_new_line: bool,
    /// Letters match case-insensitively.
    pub case_insensitive: bool,
    /// `^` and `$` match at line boundaries, not just input boundaries.
    pub multi_line: bool,
}

/// A rule's compiled pattern.
///
/// Matching is anchored at the requested position: a candidate match that
/// would start later in the input is not a match. A pattern may legally
/// match the empty string; the engine, not the matcher, guards against
/// the cursor failing to advance in that case.
#[derive(Debug, Clone)]
pub(crate) struct Pattern {
    re: Regex,
    group_count: usize,
}

impl Pattern {
    /// Compile a pattern once, applying the table's match flags.
    pub(crate) fn compile(source: &str, flags: MatchFlags) -> Result<Pattern, regex::Error> {
        let mut inline = String::new();
        if flags.dot_matches_new_line {
            inline.push('s');
        }
        if flags.case_insensitive {
            inline.push('i');
        }
        if flags.multi_line {
            inline.push('m');
        }
        let re = if inline.is_empty() {
            Regex::new(source)?
        } else {
            Regex::new(&format!("(?{inline}:{source})"))?
        };
        let group_count = re.captures_len() - 1;
        Ok(Pattern { re, group_count })
    }

    /// Try to match at exactly `pos`.
    ///
    /// `captures_at` keeps the surrounding text visible to `^` and `\b`,
    /// and its leftmost match semantics mean that whenever any match starts
    /// at `pos`, the returned one does; a match starting later is rejected.
    pub(crate) fn try_match<'h>(&self, text: &'h str, pos: usize) -> Option<Captures<'h>> {
        let caps = self.re.captures_at(text, pos)?;
        if caps.get(0)?.start() != pos {
            return None;
        }
        Some(caps)
    }

    /// The number of capturing groups in this pattern (group 0 excluded).
    #[inline]
    pub(crate) fn group_count(&self) -> usize {
        self.group_count
    }
}
