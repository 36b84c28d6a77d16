//! Line-level diff between two versions of a language file.
//!
//! The comparison is a longest-common-subsequence walk over the split lines.
//! Changed lines are grouped into [`DiffBlock`]s: every unchanged line closes
//! the block that is currently open. Line numbers always refer to the
//! position of the line in its own text (old text for removals, new text for
//! additions), 1-based.
//!
//! [`render_diff`] is the entry point used by the sync driver. It never
//! fails: a [`DiffError`] is logged and turned into a one-line sentinel so a
//! single bad comparison cannot abort a run.

use std::collections::{BTreeMap, HashSet};
use std::fmt::Write;
use thiserror::Error;

/// Upper bound on the LCS table, in cells, after trimming common lines.
pub const MAX_TABLE_CELLS: usize = 25_000_000;

/// Errors that can occur while diffing
#[derive(Error, Debug)]
pub enum DiffError {
    #[error("changed region too large to compare ({old_lines} x {new_lines} lines)")]
    TooLarge { old_lines: usize, new_lines: usize },
}

/// Side a changed line belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    Removed,
    Added,
}

impl ChangeKind {
    fn sign(self) -> char {
        match self {
            ChangeKind::Removed => '-',
            ChangeKind::Added => '+',
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiffLine {
    pub kind: ChangeKind,
    /// 1-based position in the old text (removals) or new text (additions)
    pub line_number: usize,
    pub content: String,
}

/// Contiguous run of changed lines
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiffBlock {
    pub lines: Vec<DiffLine>,
}

impl DiffBlock {
    /// Render as a fenced `diff` code block.
    pub fn render(&self) -> String {
        let mut out = String::from("```diff\n");
        for line in &self.lines {
            let _ = writeln!(
                out,
                "{} {:04} {}",
                line.kind.sign(),
                line.line_number,
                line.content
            );
        }
        out.push_str("```");
        out
    }
}

enum Op {
    Equal,
    Remove(usize),
    Add(usize),
}

/// Compare two texts line by line.
pub fn diff_blocks(old: &str, new: &str) -> Result<Vec<DiffBlock>, DiffError> {
    let old_lines: Vec<&str> = old.lines().collect();
    let new_lines: Vec<&str> = new.lines().collect();

    let prefix = old_lines
        .iter()
        .zip(&new_lines)
        .take_while(|(a, b)| a == b)
        .count();
    let suffix = old_lines[prefix..]
        .iter()
        .rev()
        .zip(new_lines[prefix..].iter().rev())
        .take_while(|(a, b)| a == b)
        .count();

    let old_mid = &old_lines[prefix..old_lines.len() - suffix];
    let new_mid = &new_lines[prefix..new_lines.len() - suffix];

    let mut blocks = Vec::new();
    let mut current = DiffBlock::default();

    for op in lcs_ops(old_mid, new_mid)? {
        match op {
            Op::Equal => {
                if !current.lines.is_empty() {
                    blocks.push(std::mem::take(&mut current));
                }
            }
            Op::Remove(i) => current.lines.push(DiffLine {
                kind: ChangeKind::Removed,
                line_number: prefix + i + 1,
                content: old_mid[i].to_string(),
            }),
            Op::Add(j) => current.lines.push(DiffLine {
                kind: ChangeKind::Added,
                line_number: prefix + j + 1,
                content: new_mid[j].to_string(),
            }),
        }
    }
    if !current.lines.is_empty() {
        blocks.push(current);
    }

    Ok(blocks)
}

/// Edit script for two line slices; removals come before additions inside
/// a changed run.
fn lcs_ops(old: &[&str], new: &[&str]) -> Result<Vec<Op>, DiffError> {
    let (n, m) = (old.len(), new.len());
    let cells = (n + 1)
        .checked_mul(m + 1)
        .filter(|cells| *cells <= MAX_TABLE_CELLS)
        .ok_or(DiffError::TooLarge {
            old_lines: n,
            new_lines: m,
        })?;

    // table[i * (m + 1) + j] = LCS length of old[i..] and new[j..]
    let width = m + 1;
    let mut table = vec![0u32; cells];
    for i in (0..n).rev() {
        for j in (0..m).rev() {
            table[i * width + j] = if old[i] == new[j] {
                table[(i + 1) * width + j + 1] + 1
            } else {
                table[(i + 1) * width + j].max(table[i * width + j + 1])
            };
        }
    }

    let mut ops = Vec::with_capacity(n + m);
    let (mut i, mut j) = (0, 0);
    while i < n && j < m {
        if old[i] == new[j] {
            ops.push(Op::Equal);
            i += 1;
            j += 1;
        } else if table[(i + 1) * width + j] >= table[i * width + j + 1] {
            ops.push(Op::Remove(i));
            i += 1;
        } else {
            ops.push(Op::Add(j));
            j += 1;
        }
    }
    ops.extend((i..n).map(Op::Remove));
    ops.extend((j..m).map(Op::Add));

    Ok(ops)
}

/// Render blocks the way they appear in a change log.
pub fn render_blocks(blocks: &[DiffBlock]) -> String {
    blocks
        .iter()
        .map(DiffBlock::render)
        .collect::<Vec<_>>()
        .join("\n")
}

/// Diff two texts for a change log entry.
///
/// Returns an empty string when nothing changed, and an
/// `Error generating diff: ...` line instead of failing.
pub fn render_diff(old: &str, new: &str) -> String {
    match diff_blocks(old, new) {
        Ok(blocks) => render_blocks(&blocks),
        Err(e) => {
            tracing::error!("Error generating diff: {}", e);
            format!("Error generating diff: {e}")
        }
    }
}

/// Rebuild the new text's lines from the old text and its diff.
///
/// Lines are joined with `\n`; the trailing newline (if any) is not restored.
pub fn apply_blocks(old: &str, blocks: &[DiffBlock]) -> String {
    let mut removed = HashSet::new();
    let mut added = BTreeMap::new();
    for line in blocks.iter().flat_map(|block| &block.lines) {
        match line.kind {
            ChangeKind::Removed => {
                removed.insert(line.line_number);
            }
            ChangeKind::Added => {
                added.insert(line.line_number, line.content.as_str());
            }
        }
    }

    let mut kept = old
        .lines()
        .enumerate()
        .filter(|(index, _)| !removed.contains(&(index + 1)))
        .map(|(_, line)| line);

    let total = old.lines().count() - removed.len() + added.len();
    let mut rebuilt = Vec::with_capacity(total);
    for number in 1..=total {
        match added.get(&number) {
            Some(line) => rebuilt.push(*line),
            None => rebuilt.extend(kept.next()),
        }
    }

    rebuilt.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identical_texts_produce_no_blocks() {
        let text = "{\n  \"a\": \"b\"\n}";
        assert!(diff_blocks(text, text).unwrap().is_empty());
        assert_eq!(render_diff(text, text), "");
    }

    #[test]
    fn test_trailing_newline_is_not_a_change() {
        assert!(diff_blocks("a\nb", "a\nb\n").unwrap().is_empty());
    }

    #[test]
    fn test_added_line_numbers() {
        let old = "{\n  \"a\": \"1\"\n}";
        let new = "{\n  \"a\": \"1\",\n  \"b\": \"2\"\n}";
        let blocks = diff_blocks(old, new).unwrap();

        assert_eq!(blocks.len(), 1);
        assert_eq!(
            blocks[0].lines,
            vec![
                DiffLine {
                    kind: ChangeKind::Removed,
                    line_number: 2,
                    content: "  \"a\": \"1\"".to_string(),
                },
                DiffLine {
                    kind: ChangeKind::Added,
                    line_number: 2,
                    content: "  \"a\": \"1\",".to_string(),
                },
                DiffLine {
                    kind: ChangeKind::Added,
                    line_number: 3,
                    content: "  \"b\": \"2\"".to_string(),
                },
            ]
        );
    }

    #[test]
    fn test_unchanged_line_splits_blocks() {
        let old = "a\nb\nc\nd\ne";
        let new = "a\nB\nc\nd\nE";
        let blocks = diff_blocks(old, new).unwrap();

        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0].lines[0].line_number, 2);
        assert_eq!(blocks[1].lines[0].line_number, 5);
        assert_eq!(blocks[1].lines[1].content, "E");
    }

    #[test]
    fn test_line_numbers_track_each_side() {
        let old = "x\na\nb";
        let new = "a\nb\ny\nz";
        let blocks = diff_blocks(old, new).unwrap();

        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0].lines[0].kind, ChangeKind::Removed);
        assert_eq!(blocks[0].lines[0].line_number, 1);
        assert_eq!(blocks[1].lines[0].line_number, 3);
        assert_eq!(blocks[1].lines[1].line_number, 4);
    }

    #[test]
    fn test_render_format() {
        let rendered = render_diff("{}", "{\n  \"a.b\": \"Hello %s\"\n}");
        assert_eq!(
            rendered,
            "```diff\n- 0001 {}\n+ 0001 {\n+ 0002   \"a.b\": \"Hello %s\"\n+ 0003 }\n```"
        );
    }

    #[test]
    fn test_render_joins_blocks_with_newline() {
        let rendered = render_diff("a\nb\nc", "A\nb\nC");
        assert_eq!(
            rendered,
            "```diff\n- 0001 a\n+ 0001 A\n```\n```diff\n- 0003 c\n+ 0003 C\n```"
        );
    }

    #[test]
    fn test_from_empty_text() {
        let blocks = diff_blocks("", "a\nb").unwrap();
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].lines.len(), 2);
        assert!(blocks[0].lines.iter().all(|l| l.kind == ChangeKind::Added));
    }

    #[test]
    fn test_apply_blocks_rebuilds_new_text() {
        let old = "a\nb\nc\nd";
        let new = "a\nx\nc\ny\nz";
        let blocks = diff_blocks(old, new).unwrap();
        assert_eq!(apply_blocks(old, &blocks), new);
    }

    #[test]
    fn test_too_large_region_becomes_sentinel() {
        let old: String = (0..6000).map(|i| format!("old {i}\n")).collect();
        let new: String = (0..6000).map(|i| format!("new {i}\n")).collect();

        assert!(matches!(
            diff_blocks(&old, &new),
            Err(DiffError::TooLarge {
                old_lines: 6000,
                new_lines: 6000
            })
        ));
        assert!(render_diff(&old, &new).starts_with("Error generating diff:"));
    }
}
