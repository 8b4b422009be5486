//! Word Aligner
//!
//! Maps edited caption text back onto prior word-level ASR timestamps using a
//! longest-common-subsequence diff.
//!
//! # Overview
//!
//! When the user edits a segment's text, the original words carry timing that
//! should survive wherever possible. The aligner compares the original word
//! sequence against the edited tokens case-insensitively, keeps timing for
//! matched words (while adopting the edited spelling for display), and leaves
//! inserted words untimed. Deleted words simply vanish.
//!
//! Alignment never fails; the worst case for an ambiguous edit is that a run
//! of words loses its timestamps. That is an accepted approximation, not an
//! error.
//!
//! Complexity is O(m*n) time and space. A 1000-word segment aligns in a few
//! milliseconds.

use crate::core::document::Word;

/// Realigns the original timed words onto freshly edited text.
///
/// Tokenizes `edited_text` on whitespace, diffs it against `original` with a
/// case-insensitive LCS, and returns the edited tokens in order: matched
/// tokens keep the original word's timing, inserted tokens carry none.
pub fn realign_words(original: &[Word], edited_text: &str) -> Vec<Word> {
    let tokens: Vec<&str> = edited_text.split_whitespace().collect();

    if tokens.is_empty() {
        return Vec::new();
    }
    if original.is_empty() {
        return tokens.into_iter().map(Word::new).collect();
    }

    let original_lower: Vec<String> = original.iter().map(|w| w.text.to_lowercase()).collect();
    let edited_lower: Vec<String> = tokens.iter().map(|t| t.to_lowercase()).collect();

    let m = original.len();
    let n = tokens.len();

    // LCS length table over case-insensitive token equality.
    let mut table = vec![vec![0u32; n + 1]; m + 1];
    for i in 1..=m {
        for j in 1..=n {
            table[i][j] = if original_lower[i - 1] == edited_lower[j - 1] {
                table[i - 1][j - 1] + 1
            } else {
                table[i - 1][j].max(table[i][j - 1])
            };
        }
    }

    // Backtrack, preferring a match, then insert over delete on ties. The
    // tie-break decides which words win timestamps on ambiguous edits and is
    // kept stable for behavioral compatibility.
    let mut realigned = Vec::with_capacity(n);
    let (mut i, mut j) = (m, n);
    while i > 0 || j > 0 {
        if i > 0 && j > 0 && original_lower[i - 1] == edited_lower[j - 1] {
            // Matched pair: original timing, edited spelling.
            realigned.push(Word {
                text: tokens[j - 1].to_string(),
                start_time: original[i - 1].start_time,
                end_time: original[i - 1].end_time,
            });
            i -= 1;
            j -= 1;
        } else if j > 0 && (i == 0 || table[i][j - 1] >= table[i - 1][j]) {
            realigned.push(Word::new(tokens[j - 1]));
            j -= 1;
        } else {
            i -= 1;
        }
    }
    realigned.reverse();
    realigned
}

// =============================================================================
// Tests
// =============================================================================
