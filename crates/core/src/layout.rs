use crate::{
    error::{CaptionError, Result},
    types::{DisplayLine, Word},
};

pub const DEFAULT_MAX_CHARS: usize = 56;

pub fn validate_max_chars(max_chars: usize) -> Result<()> {
    if max_chars == 0 {
        return Err(CaptionError::invalid_config("max_chars must be positive"));
    }
    Ok(())
}

/// Greedily pack words into display lines of at most `max_chars` characters.
///
/// Single left-to-right pass: a closed line is never revisited. A word wider
/// than `max_chars` gets a line of its own rather than being split.
pub fn pack_lines(words: &[Word], max_chars: usize) -> Result<Vec<DisplayLine>> {
    validate_max_chars(max_chars)?;

    let mut lines = Vec::new();
    let mut current: Vec<Word> = Vec::new();
    let mut current_len = 0;

    for word in words {
        let word_len = word.char_len();
        let candidate_len = if current.is_empty() {
            word_len
        } else {
            current_len + word_len + 1
        };

        if candidate_len > max_chars && !current.is_empty() {
            lines.push(DisplayLine {
                words: std::mem::take(&mut current),
            });
            current_len = word_len;
        } else {
            current_len = candidate_len;
        }
        current.push(word.clone());
    }

    if !current.is_empty() {
        lines.push(DisplayLine { words: current });
    }

    Ok(lines)
}

/// Wrap plain segment text by character count, breaking at the last space
/// that leaves at most `max_chars` on the line and hard-splitting words with
/// no space to break at.
pub fn wrap_text(text: &str, max_chars: usize) -> Result<Vec<String>> {
    validate_max_chars(max_chars)?;

    let mut lines = Vec::new();
    let mut rest: Vec<char> = text.trim().chars().collect();

    while rest.len() > max_chars {
        let split = if rest[max_chars] == ' ' {
            max_chars
        } else {
            rest[..max_chars]
                .iter()
                .rposition(|c| *c == ' ')
                .filter(|&i| i > 0)
                .unwrap_or(max_chars)
        };

        let line: String = rest[..split].iter().collect();
        lines.push(line.trim_end().to_string());

        let remainder: String = rest[split..].iter().collect();
        rest = remainder.trim().chars().collect();
    }

    if !rest.is_empty() {
        lines.push(rest.into_iter().collect());
    }

    Ok(lines)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(texts: &[&str]) -> Vec<Word> {
        texts
            .iter()
            .enumerate()
            .map(|(i, t)| Word::new(*t, i as f64, i as f64 + 1.0))
            .collect()
    }

    fn line_texts(lines: &[DisplayLine]) -> Vec<String> {
        lines.iter().map(DisplayLine::text).collect()
    }

    #[test]
    fn packs_greedily_without_rebalancing() {
        let input = words(&["aaa", "bb", "c", "dddd", "e"]);
        let lines = pack_lines(&input, 6).unwrap();
        assert_eq!(line_texts(&lines), vec!["aaa bb", "c dddd", "e"]);
    }

    #[test]
    fn exact_fit_stays_on_line() {
        let input = words(&["ab", "cd"]);
        let lines = pack_lines(&input, 5).unwrap();
        assert_eq!(line_texts(&lines), vec!["ab cd"]);

        let lines = pack_lines(&input, 4).unwrap();
        assert_eq!(line_texts(&lines), vec!["ab", "cd"]);
    }

    #[test]
    fn oversized_word_gets_its_own_line() {
        let input = words(&["hi", "extraordinarily", "ok"]);
        let lines = pack_lines(&input, 5).unwrap();
        assert_eq!(line_texts(&lines), vec!["hi", "extraordinarily", "ok"]);
        assert!(lines.iter().all(|l| !l.words.is_empty()));
    }

    #[test]
    fn packing_preserves_every_word_in_order() {
        let input = words(&[" The", " quick", " brown", " fox", " jumps", " over", " the", " dog"]);
        for max in 1..30 {
            let lines = pack_lines(&input, max).unwrap();
            let rejoined: Vec<Word> = lines.iter().flat_map(|l| l.words.clone()).collect();
            assert_eq!(rejoined, input);
            for line in &lines {
                assert!(line.char_len() <= max || line.words.len() == 1);
            }
        }
    }

    #[test]
    fn whisper_leading_spaces_do_not_count() {
        let input = words(&[" Hello", " world"]);
        let lines = pack_lines(&input, 11).unwrap();
        assert_eq!(line_texts(&lines), vec!["Hello world"]);
    }

    #[test]
    fn empty_input_yields_no_lines() {
        assert!(pack_lines(&[], 10).unwrap().is_empty());
    }

    #[test]
    fn zero_max_chars_is_rejected() {
        assert!(matches!(
            pack_lines(&words(&["a"]), 0),
            Err(CaptionError::InvalidConfiguration { .. })
        ));
        assert!(wrap_text("a", 0).is_err());
    }

    #[test]
    fn wrap_breaks_at_last_space() {
        let lines = wrap_text("  the quick brown fox  ", 10).unwrap();
        assert_eq!(lines, vec!["the quick", "brown fox"]);
    }

    #[test]
    fn wrap_keeps_exact_fit_together() {
        assert_eq!(wrap_text("ab cd efgh", 5).unwrap(), vec!["ab cd", "efgh"]);
        assert_eq!(wrap_text("ab cd efgh", 4).unwrap(), vec!["ab", "cd", "efgh"]);
    }

    #[test]
    fn wrap_hard_splits_long_words() {
        let lines = wrap_text("abcdefghij kl", 4).unwrap();
        assert_eq!(lines, vec!["abcd", "efgh", "ij", "kl"]);
    }

    #[test]
    fn wrap_counts_characters_not_bytes() {
        let lines = wrap_text("привет мир", 6).unwrap();
        assert_eq!(lines, vec!["привет", "мир"]);
    }

    #[test]
    fn wrap_short_text_is_single_line() {
        assert_eq!(wrap_text("short", 56).unwrap(), vec!["short"]);
        assert!(wrap_text("   ", 56).unwrap().is_empty());
    }
}
