use crate::types::{DisplayLine, Word};

/// Window during which one word of a line is the active, highlighted word.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HighlightInterval<'a> {
    pub index: usize,
    pub word: &'a Word,
    pub start: f64,
    pub end: f64,
}

impl HighlightInterval<'_> {
    pub fn duration(&self) -> f64 {
        self.end - self.start
    }
}

/// One interval per word: from the word's start to the next word's start, the
/// last word running to its own end.
///
/// Engines can emit overlapping or out-of-order word timings. Those are passed
/// through unrepaired, so an interval may end before it starts.
pub fn compute_highlight_intervals(line: &DisplayLine) -> Vec<HighlightInterval<'_>> {
    let words = &line.words;
    words
        .iter()
        .enumerate()
        .map(|(index, word)| {
            let end = match words.get(index + 1) {
                Some(next) => next.start,
                None => line.end(),
            };
            HighlightInterval {
                index,
                word,
                start: word.start,
                end,
            }
        })
        .collect()
}
