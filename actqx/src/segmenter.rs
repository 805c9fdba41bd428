//! Boundary scanning for page text.
//!
//! Question markers (`12. `) and option markers (`B. `) are only recognised
//! at line starts. Both are found by walking line-start offsets and testing
//! a predicate there, and spans are the text between consecutive markers.

use crate::cleaner::clean_option_text;
use crate::models::{Letter, QuestionOption};

/// A marker found at a line start.
///
/// * `line_start` - Offset of the line holding the marker; the previous span ends here.
/// * `body_start` - Offset right after the marker's period; the span starts here.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Marker<T> {
    label: T,
    line_start: usize,
    body_start: usize,
}

/// Raw text of one question, cut from page text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionSpan {
    pub number: u32,
    pub text: String,
}

/// Byte offsets at which a line begins: 0 and every offset after a `\n`.
fn line_starts(text: &str) -> impl Iterator<Item = usize> + '_ {
    std::iter::once(0).chain(text.match_indices('\n').map(|(i, _)| i + 1))
}

/// Skips spaces and tabs at the start of a line.
fn skip_indent(text: &str, at: usize) -> usize {
    let rest = &text[at..];
    at + (rest.len() - rest.trim_start_matches([' ', '\t']).len())
}

/// Whether the marker's period is followed by at least one whitespace
/// character (a line break counts).
fn period_then_space(text: &str, period: usize) -> bool {
    let mut chars = text[period..].chars();
    chars.next() == Some('.') && chars.next().is_some_and(char::is_whitespace)
}

/// Question marker predicate: `<indent><digits>. ` at `at`.
fn question_marker_at(text: &str, at: usize) -> Option<Marker<u32>> {
    let start = skip_indent(text, at);
    let rest = &text[start..];
    let digits = rest.len() - rest.trim_start_matches(|c: char| c.is_ascii_digit()).len();
    if digits == 0 {
        return None;
    }
    let period = start + digits;
    if !period_then_space(text, period) {
        return None;
    }
    let number = text[start..period].parse::<u32>().ok()?;
    Some(Marker {
        label: number,
        line_start: at,
        body_start: period + 1,
    })
}

/// Option marker predicate: `<indent><A-D>. ` at `at`.
fn option_marker_at(text: &str, at: usize) -> Option<Marker<Letter>> {
    let start = skip_indent(text, at);
    let letter = text[start..].chars().next().and_then(Letter::from_char)?;
    let period = start + 1;
    if !period_then_space(text, period) {
        return None;
    }
    Some(Marker {
        label: letter,
        line_start: at,
        body_start: period + 1,
    })
}

/// Pairs every marker with the text up to the next marker (or the end).
fn spans<'a, T: Copy>(text: &'a str, markers: &[Marker<T>]) -> Vec<(T, &'a str)> {
    markers
        .iter()
        .enumerate()
        .map(|(i, marker)| {
            let end = markers.get(i + 1).map_or(text.len(), |next| next.line_start);
            (marker.label, &text[marker.body_start..end])
        })
        .collect()
}

/// Finds the question markers on one page and slices the page into spans.
///
/// A page without markers yields no spans. Numbers come from the markers
/// themselves, so nothing is renumbered or deduplicated.
pub fn segment_page(page_text: &str) -> Vec<QuestionSpan> {
    let markers: Vec<Marker<u32>> =
        line_starts(page_text).filter_map(|at| question_marker_at(page_text, at)).collect();

    spans(page_text, &markers)
        .into_iter()
        .map(|(number, span)| QuestionSpan {
            number,
            text: span.trim().to_string(),
        })
        .collect()
}

/// Splits a question span into its stem and its lettered options.
///
/// The options block starts at the first option marker that follows a line
/// break; a span without one is all stem. Each option runs until the next
/// option marker. Option text is cleaned, empty options are dropped and a
/// letter that was already seen is dropped as well.
pub fn split_stem_and_options(span: &str) -> (String, Vec<QuestionOption>) {
    let span = span.trim();
    let Some(block_start) = line_starts(span)
        .skip(1)
        .find(|&at| option_marker_at(span, at).is_some())
    else {
        return (span.to_string(), Vec::new());
    };

    let stem = span[..block_start].trim().to_string();
    let block = &span[block_start..];
    let markers: Vec<Marker<Letter>> =
        line_starts(block).filter_map(|at| option_marker_at(block, at)).collect();

    let mut options: Vec<QuestionOption> = Vec::new();
    for (letter, raw) in spans(block, &markers) {
        if options.iter().any(|o| o.letter == letter) {
            tracing::debug!("Dropping repeated option letter {}", letter);
            continue;
        }
        let text = clean_option_text(raw);
        if text.is_empty() {
            continue;
        }
        options.push(QuestionOption { letter, text });
    }
    (stem, options)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test_log::test]
    fn test_segment_page_slices_between_markers() {
        let page = "MATHEMATICS TEST\n1. What is 2 + 2?\nA. 3\nB. 4\n  2.  Solve for x.\n\n3. Find y.";
        let spans = segment_page(page);
        assert_eq!(spans.len(), 3);
        assert_eq!(spans[0].number, 1);
        assert_eq!(spans[0].text, "What is 2 + 2?\nA. 3\nB. 4");
        assert_eq!(spans[1].number, 2);
        assert_eq!(spans[1].text, "Solve for x.");
        assert_eq!(spans[2].number, 3);
        assert_eq!(spans[2].text, "Find y.");
    }

    #[test_log::test]
    fn test_segment_page_without_markers() {
        assert!(segment_page("DIRECTIONS: Solve each problem.\nDo not linger.").is_empty());
        assert!(segment_page("").is_empty());
    }

    #[test_log::test]
    fn test_segment_page_marker_shape() {
        // decimals, mid-line numbers and a trailing "7." are not markers
        let page = "3.5 is a decimal\nsee item 4. here\n7.";
        assert!(segment_page(page).is_empty());

        // the period may be followed directly by a line break
        let spans = segment_page("12.\nWhich graph is shown?");
        assert_eq!(spans.len(), 1);
        assert_eq!(spans[0].number, 12);
        assert_eq!(spans[0].text, "Which graph is shown?");
    }

    #[test_log::test]
    fn test_segment_page_keeps_repeated_numbers() {
        let spans = segment_page("1. First question?\n1. Second question?");
        assert_eq!(spans.len(), 2);
        assert!(spans.iter().all(|s| s.number == 1));
    }

    #[test_log::test]
    fn test_split_stem_and_options() {
        let (stem, options) = split_stem_and_options("What is 3/4 of 12?\nA. 6\nB. 8\nC. 9\nD. 12");
        assert_eq!(stem, "What is 3/4 of 12?");
        let letters: Vec<Letter> = options.iter().map(|o| o.letter).collect();
        assert_eq!(letters, Letter::ALL.to_vec());
        let texts: Vec<&str> = options.iter().map(|o| o.text.as_str()).collect();
        assert_eq!(texts, vec!["6", "8", "9", "12"]);
    }

    #[test_log::test]
    fn test_split_without_options() {
        let (stem, options) = split_stem_and_options("  What is the value of x^2 + 3?  ");
        assert_eq!(stem, "What is the value of x^2 + 3?");
        assert!(options.is_empty());
    }

    #[test_log::test]
    fn test_split_requires_line_break_before_options() {
        // "A. " at the very start or mid-line does not open the options block
        let (stem, options) = split_stem_and_options("A. line is drawn from B. to C. ");
        assert_eq!(stem, "A. line is drawn from B. to C.");
        assert!(options.is_empty());
    }

    #[test_log::test]
    fn test_split_multiline_options() {
        let span = "Which expression is equivalent?\n  A. _ 11 +\n     x\nB.\n4\nC. The point D. on the line";
        let (stem, options) = split_stem_and_options(span);
        assert_eq!(stem, "Which expression is equivalent?");
        assert_eq!(options.len(), 3);
        assert_eq!(options[0].letter, Letter::A);
        assert_eq!(options[0].text, "-11 + x");
        assert_eq!(options[1].letter, Letter::B);
        assert_eq!(options[1].text, "4");
        assert_eq!(options[2].letter, Letter::C);
        assert_eq!(options[2].text, "The point D. on the line");
    }

    #[test_log::test]
    fn test_split_drops_empty_options() {
        let (stem, options) = split_stem_and_options("Which one?\nA.  \nB. 5");
        assert_eq!(stem, "Which one?");
        assert_eq!(options.len(), 1);
        assert_eq!(options[0].letter, Letter::B);
        assert_eq!(options[0].text, "5");
    }

    #[test_log::test]
    fn test_split_drops_repeated_letters() {
        let span = "Which is it?\nA. one\nB. two\nA. three\nC. four";
        let (_, options) = split_stem_and_options(span);
        let letters: Vec<Letter> = options.iter().map(|o| o.letter).collect();
        assert_eq!(letters, vec![Letter::A, Letter::B, Letter::C]);
        assert_eq!(options[0].text, "one");
        assert_eq!(options[1].text, "two");
        assert_eq!(options[2].text, "four");
    }
}
