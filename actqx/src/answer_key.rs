use regex::Regex;
use std::collections::BTreeMap;
use std::sync::LazyLock;

use crate::models::Letter;

pub const ANSWER_KEY_LABEL: &str = "Answer Key";

/// "12 C": a question number, whitespace, one answer letter. The number may
/// follow a label such as `Q12 C`.
static ANSWER_ENTRY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d+)\s+([A-D])\b").unwrap());

/// Question number -> correct letter, built once per document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnswerKey {
    answers: BTreeMap<u32, Letter>,
}

impl AnswerKey {
    pub fn new() -> AnswerKey {
        AnswerKey::default()
    }

    /// Records an answer. A repeated number overwrites the earlier entry.
    pub fn insert(&mut self, number: u32, letter: Letter) -> Option<Letter> {
        self.answers.insert(number, letter)
    }

    pub fn get(&self, number: u32) -> Option<Letter> {
        self.answers.get(&number).copied()
    }

    pub fn len(&self) -> usize {
        self.answers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.answers.is_empty()
    }
}

impl FromIterator<(u32, Letter)> for AnswerKey {
    fn from_iter<T: IntoIterator<Item = (u32, Letter)>>(iter: T) -> Self {
        AnswerKey {
            answers: iter.into_iter().collect(),
        }
    }
}

/// Builds the answer key from the full document text.
///
/// Only the text after the first "Answer Key" label is scanned. When the
/// label is missing the key is empty and every question is emitted without
/// an answer.
pub fn parse_answer_key(full_text: &str) -> AnswerKey {
    let mut key = AnswerKey::new();
    let Some(start) = full_text.find(ANSWER_KEY_LABEL) else {
        tracing::warn!("Answer key section not found");
        return key;
    };

    let section = &full_text[start + ANSWER_KEY_LABEL.len()..];
    for caps in ANSWER_ENTRY.captures_iter(section) {
        let Ok(number) = caps[1].parse::<u32>() else {
            tracing::debug!("Skipping out-of-range answer key number: {}", &caps[1]);
            continue;
        };
        let Some(letter) = caps[2].chars().next().and_then(Letter::from_char) else {
            continue;
        };
        if let Some(previous) = key.insert(number, letter) {
            tracing::debug!(
                "Answer key entry {} repeated: {} replaced by {}",
                number,
                previous,
                letter
            );
        }
    }

    tracing::info!("Extracted {} answers from answer key", key.len());
    key
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test_log::test]
    fn test_missing_section_yields_empty_key() {
        let key = parse_answer_key("1. What is 2 A thing?\n3 B");
        assert!(key.is_empty());
    }

    #[test_log::test]
    fn test_parse_entries_after_label() {
        let text = "1. Which value is 4 D here?\n\nAnswer Key\n1 C\n2 A\n3 D\n10 B\n";
        let key = parse_answer_key(text);
        assert_eq!(key.len(), 4);
        assert_eq!(key.get(1), Some(Letter::C));
        assert_eq!(key.get(2), Some(Letter::A));
        assert_eq!(key.get(3), Some(Letter::D));
        assert_eq!(key.get(10), Some(Letter::B));
        assert_eq!(key.get(4), None);
    }

    #[test_log::test]
    fn test_repeated_number_last_wins() {
        let key = parse_answer_key("Answer Key 1 A 2 B 1 D");
        assert_eq!(key.len(), 2);
        assert_eq!(key.get(1), Some(Letter::D));
    }

    #[test_log::test]
    fn test_entries_need_a_standalone_letter() {
        let key = parse_answer_key("Answer Key\n12 Apples\n7 E\n8 C");
        assert_eq!(key.len(), 1);
        assert_eq!(key.get(8), Some(Letter::C));
    }

    #[test_log::test]
    fn test_labelled_numbers_are_entries() {
        let key = parse_answer_key("Answer Key\nQ1 C\nQ2 A\n#3 D");
        assert_eq!(key.len(), 3);
        assert_eq!(key.get(1), Some(Letter::C));
        assert_eq!(key.get(2), Some(Letter::A));
        assert_eq!(key.get(3), Some(Letter::D));
    }

    #[test_log::test]
    fn test_out_of_range_numbers_are_skipped() {
        let key = parse_answer_key("Answer Key 99999999999 A 5 B");
        assert_eq!(key.len(), 1);
        assert_eq!(key.get(5), Some(Letter::B));
    }

    #[test_log::test]
    fn test_collect_from_pairs() {
        let key: AnswerKey = vec![(1, Letter::C), (2, Letter::A)].into_iter().collect();
        assert_eq!(key.get(1), Some(Letter::C));
        assert_eq!(key.len(), 2);
    }
}
