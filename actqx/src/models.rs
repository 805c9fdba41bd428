use crate::config::PageNumber;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Option letter of a multiple-choice question. The same closed alphabet is
/// used by the answer key.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Display,
    EnumString,
)]
pub enum Letter {
    A,
    B,
    C,
    D,
}

impl Letter {
    pub const ALL: [Letter; 4] = [Letter::A, Letter::B, Letter::C, Letter::D];

    /// Maps an ASCII character to a letter. Only uppercase `A`–`D` match.
    pub fn from_char(c: char) -> Option<Letter> {
        match c {
            'A' => Some(Letter::A),
            'B' => Some(Letter::B),
            'C' => Some(Letter::C),
            'D' => Some(Letter::D),
            _ => None,
        }
    }
}

/// Question type labels.
///
/// # Variants
///
/// * `SingleChoice` - At least three options were extracted.
/// * `ApplicationQuestions` - Fewer options, but the stem asks to compute something.
/// * `FillInBlank` - Everything else.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum QuestionType {
    SingleChoice,
    ApplicationQuestions,
    FillInBlank,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionOption {
    #[serde(rename = "key")]
    pub letter: Letter,
    pub text: String,
}

/// One extracted question, serialized in the shape consumed by the question
/// bank importer.
///
/// # Fields
///
/// * `id` - `<prefix>_<number>`, where the number comes from the in-page marker.
/// * `question_type` - Classification label.
/// * `text` - Normalized stem, never empty.
/// * `options` - Multiple-choice options in document order; omitted when empty.
/// * `answer` - Answer key letter; omitted when the key has no entry.
/// * `equations` - LaTeX fragments found in the stem; omitted when empty.
/// * `page` - 1-based page of the question marker.
/// * `image` - Rendered page image, `null` when rendering failed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    #[serde(rename = "question_id")]
    pub id: String,
    pub question_type: QuestionType,
    #[serde(rename = "question_text")]
    pub text: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<QuestionOption>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub answer: Option<Letter>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub equations: Vec<String>,
    pub page: PageNumber,
    pub image: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn sample_question() -> Question {
        Question {
            id: "act_math_1".to_string(),
            question_type: QuestionType::SingleChoice,
            text: "What is 3/4 of 12?".to_string(),
            options: vec![
                QuestionOption {
                    letter: Letter::A,
                    text: "6".to_string(),
                },
                QuestionOption {
                    letter: Letter::B,
                    text: "9".to_string(),
                },
            ],
            answer: Some(Letter::B),
            equations: vec![r"\frac{3}{4}".to_string()],
            page: 3,
            image: Some("output/page_3.png".to_string()),
        }
    }

    #[test_log::test]
    fn test_letter_from_char() {
        assert_eq!(Letter::from_char('A'), Some(Letter::A));
        assert_eq!(Letter::from_char('D'), Some(Letter::D));
        assert_eq!(Letter::from_char('E'), None);
        assert_eq!(Letter::from_char('a'), None);
        assert_eq!(Letter::from_str("C").unwrap(), Letter::C);
        assert_eq!(Letter::B.to_string(), "B");
    }

    #[test_log::test]
    fn test_question_type_labels() {
        assert_eq!(QuestionType::SingleChoice.to_string(), "single_choice");
        assert_eq!(
            QuestionType::ApplicationQuestions.to_string(),
            "application_questions"
        );
        assert_eq!(QuestionType::FillInBlank.to_string(), "fill_in_blank");
        assert_eq!(
            serde_json::to_value(QuestionType::FillInBlank).unwrap(),
            serde_json::json!("fill_in_blank")
        );
    }

    #[test_log::test]
    fn test_question_serializes_all_fields() {
        let value = serde_json::to_value(sample_question()).unwrap();
        assert_eq!(value["question_id"], "act_math_1");
        assert_eq!(value["question_type"], "single_choice");
        assert_eq!(value["question_text"], "What is 3/4 of 12?");
        assert_eq!(value["options"][0]["key"], "A");
        assert_eq!(value["options"][1]["text"], "9");
        assert_eq!(value["answer"], "B");
        assert_eq!(value["equations"][0], r"\frac{3}{4}");
        assert_eq!(value["page"], 3);
        assert_eq!(value["image"], "output/page_3.png");
    }

    #[test_log::test]
    fn test_question_omits_empty_fields() {
        let mut question = sample_question();
        question.options.clear();
        question.answer = None;
        question.equations.clear();
        question.image = None;

        let value = serde_json::to_value(&question).unwrap();
        let object = value.as_object().unwrap();
        assert!(!object.contains_key("options"));
        assert!(!object.contains_key("answer"));
        assert!(!object.contains_key("equations"));
        // image is always present, null when rendering failed
        assert!(object.contains_key("image"));
        assert!(object["image"].is_null());
        assert!(object.contains_key("page"));
    }
}
