//! Question filtering and type classification.
//!
//! The phrase tables live in [`ClassifierPolicy`] so they can be reviewed
//! and extended (or loaded from a TOML file) without touching control flow.
//! Matching is case-insensitive substring matching.
//!
//! Precedence: an exclusion phrase always rejects, even when an inclusion
//! phrase or a question mark is also present.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::models::{QuestionOption, QuestionType};

/// Phrases marking instructional boilerplate rather than a question.
pub const EXCLUDE_PHRASES: &[&str] = &[
    "Illustrative figures",
    "Geometric figures lie",
    "The word line indicates",
    "Do not linger",
    "If I get a job",
];

/// Phrases indicating a question.
pub const INCLUDE_PHRASES: &[&str] = &[
    "What is",
    "Which",
    "Find",
    "Calculate",
    "Solve",
    "equation",
    "expression",
    "graph",
    "function",
];

/// Phrases asking to compute something; they make a question without
/// enough options an application question.
pub const ACTION_PHRASES: &[&str] = &["calculate", "solve", "find", "what is"];

/// Minimum number of options for a single-choice question.
pub const MIN_CHOICE_OPTIONS: usize = 3;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierPolicy {
    pub exclude: Vec<String>,
    pub include: Vec<String>,
    pub action: Vec<String>,
    pub min_choice_options: usize,
}

fn owned(phrases: &[&str]) -> Vec<String> {
    phrases.iter().map(|p| p.to_string()).collect()
}

impl Default for ClassifierPolicy {
    fn default() -> Self {
        ClassifierPolicy {
            exclude: owned(EXCLUDE_PHRASES),
            include: owned(INCLUDE_PHRASES),
            action: owned(ACTION_PHRASES),
            min_choice_options: MIN_CHOICE_OPTIONS,
        }
    }
}

fn contains_any(text_lower: &str, phrases: &[String]) -> bool {
    phrases.iter().any(|phrase| text_lower.contains(&phrase.to_lowercase()))
}

impl ClassifierPolicy {
    /// Parses a policy from TOML. Tables that are left out keep their
    /// built-in defaults.
    pub fn from_toml_str(content: &str) -> Result<ClassifierPolicy> {
        toml::from_str(content).context("Invalid classifier policy")
    }

    pub fn from_toml_file(path: &Path) -> Result<ClassifierPolicy> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read classifier policy: {}", path.display()))?;
        Self::from_toml_str(&content)
            .with_context(|| format!("Failed to parse classifier policy: {}", path.display()))
    }

    /// Decides whether `text` is a real question rather than instructions.
    ///
    /// 1. Any exclusion phrase rejects.
    /// 2. Otherwise any inclusion phrase accepts.
    /// 3. Otherwise the text must contain a question mark.
    pub fn is_genuine_question(&self, text: &str) -> bool {
        let text_lower = text.to_lowercase();
        if contains_any(&text_lower, &self.exclude) {
            return false;
        }
        if contains_any(&text_lower, &self.include) {
            return true;
        }
        text.contains('?')
    }

    pub fn classify_type(&self, stem: &str, options: &[QuestionOption]) -> QuestionType {
        if options.len() >= self.min_choice_options {
            QuestionType::SingleChoice
        } else if contains_any(&stem.to_lowercase(), &self.action) {
            QuestionType::ApplicationQuestions
        } else {
            QuestionType::FillInBlank
        }
    }
}
