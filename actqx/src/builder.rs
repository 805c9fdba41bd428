use anyhow::Result;
use std::collections::HashMap;

use crate::answer_key::AnswerKey;
use crate::classifier::ClassifierPolicy;
use crate::cleaner::normalize;
use crate::config::{PageNumber, DEFAULT_ID_PREFIX};
use crate::models::Question;
use crate::notation::extract_equations;
use crate::segmenter::split_stem_and_options;

/// Stems shorter than this (in characters) are marker false positives.
pub const MIN_STEM_CHARS: usize = 5;

/// Rendered page images, one entry per page.
///
/// Rendering happens on the first lookup of a page; the result, including a
/// failure (`None`), is kept for the rest of the run.
#[derive(Debug, Clone, Default)]
pub struct PageImageCache {
    images: HashMap<PageNumber, Option<String>>,
}

impl PageImageCache {
    pub fn new() -> PageImageCache {
        PageImageCache::default()
    }

    pub fn get_or_render<F>(&mut self, page: PageNumber, render: F) -> Option<String>
    where
        F: FnOnce() -> Result<String>,
    {
        self.images
            .entry(page)
            .or_insert_with(|| match render() {
                Ok(path) => Some(path),
                Err(e) => {
                    tracing::warn!("Failed to render page {}: {}", page, e);
                    None
                }
            })
            .clone()
    }

    pub fn get(&self, page: PageNumber) -> Option<&Option<String>> {
        self.images.get(&page)
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }
}

/// Per-run state shared by every span: the read-only answer key, the
/// classifier tables and the page image cache.
#[derive(Debug, Clone)]
pub struct ExtractionContext {
    pub answers: AnswerKey,
    pub policy: ClassifierPolicy,
    pub images: PageImageCache,
    pub id_prefix: String,
}

impl Default for ExtractionContext {
    fn default() -> Self {
        ExtractionContext::new(AnswerKey::new())
    }
}

impl ExtractionContext {
    pub fn new(answers: AnswerKey) -> ExtractionContext {
        ExtractionContext {
            answers,
            policy: ClassifierPolicy::default(),
            images: PageImageCache::new(),
            id_prefix: DEFAULT_ID_PREFIX.to_string(),
        }
    }

    pub fn with_policy(mut self, policy: ClassifierPolicy) -> ExtractionContext {
        self.policy = policy;
        self
    }

    pub fn with_id_prefix(mut self, id_prefix: &str) -> ExtractionContext {
        self.id_prefix = id_prefix.to_string();
        self
    }
}

/// Builds one question from a marker-delimited span.
///
/// Returns `None` when the span is not a question: the stem is too short,
/// normalizes to nothing, or is rejected by the classifier.
///
/// # Arguments
///
/// * `number` - Question number taken from the marker.
/// * `span` - Raw span text following the marker.
/// * `page` - 1-based page of the marker.
/// * `image` - Rendered image of that page, if any.
/// * `ctx` - Answer key and classifier tables.
pub fn build_question(
    number: u32,
    span: &str,
    page: PageNumber,
    image: Option<String>,
    ctx: &ExtractionContext,
) -> Option<Question> {
    let (stem, options) = split_stem_and_options(span);
    if stem.chars().count() < MIN_STEM_CHARS {
        tracing::debug!("Page {} question {}: stem too short", page, number);
        return None;
    }

    let text = normalize(&stem);
    if text.is_empty() || !ctx.policy.is_genuine_question(&text) {
        tracing::debug!("Page {} question {}: not a question: {:?}", page, number, text);
        return None;
    }

    let equations = extract_equations(&text);
    let question_type = ctx.policy.classify_type(&text, &options);
    let answer = ctx.answers.get(number);

    Some(Question {
        id: format!("{}_{}", ctx.id_prefix, number),
        question_type,
        text,
        options,
        answer,
        equations,
        page,
        image,
    })
}
