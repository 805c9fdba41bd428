use anyhow::Result;
use indicatif::ProgressBar;
use std::collections::BTreeMap;

use crate::answer_key::parse_answer_key;
use crate::builder::{build_question, ExtractionContext};
use crate::config::ExtractorConfig;
use crate::converter::{save_pdf, PageRenderer, PopplerRenderer, PopplerText, TextSource};
use crate::models::Question;
use crate::segmenter::segment_page;

/// Runs segmentation and building over every page, in document order.
///
/// Per-page problems never abort the run: a page whose text cannot be
/// extracted, or that has no text or no markers, is skipped. A page image
/// is requested only for pages with at least one marker, and only once.
pub fn extract_questions<S, R>(
    source: &S,
    renderer: &R,
    ctx: &mut ExtractionContext,
    verbose: bool,
) -> Vec<Question>
where
    S: TextSource,
    R: PageRenderer,
{
    let page_count = source.page_count();
    let progress = if verbose {
        ProgressBar::new(u64::from(page_count))
    } else {
        ProgressBar::hidden()
    };

    let mut questions = Vec::new();
    for page in 1..=page_count {
        progress.inc(1);
        let text = match source.page_text(page) {
            Ok(Some(text)) => text,
            Ok(None) => {
                tracing::debug!("Page {} has no text", page);
                continue;
            }
            Err(e) => {
                tracing::warn!("Failed to extract text from page {}: {}", page, e);
                continue;
            }
        };

        let spans = segment_page(&text);
        if spans.is_empty() {
            tracing::debug!("Page {} has no question markers", page);
            continue;
        }

        let image = ctx.images.get_or_render(page, || renderer.render_page(page));
        for span in spans.iter() {
            if let Some(question) = build_question(span.number, &span.text, page, image.clone(), ctx)
            {
                questions.push(question);
            }
        }
    }
    progress.finish_and_clear();

    if verbose {
        tracing::info!(
            "Extracted {} questions from {} pages",
            questions.len(),
            page_count
        );
    }
    questions
}

/// Builds the answer key from the full text, then extracts every page.
///
/// # Errors
///
/// Fails when the full text cannot be extracted or contains no text at all.
pub fn extract_document<S, R>(
    source: &S,
    renderer: &R,
    config: &ExtractorConfig,
    verbose: bool,
) -> Result<Vec<Question>>
where
    S: TextSource,
    R: PageRenderer,
{
    let full_text = source.full_text()?;
    if full_text.trim().is_empty() {
        anyhow::bail!("No text could be extracted from the document");
    }
    if verbose {
        tracing::info!("Extracted {} characters of text", full_text.chars().count());
    }

    let answers = parse_answer_key(&full_text);
    let mut ctx = ExtractionContext::new(answers)
        .with_policy(config.policy.clone())
        .with_id_prefix(&config.id_prefix);
    Ok(extract_questions(source, renderer, &mut ctx, verbose))
}

/// Fetches `path_or_url` and extracts its questions with poppler-utils.
///
/// The working copy of the PDF is removed afterwards, whether or not the
/// run succeeded.
pub async fn parse(
    path_or_url: &str,
    config: &mut ExtractorConfig,
    verbose: bool,
) -> Result<Vec<Question>> {
    let time = std::time::Instant::now();
    if verbose {
        tracing::info!("Parsing PDF: {}", path_or_url);
    }

    let result = parse_working_copy(path_or_url, config, verbose).await;
    if let Err(e) = config.clean_files() {
        tracing::warn!("Failed to remove {}: {}", config.pdf_path, e);
    }

    if verbose {
        tracing::info!("Finished Parsing in {:.2}s", time.elapsed().as_secs_f64());
    }
    result
}

async fn parse_working_copy(
    path_or_url: &str,
    config: &mut ExtractorConfig,
    verbose: bool,
) -> Result<Vec<Question>> {
    save_pdf(path_or_url, config, verbose).await?;
    let source = PopplerText::new(config)?;
    let renderer = PopplerRenderer::new(config);
    extract_document(&source, &renderer, config, verbose)
}

/// Like [`parse`], but a fatal failure is logged and yields an empty
/// collection rather than a partial one.
pub async fn extract_all(
    path_or_url: &str,
    config: &mut ExtractorConfig,
    verbose: bool,
) -> Vec<Question> {
    match parse(path_or_url, config, verbose).await {
        Ok(questions) => questions,
        Err(e) => {
            tracing::error!("Extraction aborted: {:#}", e);
            Vec::new()
        }
    }
}

pub fn questions2json(questions: &[Question]) -> Result<String> {
    Ok(serde_json::to_string_pretty(questions)?)
}

/// Counts reported at the end of a run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractionSummary {
    pub total: usize,
    pub by_type: BTreeMap<String, usize>,
    pub with_answer: usize,
    pub with_image: usize,
    pub pages: usize,
}

impl ExtractionSummary {
    pub fn from_questions(questions: &[Question]) -> ExtractionSummary {
        let mut summary = ExtractionSummary {
            total: questions.len(),
            ..Default::default()
        };
        let mut pages = std::collections::BTreeSet::new();
        for question in questions {
            *summary.by_type.entry(question.question_type.to_string()).or_insert(0) += 1;
            if question.answer.is_some() {
                summary.with_answer += 1;
            }
            if question.image.is_some() {
                summary.with_image += 1;
            }
            pages.insert(question.page);
        }
        summary.pages = pages.len();
        summary
    }
}
