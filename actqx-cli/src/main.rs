pub mod loggers;

use crate::loggers::init_logger;
use actqx::classifier::ClassifierPolicy;
use actqx::config::{
    ExtractorConfig, DEFAULT_FETCH_TIMEOUT_SECS, DEFAULT_ID_PREFIX, DEFAULT_IMAGE_DIR,
    DEFAULT_RESOLUTION, DEFAULT_SOURCE_URL,
};
use actqx::models::Question;
use actqx::parser::{extract_all, questions2json, ExtractionSummary};
use anyhow::Result;
use clap::Parser;
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(version, about, long_about=None)]
struct Args {
    /// URL or local path of the practice test PDF
    #[arg(short, long, default_value = DEFAULT_SOURCE_URL)]
    pdf: String,

    #[arg(short, long, default_value = "output/act_math_questions.json")]
    out: String,

    /// Directory receiving the rendered page images
    #[arg(short, long, default_value = DEFAULT_IMAGE_DIR)]
    images: String,

    #[arg(short, long, default_value_t = DEFAULT_RESOLUTION)]
    resolution: u32,

    /// Download timeout in seconds
    #[arg(short, long, default_value_t = DEFAULT_FETCH_TIMEOUT_SECS)]
    timeout: u64,

    #[arg(long, default_value = DEFAULT_ID_PREFIX)]
    id_prefix: String,

    /// TOML file overriding the classifier phrase tables
    #[arg(long)]
    policy: Option<PathBuf>,

    #[arg(short, long, default_value_t = false)]
    verbose: bool,
}

fn log_summary(questions: &[Question]) {
    let summary = ExtractionSummary::from_questions(questions);
    tracing::info!("ACT Extraction Summary:");
    tracing::info!("   Total questions: {}", summary.total);
    for (question_type, count) in summary.by_type.iter() {
        tracing::info!("   {}: {}", question_type, count);
    }
    tracing::info!("   With answers: {}", summary.with_answer);
    tracing::info!(
        "   With page images: {} (from {} pages)",
        summary.with_image,
        summary.pages
    );

    if let Some(sample) = questions.first() {
        let preview: String = sample.text.chars().take(80).collect();
        tracing::info!("Sample question: {}...", preview);
        for option in sample.options.iter().take(2) {
            let text: String = option.text.chars().take(30).collect();
            tracing::info!("   {}) {}", option.letter, text);
        }
        if let Some(answer) = sample.answer {
            tracing::info!("   Answer: {}", answer);
        }
    }
}

async fn run(args: Args) -> Result<()> {
    let is_url = args.pdf.starts_with("http");
    if !is_url && !Path::new(args.pdf.as_str()).exists() {
        anyhow::bail!("File not found: {}", args.pdf);
    }
    if !args.out.ends_with(".json") {
        anyhow::bail!("Output file must be a JSON file: {}", args.out);
    }

    let mut config = ExtractorConfig::new();
    config.image_dir = args.images;
    config.resolution = args.resolution;
    config.fetch_timeout = Duration::from_secs(args.timeout);
    config.id_prefix = args.id_prefix;
    if let Some(policy) = args.policy.as_deref() {
        config.policy = ClassifierPolicy::from_toml_file(policy)?;
    }

    let questions = extract_all(args.pdf.as_str(), &mut config, args.verbose).await;
    if questions.is_empty() {
        anyhow::bail!("No questions extracted");
    }

    let json = questions2json(&questions)?;
    if let Some(parent) = Path::new(&args.out).parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(&args.out, json)?;
    tracing::info!("Saved {} ACT questions to {}", questions.len(), args.out);

    log_summary(&questions);
    Ok(())
}

#[tokio::main]
async fn main() {
    init_logger().expect("Failed to initialize logger");
    let args = Args::parse();

    if let Err(e) = run(args).await {
        tracing::error!("{:#}", e);
        std::process::exit(1);
    }
}
