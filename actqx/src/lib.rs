//! # ACT Question eXtractor (actqx)
//!
//! The `actqx` library extracts math questions from the ACT practice test
//! PDF: question stems, lettered options, answer-key letters, LaTeX
//! fragments of simple notation and a rendered image of each page holding
//! questions.
//!
//! ## Quick Start
//!
//! ### Pre-requirements
//! - Poppler: `sudo apt install poppler-utils`
//!
//! ### Installation
//! Add the library to your project's dependencies in the `Cargo.toml` file:
//!
//! ```bash
//! cargo add actqx
//! ```
//!
//! ## Examples
//!
//! ```rust,no_run
//! # use actqx::config::{ExtractorConfig, DEFAULT_SOURCE_URL};
//! # use actqx::parser::{parse, questions2json};
//! # async fn try_main() -> anyhow::Result<()> {
//! let mut config = ExtractorConfig::new();
//! let verbose = true;
//! let questions = parse(DEFAULT_SOURCE_URL, &mut config, verbose).await?; // Vec<Question>
//! let json = questions2json(&questions)?; // String
//! # Ok(())
//! # }
//! # #[tokio::main]
//! # async fn main() {
//! #    try_main().await.unwrap();
//! # }
//! ```
//!
//! The core works on plain text and can be driven without poppler:
//!
//! ```rust
//! use actqx::answer_key::parse_answer_key;
//! use actqx::builder::{build_question, ExtractionContext};
//! use actqx::segmenter::segment_page;
//!
//! let ctx = ExtractionContext::new(parse_answer_key("Answer Key 1 C"));
//! let page = "1. What is 3/4 of 12?\nA. 6\nB. 8\nC. 9\nD. 12";
//! let spans = segment_page(page);
//! let span = &spans[0];
//! let question = build_question(span.number, &span.text, 1, None, &ctx).unwrap();
//! assert_eq!(question.options.len(), 4);
//! assert_eq!(question.equations, vec![r"\frac{3}{4}".to_string()]);
//! ```
//!
//! ## Tests
//!
//! ```sh
//! cargo test
//! ```
//! Tests that need poppler-utils skip themselves when the commands are missing.

pub mod answer_key;
pub mod builder;
pub mod classifier;
pub mod cleaner;
pub mod config;
pub mod converter;
pub mod models;
pub mod notation;
pub mod parser;
pub mod segmenter;
pub mod test_utils;
