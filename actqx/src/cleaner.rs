//! Text normalization for raw `pdftotext` fragments.
//!
//! This module provides functionality for:
//! - Removing the copyright and reproduction notices printed on every page
//! - Collapsing whitespace runs into single spaces
//! - Recovering negative numbers that the test booklet typesets as `_ 11`

use regex::Regex;
use std::sync::LazyLock;

/// Boilerplate notices removed from every fragment. Both can wrap across
/// lines, so they are matched after whitespace has been collapsed.
/// - "© 2023 by ACT, Inc. All rights reserved."
/// - "No part of this test may be copied, reproduced, ... or transferred."
static NOTICE_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    vec![
        Regex::new(r"(?s)©.*?All rights reserved\.").unwrap(),
        Regex::new(r"(?s)No part of.*?transferred\.").unwrap(),
    ]
});

static WHITESPACE_RUN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

/// `_11` and `_ 11` are how the booklet's text layer encodes `-11`.
static UNDERSCORE_MINUS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"_\s*(\d+)").unwrap());

fn collapse_whitespace(text: &str) -> String {
    WHITESPACE_RUN.replace_all(text, " ").to_string()
}

fn remove_notices(text: &str) -> String {
    let mut result = text.to_string();
    for regex in NOTICE_PATTERNS.iter() {
        result = regex.replace_all(&result, "").to_string();
    }
    result
}

/// Removes boilerplate notices, collapses whitespace and trims.
///
/// Removal runs until the text stops changing, so `normalize` is idempotent
/// even when dropping one notice joins the pieces of another.
///
/// # Arguments
///
/// * `raw` - A raw text fragment, possibly spanning several lines.
///
/// # Returns
///
/// The normalized text, possibly empty.
pub fn normalize(raw: &str) -> String {
    let mut current = collapse_whitespace(raw);
    loop {
        let next = collapse_whitespace(&remove_notices(&current));
        if next == current {
            break;
        }
        current = next;
    }
    current.trim().to_string()
}

/// Cleans the text of one multiple-choice option: underscore minus signs are
/// rewritten (`_ 11` -> `-11`) and the result is normalized.
pub fn clean_option_text(raw: &str) -> String {
    let text = UNDERSCORE_MINUS.replace_all(raw, "-$1");
    normalize(&text)
}
