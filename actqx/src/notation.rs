//! Best-effort transliteration of math notation found in question stems
//! into LaTeX fragments.
//!
//! Two ordered tables drive the conversion. Detection patterns pick raw
//! candidates out of the text; every candidate then goes through all rewrite
//! rules in order. Nothing here validates that the result is well-formed
//! LaTeX.

use regex::Regex;
use std::sync::LazyLock;

/// Candidate detectors, applied in order. Candidates keep the order of the
/// detector that found them, then their position in the text.
static MATH_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    vec![
        // superscript exponent on x, y or z: "x²", "y ³"
        Regex::new(r"[x-z]\s*[²³⁴]").unwrap(),
        // caret exponent on x, y or z: "x^2", "z ^ 10"
        Regex::new(r"[x-z]\s*\^\s*\d+").unwrap(),
        // integer fraction: "3/4", "12 / 5"
        Regex::new(r"\d+\s*/\s*\d+").unwrap(),
        // radical: "√16", "√x"
        Regex::new(r"√\w+").unwrap(),
        // angle: "∠ABC"
        Regex::new(r"∠\w+").unwrap(),
        // comparison and arithmetic glyphs
        Regex::new(r"[≤≥÷×]").unwrap(),
    ]
});

/// Rewrite rules, applied in order to every candidate.
static LATEX_REWRITES: LazyLock<Vec<(Regex, &'static str)>> = LazyLock::new(|| {
    vec![
        (Regex::new(r"([x-z])\s*²").unwrap(), "${1}^2"),
        (Regex::new(r"([x-z])\s*³").unwrap(), "${1}^3"),
        (Regex::new(r"([x-z])\s*⁴").unwrap(), "${1}^4"),
        (Regex::new(r"(\w+)\s*\^\s*(\d+)").unwrap(), "${1}^{${2}}"),
        (Regex::new(r"√\s*(\w+)").unwrap(), r"\sqrt{${1}}"),
        (Regex::new(r"(\d+)\s*/\s*(\d+)").unwrap(), r"\frac{${1}}{${2}}"),
        (Regex::new(r"∠(\w+)").unwrap(), r"\angle ${1}"),
        (Regex::new(r"≤").unwrap(), r"\leq"),
        (Regex::new(r"≥").unwrap(), r"\geq"),
        (Regex::new(r"÷").unwrap(), r"\div"),
        (Regex::new(r"×").unwrap(), r"\times"),
    ]
});

/// Rewrites one raw candidate into its LaTeX form.
pub fn to_latex(candidate: &str) -> String {
    let mut result = candidate.to_string();
    for (regex, replacement) in LATEX_REWRITES.iter() {
        result = regex.replace_all(&result, *replacement).to_string();
    }
    result
}

/// Extracts LaTeX fragments from `text`, in order of first discovery and
/// without duplicates.
///
/// # Examples
///
/// ```
/// use actqx::notation::extract_equations;
///
/// let equations = extract_equations("What is the value of x^2 + 3/4?");
/// assert_eq!(equations, vec!["x^{2}".to_string(), r"\frac{3}{4}".to_string()]);
/// ```
pub fn extract_equations(text: &str) -> Vec<String> {
    let mut equations: Vec<String> = Vec::new();
    for pattern in MATH_PATTERNS.iter() {
        for candidate in pattern.find_iter(text) {
            let latex = to_latex(candidate.as_str());
            if !equations.contains(&latex) {
                equations.push(latex);
            }
        }
    }
    equations
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test_log::test]
    fn test_caret_exponent() {
        assert_eq!(extract_equations("What is the value of x^2 + 3?"), vec!["x^{2}"]);
        assert_eq!(extract_equations("if z ^ 10 = 1"), vec!["z^{10}"]);
    }

    #[test_log::test]
    fn test_superscript_exponent() {
        assert_eq!(extract_equations("Simplify x² + y³"), vec!["x^{2}", "y^{3}"]);
    }

    #[test_log::test]
    fn test_fraction() {
        assert_eq!(extract_equations("What is 3/4 of 12?"), vec![r"\frac{3}{4}"]);
        assert_eq!(extract_equations("add 12 / 5"), vec![r"\frac{12}{5}"]);
    }

    #[test_log::test]
    fn test_radical_and_angle() {
        assert_eq!(extract_equations("Find √16"), vec![r"\sqrt{16}"]);
        assert_eq!(extract_equations("In triangle, ∠ABC is"), vec![r"\angle ABC"]);
    }

    #[test_log::test]
    fn test_glyphs() {
        assert_eq!(
            extract_equations("a ≤ b, c ≥ d, 6 ÷ 2 × 3"),
            vec![r"\leq", r"\geq", r"\div", r"\times"]
        );
    }

    #[test_log::test]
    fn test_no_duplicates() {
        let equations = extract_equations("x^2 plus x^2 plus x² and 1/2 or 1 / 2, ≤ ≤");
        assert_eq!(equations, vec!["x^{2}", r"\frac{1}{2}", r"\leq"]);
        let mut seen = std::collections::HashSet::new();
        assert!(equations.iter().all(|e| seen.insert(e.clone())));
    }

    #[test_log::test]
    fn test_plain_text_has_no_equations() {
        assert!(extract_equations("Which of the following is true?").is_empty());
        assert!(extract_equations("").is_empty());
        // exponents are only recognised on x, y and z
        assert!(extract_equations("a^2 + b^2").is_empty());
    }
}
