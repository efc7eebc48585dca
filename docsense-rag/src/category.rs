//! Coarse content-based document categories for document-mode results.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A coarse label describing what kind of document a text is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Troubleshooting,
    Procedure,
    Report,
    Reference,
    General,
}

impl Category {
    /// Human-readable label.
    pub fn label(self) -> &'static str {
        match self {
            Self::Troubleshooting => "Troubleshooting",
            Self::Procedure => "Procedure",
            Self::Report => "Report",
            Self::Reference => "Reference",
            Self::General => "General",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// Order matters: ties go to the earlier entry.
const KEYWORDS: &[(Category, &[&str])] = &[
    (
        Category::Troubleshooting,
        &[
            "troubleshoot",
            "troubleshooting",
            "error",
            "errors",
            "fault",
            "failure",
            "issue",
            "issues",
            "problem",
            "fix",
            "symptom",
            "diagnose",
        ],
    ),
    (
        Category::Procedure,
        &["step", "steps", "procedure", "install", "setup", "configure", "calibrate", "how"],
    ),
    (
        Category::Report,
        &["report", "summary", "findings", "results", "survey", "analysis", "conclusion"],
    ),
    (
        Category::Reference,
        &["specification", "reference", "manual", "table", "appendix", "glossary", "standard"],
    ),
];

/// Label `text` with the category whose keywords occur most often.
///
/// Matching is case-insensitive and whole-word. Text without any keyword is
/// [`Category::General`].
pub fn categorize(text: &str) -> Category {
    let mut counts = [0usize; KEYWORDS.len()];
    for word in text.split(|c: char| !c.is_alphanumeric()).filter(|w| !w.is_empty()) {
        let word = word.to_lowercase();
        for (slot, (_, keywords)) in counts.iter_mut().zip(KEYWORDS) {
            if keywords.contains(&word.as_str()) {
                *slot += 1;
            }
        }
    }

    let mut best = Category::General;
    let mut best_count = 0;
    for (count, (category, _)) in counts.iter().zip(KEYWORDS) {
        if *count > best_count {
            best = *category;
            best_count = *count;
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn picks_dominant_category() {
        assert_eq!(
            categorize("If the receiver shows an error, troubleshoot the fault first."),
            Category::Troubleshooting
        );
        assert_eq!(
            categorize("Step 1: install the tripod. Step 2: calibrate."),
            Category::Procedure
        );
        assert_eq!(categorize("Survey findings and summary of results"), Category::Report);
    }

    #[test]
    fn falls_back_to_general() {
        assert_eq!(categorize("lorem ipsum dolor sit amet"), Category::General);
        assert_eq!(categorize(""), Category::General);
    }

    #[test]
    fn ties_prefer_earlier_category() {
        assert_eq!(categorize("error report"), Category::Troubleshooting);
    }

    #[test]
    fn display_uses_label() {
        assert_eq!(Category::Reference.to_string(), "Reference");
    }
}
