//! Query answers, including the sentinel outcomes.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::document::DocumentMatch;

/// Response shown when the index holds nothing to search.
pub const NO_DOCUMENTS_MESSAGE: &str = "Please upload relevant documents first.";

/// Response shown when the query was blank.
pub const EMPTY_QUERY_MESSAGE: &str = "Please enter a question to search for.";

/// Response shown when every candidate fell below the similarity threshold.
pub const NO_MATCH_MESSAGE: &str = "No passage in the uploaded documents matched the question.";

/// The outcome of one query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Answer {
    /// The query was empty or whitespace-only; nothing was embedded.
    EmptyQuery,
    /// No documents are indexed.
    NoDocuments,
    /// Fragment mode: no fragment reached the configured similarity threshold.
    NoMatch,
    /// Fragment mode: the best-matching fragment, verbatim.
    Fragment {
        text: String,
        score: f32,
        #[serde(skip_serializing_if = "Option::is_none")]
        source_document: Option<String>,
    },
    /// Document mode: documents ranked by descending score.
    Documents { matches: Vec<DocumentMatch> },
}

impl Answer {
    /// Whether this answer is one of the sentinel outcomes.
    pub fn is_sentinel(&self) -> bool {
        matches!(self, Self::EmptyQuery | Self::NoDocuments | Self::NoMatch)
    }
}

impl fmt::Display for Answer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyQuery => f.write_str(EMPTY_QUERY_MESSAGE),
            Self::NoDocuments => f.write_str(NO_DOCUMENTS_MESSAGE),
            Self::NoMatch => f.write_str(NO_MATCH_MESSAGE),
            Self::Fragment { text, .. } => {
                write!(f, "Based on the documentation, here's a suggestion:\n\n{text}")
            }
            Self::Documents { matches } if matches.is_empty() => {
                f.write_str("No documents matched the query.")
            }
            Self::Documents { matches } => {
                for (rank, m) in matches.iter().enumerate() {
                    if rank > 0 {
                        writeln!(f)?;
                    }
                    write!(
                        f,
                        "{}. {} [{}] (score {:.3})\n   {}",
                        rank + 1,
                        m.filename,
                        m.category,
                        m.score,
                        m.snippet
                    )?;
                }
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::category::Category;

    #[test]
    fn fragment_answer_keeps_text_verbatim() {
        let answer = Answer::Fragment {
            text: "Re-seat the antenna cable".to_string(),
            score: 0.9,
            source_document: None,
        };
        assert_eq!(
            answer.to_string(),
            "Based on the documentation, here's a suggestion:\n\nRe-seat the antenna cable"
        );
    }

    #[test]
    fn sentinels_render_fixed_messages() {
        assert_eq!(Answer::NoDocuments.to_string(), NO_DOCUMENTS_MESSAGE);
        assert_eq!(Answer::EmptyQuery.to_string(), EMPTY_QUERY_MESSAGE);
        assert!(Answer::NoDocuments.is_sentinel());
    }

    #[test]
    fn document_answer_lists_ranked_matches() {
        let answer = Answer::Documents {
            matches: vec![
                DocumentMatch {
                    filename: "a.txt".into(),
                    category: Category::Report,
                    score: 0.91,
                    snippet: "Survey summary".into(),
                },
                DocumentMatch {
                    filename: "b.pdf".into(),
                    category: Category::General,
                    score: 0.12,
                    snippet: "Misc".into(),
                },
            ],
        };
        let rendered = answer.to_string();
        assert!(rendered.starts_with("1. a.txt [Report] (score 0.910)"));
        assert!(rendered.contains("2. b.pdf [General] (score 0.120)"));
    }

    #[test]
    fn serializes_with_kind_tag() {
        let json = serde_json::to_value(Answer::NoDocuments).unwrap();
        assert_eq!(json, serde_json::json!({ "kind": "no_documents" }));
    }
}
