//! Question records and the question bank loaded once per process.

use std::collections::BTreeSet;
use std::path::Path;

use derive_getters::Getters;
use derive_new::new;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

use crate::ConfigError;

/// Category label meaning "every question, regardless of category".
pub const ALL_CATEGORIES: &str = "all";

/// An immutable quiz question in its authoritative option order.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize, Deserialize, new)]
pub struct Question {
    /// Question identifier.
    id: u32,
    /// Category label (e.g. "Networking").
    category: String,
    /// Prompt text.
    text: String,
    /// Option texts, in authoritative order.
    options: Vec<String>,
    /// Index of the correct option within `options`.
    answer: usize,
}

impl Question {
    /// Returns true when `answer` points at an existing option.
    pub fn has_valid_answer(&self) -> bool {
        self.answer < self.options.len()
    }
}

/// On-disk layout of a question file.
#[derive(Debug, Deserialize)]
struct QuestionFile {
    questions: Vec<Question>,
}

/// The ordered set of questions shared by every session.
#[derive(Debug, Clone, Default)]
pub struct QuestionBank {
    questions: Vec<Question>,
}

impl QuestionBank {
    /// Creates a bank from an already-loaded question list.
    #[instrument(skip(questions), fields(count = questions.len()))]
    pub fn new(questions: Vec<Question>) -> Self {
        for q in questions.iter().filter(|q| !q.has_valid_answer()) {
            warn!(
                question_id = q.id,
                answer = q.answer,
                options = q.options.len(),
                "Question answer index is out of range; it can never be answered correctly"
            );
        }
        Self { questions }
    }

    /// Loads questions from a JSON file shaped like `{"questions": [...]}`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the file cannot be read or parsed.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        debug!("Loading questions from file");
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::new(format!("Failed to read question file: {}", e)))?;

        let file: QuestionFile = serde_json::from_str(&content)
            .map_err(|e| ConfigError::new(format!("Failed to parse question file: {}", e)))?;

        info!(count = file.questions.len(), "Questions loaded");
        Ok(Self::new(file.questions))
    }

    /// Loads questions from `path`, falling back to [`QuestionBank::defaults`]
    /// when the file is missing or corrupt.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        match Self::from_file(path) {
            Ok(bank) => bank,
            Err(e) => {
                warn!(error = %e, "Could not load questions, using built-in defaults");
                Self::defaults()
            }
        }
    }

    /// The built-in sample set: five questions across four categories.
    #[instrument]
    pub fn defaults() -> Self {
        let q = |id, category: &str, text: &str, options: &[&str], answer| {
            Question::new(
                id,
                category.to_string(),
                text.to_string(),
                options.iter().map(|o| o.to_string()).collect(),
                answer,
            )
        };
        Self::new(vec![
            q(
                1,
                "Networking",
                "Which protocol is used to secure HTTP?",
                &["SSL/TLS", "FTP", "SMTP", "DNS"],
                0,
            ),
            q(
                2,
                "Cryptography",
                "What is AES?",
                &[
                    "A hash function",
                    "A symmetric cipher",
                    "An asymmetric cipher",
                    "A network protocol",
                ],
                1,
            ),
            q(
                3,
                "Systems",
                "Which port does SSH use by default?",
                &["21", "22", "23", "25"],
                1,
            ),
            q(
                4,
                "Web",
                "What is an XSS attack?",
                &[
                    "Cross-Site Scripting",
                    "Cross-Site Security",
                    "eXtreme Site Security",
                    "eXternal Script Source",
                ],
                0,
            ),
            q(
                5,
                "Cryptography",
                "How many bits are in a SHA-256 digest?",
                &["128", "192", "256", "512"],
                2,
            ),
        ])
    }

    /// Returns every question in load order.
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    /// Returns the number of loaded questions.
    pub fn len(&self) -> usize {
        self.questions.len()
    }

    /// Returns true when no questions are loaded.
    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    /// Returns the questions for a category label, preserving order.
    ///
    /// [`ALL_CATEGORIES`] and the empty string select every question.
    #[instrument(skip(self))]
    pub fn for_category(&self, category: &str) -> Vec<Question> {
        if category.is_empty() || category == ALL_CATEGORIES {
            return self.questions.clone();
        }
        let selected: Vec<Question> = self
            .questions
            .iter()
            .filter(|q| q.category == category)
            .cloned()
            .collect();
        debug!(count = selected.len(), "Questions selected for category");
        selected
    }

    /// Returns the distinct category labels, sorted.
    #[instrument(skip(self))]
    pub fn categories(&self) -> Vec<String> {
        self.questions
            .iter()
            .map(|q| q.category.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_span_four_categories() {
        let bank = QuestionBank::defaults();
        assert_eq!(bank.len(), 5);
        assert_eq!(
            bank.categories(),
            vec!["Cryptography", "Networking", "Systems", "Web"]
        );
    }

    #[test]
    fn for_category_filters_and_keeps_order() {
        let bank = QuestionBank::defaults();
        let net = bank.for_category("Networking");
        assert_eq!(net.iter().map(|q| *q.id()).collect::<Vec<_>>(), vec![1]);
        let crypto = bank.for_category("Cryptography");
        assert_eq!(crypto.iter().map(|q| *q.id()).collect::<Vec<_>>(), vec![2, 5]);
        assert_eq!(bank.for_category(ALL_CATEGORIES).len(), 5);
        assert_eq!(bank.for_category("").len(), 5);
        assert!(bank.for_category("Forensics").is_empty());
    }

    #[test]
    fn from_file_parses_question_json() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        write!(
            file,
            r#"{{"questions": [{{"id": 7, "category": "Web", "text": "Q?", "options": ["a", "b"], "answer": 1}}]}}"#
        )
        .expect("write");

        let bank = QuestionBank::from_file(file.path()).expect("load");
        assert_eq!(bank.len(), 1);
        let q = &bank.questions()[0];
        assert_eq!(*q.id(), 7);
        assert_eq!(q.options(), &vec!["a".to_string(), "b".to_string()]);
        assert_eq!(*q.answer(), 1);
    }

    #[test]
    fn corrupt_file_falls_back_to_defaults() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        write!(file, "not json").expect("write");
        assert!(QuestionBank::from_file(file.path()).is_err());
        assert_eq!(QuestionBank::load_or_default(file.path()).len(), 5);
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let bank = QuestionBank::load_or_default("/definitely/not/here.json");
        assert_eq!(bank.len(), 5);
    }
}
