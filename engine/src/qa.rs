use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QaPair {
    pub dataset_id: String,
    pub question: String,
    pub answer: String,
}

/// Output document of a run; replaces any previous corpus file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QaCorpus {
    pub created_at: String, // RFC 3339, UTC
    pub source_url: String,
    pub qa_pairs: Vec<QaPair>,
}

/// Accumulates pairs for one dataset, stamping each with its id.
pub struct QaSink {
    dataset_id: String,
    pairs: Vec<QaPair>,
}

impl QaSink {
    pub fn new(dataset_id: &str) -> Self {
        Self { dataset_id: dataset_id.to_string(), pairs: Vec::new() }
    }

    pub fn push(&mut self, question: impl Into<String>, answer: impl Into<String>) {
        self.pairs.push(QaPair {
            dataset_id: self.dataset_id.clone(),
            question: question.into(),
            answer: answer.into(),
        });
    }

    pub fn len(&self) -> usize { self.pairs.len() }
    pub fn is_empty(&self) -> bool { self.pairs.is_empty() }

    pub fn into_pairs(self) -> Vec<QaPair> { self.pairs }
}
