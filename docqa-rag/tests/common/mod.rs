//! Deterministic embedding gateways shared by the integration tests.

#![allow(dead_code)]

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Mutex;

use async_trait::async_trait;
use docqa_rag::{EmbeddingGateway, RagError, Result};

/// Unit basis vector `e_index` of the given dimension.
pub fn unit(dims: usize, index: usize) -> Vec<f32> {
    let mut v = vec![0.0; dims];
    v[index] = 1.0;
    v
}

/// Returns `e_i` for the text at batch position `i`, unless the text is a
/// registered question, in which case its registered vector is returned.
pub struct OrdinalGateway {
    dims: usize,
    questions: HashMap<String, Vec<f32>>,
    calls: Mutex<Vec<(String, Vec<String>)>>,
}

impl OrdinalGateway {
    pub fn new(dims: usize) -> Self {
        Self { dims, questions: HashMap::new(), calls: Mutex::new(Vec::new()) }
    }

    pub fn with_question(mut self, question: &str, embedding: Vec<f32>) -> Self {
        self.questions.insert(question.to_string(), embedding);
        self
    }

    /// Every `(model, texts)` pair this gateway was called with.
    pub fn calls(&self) -> Vec<(String, Vec<String>)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl EmbeddingGateway for OrdinalGateway {
    async fn embed(&self, model: &str, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        self.calls
            .lock()
            .unwrap()
            .push((model.to_string(), texts.iter().map(|t| t.to_string()).collect()));

        Ok(texts
            .iter()
            .enumerate()
            .map(|(i, text)| {
                self.questions.get(*text).cloned().unwrap_or_else(|| unit(self.dims, i % self.dims))
            })
            .collect())
    }

    fn name(&self) -> &str {
        "ordinal"
    }
}

/// Fails every call.
pub struct FailingGateway;

#[async_trait]
impl EmbeddingGateway for FailingGateway {
    async fn embed(&self, _model: &str, _texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        Err(RagError::EmbeddingError {
            provider: "failing".to_string(),
            message: "API returned 503 Service Unavailable".to_string(),
        })
    }

    fn name(&self) -> &str {
        "failing"
    }
}

/// Succeeds with no vectors at all.
pub struct EmptyGateway;

#[async_trait]
impl EmbeddingGateway for EmptyGateway {
    async fn embed(&self, _model: &str, _texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        Ok(Vec::new())
    }

    fn name(&self) -> &str {
        "empty"
    }
}

/// 1500 characters without whitespace; every 100-character run uses one letter.
pub fn sample_text() -> String {
    (0..1500).map(|i| (b'a' + (i / 100) as u8) as char).collect()
}

/// Write `contents` to `name` inside a fresh temporary directory.
pub fn write_document(name: &str, contents: &[u8]) -> (tempfile::TempDir, PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(name);
    std::fs::write(&path, contents).unwrap();
    (dir, path)
}
