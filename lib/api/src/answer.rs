use ragx_core::{build_prompt, DEFAULT_TOP_K};
use ragx_storage::IndexStore;
use serde::Serialize;
use std::sync::Arc;
use tracing::{info, warn};

use crate::generation::{Generator, DEFAULT_MODEL};

#[derive(Debug, Clone)]
pub struct AnswerConfig {
    pub model: String,
    pub top_k: usize,
}

impl Default for AnswerConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            top_k: DEFAULT_TOP_K,
        }
    }
}

/// Outcome of one question, ready to display
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Answer {
    pub question: String,
    /// Generated answer, or an error message starting with `Error`
    pub answer: String,
    pub contexts: Vec<String>,
    pub error: bool,
}

impl Answer {
    fn failed(question: &str, contexts: Vec<String>, message: String) -> Self {
        Self {
            question: question.to_string(),
            answer: message,
            contexts,
            error: true,
        }
    }
}

/// Retrieval followed by generation, one question at a time
pub struct AnswerService {
    store: Arc<IndexStore>,
    generator: Arc<dyn Generator>,
    config: AnswerConfig,
}

impl AnswerService {
    pub fn new(store: Arc<IndexStore>, generator: Arc<dyn Generator>, config: AnswerConfig) -> Self {
        Self {
            store,
            generator,
            config,
        }
    }

    pub fn store(&self) -> &Arc<IndexStore> {
        &self.store
    }

    pub fn config(&self) -> &AnswerConfig {
        &self.config
    }

    /// Answer `question` from the indexed corpus.
    ///
    /// Never fails: retrieval and generation errors come back as an
    /// [`Answer`] with `error` set and a message in place of the answer.
    pub async fn answer(&self, question: &str) -> Answer {
        let contexts = match self.store.search(question, self.config.top_k) {
            Ok(contexts) => contexts,
            Err(e) => {
                warn!("Retrieval failed for {:?}: {}", question, e);
                return Answer::failed(question, Vec::new(), format!("Error retrieving context: {}", e));
            }
        };

        let prompt = build_prompt(&contexts, question);
        match self.generator.chat(&self.config.model, &prompt).await {
            Ok(text) => {
                info!(
                    "Answered question with {} context passages via {}",
                    contexts.len(),
                    self.generator.name()
                );
                Answer {
                    question: question.to_string(),
                    answer: text,
                    contexts,
                    error: false,
                }
            }
            Err(e) => {
                warn!("{} call failed: {}", self.generator.name(), e);
                let message = format!("Error calling {}: {}", self.generator.name(), e);
                Answer::failed(question, contexts, message)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generation::GenerationError;
    use async_trait::async_trait;
    use ragx_core::{Distance, Document};
    use std::sync::Mutex;

    #[derive(Default)]
    struct EchoGenerator {
        seen: Mutex<Vec<String>>,
    }

    impl EchoGenerator {
        fn last_prompt(&self) -> Option<String> {
            self.seen.lock().unwrap().last().cloned()
        }
    }

    #[async_trait]
    impl Generator for EchoGenerator {
        fn name(&self) -> &str {
            "Echo"
        }

        async fn chat(&self, model: &str, prompt: &str) -> Result<String, GenerationError> {
            self.seen.lock().unwrap().push(prompt.to_string());
            Ok(format!("answered by {}", model))
        }
    }

    struct DownGenerator;

    #[async_trait]
    impl Generator for DownGenerator {
        fn name(&self) -> &str {
            "Ollama"
        }

        async fn chat(&self, _model: &str, _prompt: &str) -> Result<String, GenerationError> {
            Err(GenerationError::Connection {
                url: "http://localhost:11434/api/chat".to_string(),
                reason: "connection refused".to_string(),
            })
        }
    }

    fn store() -> Arc<IndexStore> {
        let documents = vec![
            Document::new("Ohm's law states V=IR"),
            Document::new("Newton's second law is F=ma"),
            Document::new("The mitochondria is the powerhouse of the cell"),
        ];
        Arc::new(IndexStore::from_documents(documents, Distance::Euclidean).unwrap())
    }

    #[tokio::test]
    async fn test_prompt_carries_top_context() {
        let generator = Arc::new(EchoGenerator::default());
        let service = AnswerService::new(store(), generator.clone(), AnswerConfig::default());

        let answer = service.answer("What is Ohm's law?").await;
        assert!(!answer.error);
        assert_eq!(answer.answer, format!("answered by {}", DEFAULT_MODEL));
        assert_eq!(answer.contexts[0], "Ohm's law states V=IR");

        let prompt = generator.last_prompt().unwrap();
        assert!(prompt.contains("Context:\nOhm's law states V=IR\n\n"));
        assert!(prompt.ends_with("Question:\nWhat is Ohm's law?\n"));
    }

    #[tokio::test]
    async fn test_generation_failure_becomes_message() {
        let service = AnswerService::new(store(), Arc::new(DownGenerator), AnswerConfig::default());
        let answer = service.answer("What is Ohm's law?").await;
        assert!(answer.error);
        assert!(answer.answer.starts_with("Error calling Ollama: "));
        assert!(answer.answer.contains("connection refused"));
        assert_eq!(answer.contexts.len(), 3);
    }

    #[tokio::test]
    async fn test_retrieval_failure_becomes_message() {
        let config = AnswerConfig {
            top_k: 0,
            ..AnswerConfig::default()
        };
        let generator = Arc::new(EchoGenerator::default());
        let service = AnswerService::new(store(), generator.clone(), config);
        let answer = service.answer("anything").await;
        assert!(answer.error);
        assert!(answer.answer.starts_with("Error retrieving context: "));
        assert!(generator.last_prompt().is_none());
    }
}
