//! # ragx API
//!
//! The answering side of ragx: the generation client, the service that
//! turns a question into a prompt and an answer, and the web front end.

pub mod answer;
pub mod generation;
pub mod rest;

pub use answer::{Answer, AnswerConfig, AnswerService};
pub use generation::{GenerationError, Generator, OllamaClient};
pub use rest::RestApi;
