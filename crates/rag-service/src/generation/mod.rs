//! Answer generation from retrieved context

pub mod answerer;
pub mod prompt;

pub use answerer::Answerer;
pub use prompt::PromptBuilder;
