//! Prompt templates for RAG generation

use crate::types::Document;

/// Instruction line that opens every question-answering prompt
pub const QA_INSTRUCTION: &str = "Answer the question using ONLY context below.";

/// Prompt builder for RAG queries
pub struct PromptBuilder;

impl PromptBuilder {
    /// Join retrieved document texts with newlines, keeping retrieval order
    pub fn build_context(documents: &[Document]) -> String {
        documents
            .iter()
            .map(Document::content)
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Build the question-answering prompt: instruction, context, then question
    pub fn build_qa_prompt(context: &str, question: &str) -> String {
        format!(
            r#"{instruction}

Context:
{context}

Question:
{question}
"#,
            instruction = QA_INSTRUCTION,
            context = context,
            question = question
        )
    }
}
