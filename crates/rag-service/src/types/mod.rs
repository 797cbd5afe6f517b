//! Core types for the RAG service

pub mod document;

pub use document::Document;
