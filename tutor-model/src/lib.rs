//! LLM provider integrations for the tutor workspace.
//!
//! Currently ships [`GroqClient`], a chat-completions client for the Groq API
//! and any OpenAI-compatible endpoint.

pub mod groq;

pub use groq::GroqClient;
