//! Grounded question answering over the ingested documents.
//!
//! Builds a prompt that confines the model to the stored chunks, sends it
//! through a [`GenerativeClient`], and records the exchange as a [`Chat`].
//! The client is a trait so tests (and alternative providers) can stand in
//! for the real API.

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use tracing::warn;
use uuid::Uuid;

use crate::models::{AppState, Chat, DEFAULT_MODEL};

/// Separator between document chunks in the prompt context block.
pub const CONTEXT_SEPARATOR: &str = "\n---\n";

/// A text-generation backend: one prompt in, one completion out.
#[async_trait]
pub trait GenerativeClient: Send + Sync {
    async fn generate(&self, prompt: &str, model: &str, api_key: &str) -> Result<String>;
}

/// Assemble the grounding prompt from the user query and the context
/// chunks. The model is told to answer only from the excerpts and to admit
/// when they do not contain the answer.
pub fn build_prompt(query: &str, chunks: &[String]) -> String {
    format!(
        "You are a helpful AI assistant that answers questions based on the provided document excerpts.\n\
         \n\
         Use the following document excerpts as context to answer the question. \
         If the answer is not found in the excerpts, say \"I could not find an answer in the provided documents.\" \
         Do not make up information.\n\
         \n\
         Context:\n\
         ---\n\
         {}\n\
         \n\
         Question: {}",
        chunks.join(CONTEXT_SEPARATOR),
        query
    )
}

/// Answer `query` against every chunk of every stored document.
///
/// Fails fast when no API key is configured. The configured model is tried
/// first; on failure the request is retried once against [`DEFAULT_MODEL`],
/// and only if that also fails does the whole call error. The returned
/// [`Chat`] is not appended to the state; the caller decides whether to
/// keep it.
pub async fn answer_query(
    client: &dyn GenerativeClient,
    state: &AppState,
    query: &str,
) -> Result<Chat> {
    if state.settings.api_key.is_empty() {
        bail!("no API key configured; set one with `raginfo settings set --api-key <KEY>`");
    }

    let chunks: Vec<String> = state
        .files
        .iter()
        .flat_map(|f| f.chunks.iter().cloned())
        .collect();
    let prompt = build_prompt(query, &chunks);

    let model = &state.settings.model;
    let response = match client.generate(&prompt, model, &state.settings.api_key).await {
        Ok(r) => r,
        Err(e) => {
            warn!("model {model} failed, retrying with {DEFAULT_MODEL}: {e:#}");
            client
                .generate(&prompt, DEFAULT_MODEL, &state.settings.api_key)
                .await
                .with_context(|| format!("fallback model {DEFAULT_MODEL} also failed"))?
        }
    };

    Ok(Chat {
        id: Uuid::new_v4().to_string(),
        user_query: query.to_string(),
        ai_response: response,
    })
}
