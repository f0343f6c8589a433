use async_openai::{
    Client, config::OpenAIConfig, types::CreateEmbeddingRequestArgs,
};
use tracing::debug;

use crate::{
    config::ApiConfig,
    error::{Error, Result},
};

/// Maximum number of inputs sent per embeddings request.
const BATCH_SIZE: usize = 64;

/// Client for an OpenAI-compatible embeddings endpoint.
pub struct EmbeddingClient {
    client: Client<OpenAIConfig>,
    model: String,
    dimensions: u32,
}

impl EmbeddingClient {
    /// Build a client from an explicit configuration value.
    pub fn new(config: &ApiConfig) -> Self {
        let openai_config = OpenAIConfig::new()
            .with_api_key(&config.api_key)
            .with_api_base(&config.base_url);

        Self {
            client: Client::with_config(openai_config),
            model: config.model.clone(),
            dimensions: config.dimensions,
        }
    }

    /// Embed a batch of document chunks, preserving input order.
    pub async fn embed_documents(
        &self,
        texts: &[String],
    ) -> Result<Vec<Vec<f32>>> {
        let mut embeddings = Vec::with_capacity(texts.len());

        for batch in texts.chunks(BATCH_SIZE) {
            let request = CreateEmbeddingRequestArgs::default()
                .model(&self.model)
                .dimensions(self.dimensions)
                .input(batch.to_vec())
                .build()?;

            let response = self.client.embeddings().create(request).await?;
            if response.data.len() != batch.len() {
                return Err(Error::Embedding(format!(
                    "requested {} embeddings, received {}",
                    batch.len(),
                    response.data.len()
                )));
            }

            debug!(batch = batch.len(), "embedded chunk batch");
            embeddings.extend(response.data.into_iter().map(|d| d.embedding));
        }

        Ok(embeddings)
    }

    /// Embed a single query string.
    pub async fn embed_query(&self, text: &str) -> Result<Vec<f32>> {
        let request = CreateEmbeddingRequestArgs::default()
            .model(&self.model)
            .dimensions(self.dimensions)
            .input([text])
            .build()?;

        let response = self.client.embeddings().create(request).await?;

        response
            .data
            .into_iter()
            .next()
            .map(|d| d.embedding)
            .ok_or_else(|| {
                Error::Embedding("no embedding data received".into())
            })
    }
}

impl std::fmt::Debug for EmbeddingClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EmbeddingClient")
            .field("model", &self.model)
            .field("dimensions", &self.dimensions)
            .finish_non_exhaustive()
    }
}
