use std::time::Duration;

use async_trait::async_trait;
use log::{debug, error, trace};
use serde::{Deserialize, Serialize};

use crate::error::ProviderError;
use crate::request::{Request, Response};
use crate::runner::Backend;

use super::http;

pub const MISTRAL_API_BASE: &str
  = "https://api.mistral.ai/v1";

pub const DEFAULT_MODEL: &str = "mistral-small-latest";

// ===== Message Types =====

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage
{   pub role: String
  , /// Null when the model returned no text
    #[serde(default)]
    pub content: Option<String>
}

#[derive(Debug, Clone, Serialize)]
pub struct MistralChatRequest
{   pub model: String
  , pub messages: Vec<ChatMessage>
  , pub stream: bool
}

#[derive(Debug, Clone, Deserialize)]
pub struct MistralChatResponse
{   #[serde(default)]
    pub choices: Vec<Choice>
}

#[derive(Debug, Clone, Deserialize)]
pub struct Choice
{   pub message: ChatMessage
  , pub finish_reason: Option<String>
}

impl MistralChatRequest
{   /// A single user turn carrying the prompt
    pub fn single_turn(request: &Request) -> Self
    {   MistralChatRequest
        {   model: request.model.clone()
          , messages: vec![
              ChatMessage
              {   role: "user".to_string()
                , content: Some(request.prompt.clone())
              }
            ]
          , stream: false
        }
    }
}

// ===== Backend =====

/// Backend for the Mistral chat-completions API
#[derive(Debug, Clone)]
pub struct MistralBackend
{   api_key: String
  , api_base: String
  , http_client: reqwest::Client
}

impl MistralBackend
{   pub fn new(
      api_key: impl Into<String>
    , api_base: Option<String>
    , timeout: Option<Duration>
    ) -> Result<Self, ProviderError>
    {   debug!("Creating MistralBackend");
        let api_base = http::normalize_base(
          api_base.as_deref().unwrap_or(MISTRAL_API_BASE)
        );
        Ok(MistralBackend
        {   api_key: api_key.into()
          , api_base
          , http_client: http::build_client(timeout)?
        })
    }

    pub fn api_base(&self) -> &str
    {   &self.api_base
    }
}

#[async_trait]
impl Backend for MistralBackend
{   type Error = ProviderError;

    async fn generate(&self, request: &Request)
      -> Result<Response, ProviderError>
    {   debug!("Mistral generate for: {}", request.model);

        if self.api_key.is_empty()
        {   error!("No API key for model: {}", request.model);
            return Err(ProviderError::MissingApiKey(
              format!("Mistral:{}", request.model)
            ));
        }

        let body = MistralChatRequest::single_turn(request);
        trace!("Mistral request: {:?}", body);

        let reply: MistralChatResponse = http::post_json(
          &self.http_client,
          &format!("{}/chat/completions", self.api_base),
          &self.api_key,
          &body
        ).await?;

        reply.choices.into_iter()
          .next()
          .map(|c| {
            trace!("Finish reason: {:?}", c.finish_reason);
            Response::new(c.message.content.unwrap_or_default())
          })
          .ok_or_else(|| {
            error!("No choices in response");
            ProviderError::NoChoicesInResponse
          })
    }
}
