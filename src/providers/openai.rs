use std::time::Duration;

use async_trait::async_trait;
use log::{debug, error, trace};
use serde::{Deserialize, Serialize};

use crate::error::ProviderError;
use crate::request::{Request, Response};
use crate::runner::Backend;

use super::http;

pub const OPENAI_API_BASE: &str
  = "https://api.openai.com/v1";

pub const DEFAULT_MODEL: &str = "gpt-5.2";

// ===== Wire Types =====

#[derive(Debug, Clone, Serialize)]
pub struct ResponsesRequest<'a>
{   pub model: &'a str
  , pub input: &'a str
}

#[derive(Debug, Clone, Deserialize)]
pub struct ResponsesResponse
{   #[serde(default)]
    pub output: Option<Vec<OutputItem>>
  , /// Convenience aggregate some gateways include
    #[serde(default)]
    pub output_text: Option<String>
  , #[serde(default)]
    pub status: Option<String>
}

#[derive(Debug, Clone, Deserialize)]
pub struct OutputItem
{   #[serde(rename = "type")]
    pub kind: String
  , #[serde(default)]
    pub content: Vec<OutputContent>
}

#[derive(Debug, Clone, Deserialize)]
pub struct OutputContent
{   #[serde(rename = "type")]
    pub kind: String
  , #[serde(default)]
    pub text: Option<String>
}

impl ResponsesResponse
{   /// Concatenate every `output_text` part of every `message` item
    pub fn output_text(self) -> Result<String, ProviderError>
    {   match (self.output, self.output_text)
        {   (Some(items), _) => {
              let text = items.iter()
                .filter(|item| item.kind == "message")
                .flat_map(|item| item.content.iter())
                .filter(|part| part.kind == "output_text")
                .filter_map(|part| part.text.as_deref())
                .collect::<String>();
              Ok(text)
            }
          , (None, Some(text)) => Ok(text)
          , (None, None) => {
              error!("Response had neither output nor output_text");
              Err(ProviderError::ParseError(
                "response contained no output".to_string()
              ))
            }
        }
    }
}

// ===== Backend =====

/// Backend for the OpenAI Responses API
#[derive(Debug, Clone)]
pub struct OpenAiBackend
{   api_key: String
  , api_base: String
  , http_client: reqwest::Client
}

impl OpenAiBackend
{   pub fn new(
      api_key: impl Into<String>
    , api_base: Option<String>
    , timeout: Option<Duration>
    ) -> Result<Self, ProviderError>
    {   debug!("Creating OpenAiBackend");
        let api_base = http::normalize_base(
          api_base.as_deref().unwrap_or(OPENAI_API_BASE)
        );
        Ok(OpenAiBackend
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
impl Backend for OpenAiBackend
{   type Error = ProviderError;

    async fn generate(&self, request: &Request)
      -> Result<Response, ProviderError>
    {   debug!("OpenAI generate for: {}", request.model);

        if self.api_key.is_empty()
        {   error!("No API key for OpenAI");
            return Err(ProviderError::MissingApiKey(
              format!("OpenAI:{}", request.model)
            ));
        }

        let body = ResponsesRequest
        {   model: &request.model
          , input: &request.prompt
        };
        trace!("OpenAI request: {:?}", body);

        let reply: ResponsesResponse = http::post_json(
          &self.http_client,
          &format!("{}/responses", self.api_base),
          &self.api_key,
          &body
        ).await?;

        trace!("OpenAI response status: {:?}", reply.status);
        Ok(Response::new(reply.output_text()?))
    }
}
