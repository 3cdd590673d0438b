//! Single-shot prompt execution.
//!
//! [`run`] sends one prompt to one model through an injected
//! [`Backend`] and hands back the generated text untouched. Hosted
//! backends for OpenAI and Mistral live in [`providers`].

pub mod error;
pub mod config;
pub mod providers;
pub mod request;
pub mod runner;

use serde::{Deserialize, Serialize};

pub use error::{Error, ProviderError};
pub use request::{Request, Response};
pub use runner::{run, Backend};

/// Hosted services a backend can be built for
///
/// Serialized as `openai` / `mistral`, the same names `FromStr` accepts;
/// the variant spellings are read too.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Hash)]
pub enum Provider
{   /// OpenAI Responses API (GPT-5, GPT-4.1, o-series)
    #[serde(rename = "openai", alias = "OpenAI")]
    OpenAI
  , /// Mistral AI chat completions
    #[serde(rename = "mistral", alias = "MistralAi", alias = "mistralai")]
    MistralAi
}

impl Provider
{   pub fn default_model(&self) -> &'static str
    {   match self
        {   Provider::OpenAI => providers::openai::DEFAULT_MODEL
          , Provider::MistralAi => providers::mistral::DEFAULT_MODEL
        }
    }

    pub fn default_api_key_env(&self) -> &'static str
    {   match self
        {   Provider::OpenAI => "OPENAI_API_KEY"
          , Provider::MistralAi => "MISTRAL_API_KEY"
        }
    }
}

impl std::str::FromStr for Provider
{   type Err = ProviderError;

    fn from_str(s: &str) -> Result<Self, Self::Err>
    {   match s.to_ascii_lowercase().as_str()
        {   "openai" => Ok(Provider::OpenAI)
          , "mistral" | "mistralai" => Ok(Provider::MistralAi)
          , other => Err(ProviderError::InvalidConfiguration(
              format!("unknown provider: {}", other)
            ))
        }
    }
}
