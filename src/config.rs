//! Configuration for selecting and building a backend

use std::path::Path;
use std::time::Duration;

use log::{debug, error};
use serde::{Deserialize, Serialize};

use crate::error::ProviderError;
use crate::Provider;

/// Provider configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderConfig
{   /// Hosted service to target
    pub provider: Provider
  , /// Model identifier (falls back to the provider default)
    #[serde(default)]
    pub model: Option<String>
  , /// API base URL (if custom)
    #[serde(default)]
    pub api_base: Option<String>
  , /// Request timeout in seconds
    #[serde(default)]
    pub timeout_secs: Option<u64>
  , /// Environment variable holding the API key
    #[serde(default)]
    pub api_key_env: Option<String>
}

impl ProviderConfig
{   pub fn new(provider: Provider) -> Self
    {   ProviderConfig
        {   provider
          , model: None
          , api_base: None
          , timeout_secs: None
          , api_key_env: None
        }
    }

    /// Load a configuration from a JSON file
    pub fn from_json_file(path: impl AsRef<Path>)
      -> Result<Self, ProviderError>
    {   let path = path.as_ref();
        debug!("Loading config from {}", path.display());
        let raw = std::fs::read_to_string(path).map_err(|e| {
          error!("Cannot read {}: {}", path.display(), e);
          ProviderError::InvalidConfiguration(
            format!("{}: {}", path.display(), e)
          )
        })?;
        Self::from_json_str(&raw)
    }

    pub fn from_json_str(raw: &str) -> Result<Self, ProviderError>
    {   serde_json::from_str(raw).map_err(|e| {
          error!("Invalid config JSON: {}", e);
          ProviderError::InvalidConfiguration(e.to_string())
        })
    }

    pub fn model(&self) -> &str
    {   self.model.as_deref()
          .unwrap_or_else(|| self.provider.default_model())
    }

    pub fn api_key_env(&self) -> &str
    {   self.api_key_env.as_deref()
          .unwrap_or_else(|| self.provider.default_api_key_env())
    }

    pub fn timeout(&self) -> Option<Duration>
    {   self.timeout_secs.map(Duration::from_secs)
    }

    /// Read the API key named by [`Self::api_key_env`]
    pub fn api_key_from_env(&self) -> Result<String, ProviderError>
    {   let var = self.api_key_env();
        match std::env::var(var)
        {   Ok(key) if !key.is_empty() => Ok(key)
          , _ => {
              error!("Environment variable {} not set", var);
              Err(ProviderError::MissingApiKey(var.to_string()))
            }
        }
    }
}

impl Default for ProviderConfig
{   fn default() -> Self
    {   ProviderConfig::new(Provider::OpenAI)
    }
}

#[cfg(test)]
mod tests
{   use super::*;

    #[test]
    fn minimal_json_uses_provider_defaults()
    {   let config = ProviderConfig::from_json_str(
          r#"{ "provider": "MistralAi" }"#
        ).unwrap();
        assert_eq!(config.provider, Provider::MistralAi);
        assert_eq!(config.model(), "mistral-small-latest");
        assert_eq!(config.api_key_env(), "MISTRAL_API_KEY");
        assert_eq!(config.timeout(), None);
    }

    #[test]
    fn provider_names_match_command_line_spelling()
    {   let openai = ProviderConfig::from_json_str(
          r#"{ "provider": "openai" }"#
        ).unwrap();
        assert_eq!(openai.provider, Provider::OpenAI);
        assert_eq!(openai.provider, "openai".parse::<Provider>().unwrap());

        let mistral = ProviderConfig::from_json_str(
          r#"{ "provider": "mistral" }"#
        ).unwrap();
        assert_eq!(mistral.provider, Provider::MistralAi);
        assert_eq!(mistral.provider, "mistral".parse::<Provider>().unwrap());

        let written = serde_json::to_value(&mistral).unwrap();
        assert_eq!(written["provider"], "mistral");
    }

    #[test]
    fn full_json_overrides_defaults()
    {   let config = ProviderConfig::from_json_str(r#"{
          "provider": "OpenAI",
          "model": "gpt-4.1",
          "api_base": "http://localhost:8080/v1",
          "timeout_secs": 30,
          "api_key_env": "MY_KEY"
        }"#).unwrap();
        assert_eq!(config.model(), "gpt-4.1");
        assert_eq!(config.api_key_env(), "MY_KEY");
        assert_eq!(config.timeout(), Some(Duration::from_secs(30)));
        assert_eq!(
          config.api_base.as_deref(),
          Some("http://localhost:8080/v1")
        );
    }

    #[test]
    fn bad_json_is_invalid_configuration()
    {   let err = ProviderConfig::from_json_str("{ nope").unwrap_err();
        assert!(matches!(err, ProviderError::InvalidConfiguration(_)));
    }

    #[test]
    fn missing_file_is_invalid_configuration()
    {   let err = ProviderConfig::from_json_file(
          "/definitely/not/here.json"
        ).unwrap_err();
        assert!(matches!(err, ProviderError::InvalidConfiguration(_)));
    }

    #[test]
    fn unset_key_variable_is_missing_api_key()
    {   let mut config = ProviderConfig::default();
        config.api_key_env
          = Some("ONESHOT_TEST_UNSET_KEY_VAR".to_string());
        assert_eq!(
          config.api_key_from_env(),
          Err(ProviderError::MissingApiKey(
            "ONESHOT_TEST_UNSET_KEY_VAR".to_string()
          ))
        );
    }
}
