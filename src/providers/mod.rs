//! Hosted text-generation backends

pub mod deadline;
pub mod http;
pub mod mistral;
pub mod openai;

// Re-export for convenience
pub use deadline::{DeadlineBackend, DeadlineError};
pub use mistral::MistralBackend;
pub use openai::OpenAiBackend;

use log::debug;

use crate::config::ProviderConfig;
use crate::error::ProviderError;
use crate::runner::Backend;
use crate::Provider;

/// Any hosted backend, chosen at runtime
pub type DynBackend = Box<dyn Backend<Error = ProviderError>>;

/// Build the backend `config` names, authenticated with `api_key`
pub fn connect(
  config: &ProviderConfig
, api_key: String
) -> Result<DynBackend, ProviderError>
{   debug!("Connecting to {:?}", config.provider);
    let api_base = config.api_base.clone();
    let timeout = config.timeout();
    match config.provider
    {   Provider::OpenAI => Ok(Box::new(
          OpenAiBackend::new(api_key, api_base, timeout)?
        ))
      , Provider::MistralAi => Ok(Box::new(
          MistralBackend::new(api_key, api_base, timeout)?
        ))
    }
}
