//! HTTP plumbing shared by the hosted backends

use std::time::Duration;

use log::{debug, error, trace};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::ProviderError;

/// Build a reqwest client, optionally with a whole-request timeout
pub fn build_client(timeout: Option<Duration>)
  -> Result<reqwest::Client, ProviderError>
{   let mut builder = reqwest::Client::builder();
    if let Some(t) = timeout
    {   debug!("HTTP client timeout: {:?}", t);
        builder = builder.timeout(t);
    }
    builder.build().map_err(|e| {
      error!("Failed to build HTTP client: {}", e);
      ProviderError::InvalidConfiguration(e.to_string())
    })
}

/// Strip trailing slashes so paths can be appended with `/`
pub fn normalize_base(base: &str) -> String
{   base.trim_end_matches('/').to_string()
}

/// POST `body` as JSON with a bearer key and decode the JSON reply.
///
/// Non-success statuses are classified through
/// [`ProviderError::from_status`].
pub async fn post_json<Req, Resp>(
  client: &reqwest::Client
, url: &str
, api_key: &str
, body: &Req
) -> Result<Resp, ProviderError>
where Req: Serialize + ?Sized
    , Resp: DeserializeOwned
{   let response = client
      .post(url)
      .header("Authorization", format!("Bearer {}", api_key))
      .header("Content-Type", "application/json")
      .json(body)
      .send()
      .await
      .map_err(|e| {
        error!("HTTP error: {}", e);
        ProviderError::from_reqwest(e)
      })?;

    let status = response.status();
    trace!("Response status from {}: {}", url, status);

    let text = response.text().await.map_err(|e| {
      error!("Failed to read response body: {}", e);
      ProviderError::from_reqwest(e)
    })?;

    if !status.is_success()
    {   error!("API error {}: {}", status, text);
        return Err(ProviderError::from_status(status.as_u16(), &text));
    }

    serde_json::from_str(&text).map_err(|e| {
      error!("Parse error: {}", e);
      ProviderError::ParseError(e.to_string())
    })
}

#[cfg(test)]
mod tests
{   use super::*;

    #[test]
    fn base_loses_trailing_slashes()
    {   assert_eq!(
          normalize_base("https://api.openai.com/v1//"),
          "https://api.openai.com/v1"
        );
        assert_eq!(normalize_base("http://h:1"), "http://h:1");
    }
}
