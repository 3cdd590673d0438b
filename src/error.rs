use std::fmt;

/// Boxed cause carried by [`Error::Backend`]
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Error returned by [`crate::runner::run`]
#[derive(Debug)]
pub enum Error
{   /// Caller supplied an unusable argument (empty model)
    InvalidArgument(String)
  , /// The backend call failed; the original cause is kept
    Backend(BoxError)
}

impl Error
{   /// The wrapped backend error, if this is a backend failure
    pub fn backend_cause(&self)
      -> Option<&(dyn std::error::Error + Send + Sync + 'static)>
    {   match self
        {   Error::Backend(cause) => Some(cause.as_ref())
          , Error::InvalidArgument(_) => None
        }
    }

    /// Downcast the backend cause to a concrete error type
    pub fn downcast_cause<E>(&self) -> Option<&E>
    where E: std::error::Error + 'static
    {   self.backend_cause()?.downcast_ref::<E>()
    }

    pub fn is_invalid_argument(&self) -> bool
    {   matches!(self, Error::InvalidArgument(_))
    }

    pub fn is_backend(&self) -> bool
    {   matches!(self, Error::Backend(_))
    }
}

impl fmt::Display for Error
{   fn fmt(&self, f: &mut fmt::Formatter<'_>)
      -> fmt::Result
    {   match self
        {   Error::InvalidArgument(msg) => {
              write!(f, "Invalid argument: {}", msg)
            }
          , Error::Backend(cause) => {
              write!(f, "Backend error: {}", cause)
            }
        }
    }
}

impl std::error::Error for Error
{   fn source(&self)
      -> Option<&(dyn std::error::Error + 'static)>
    {   match self
        {   Error::Backend(cause) => Some(cause.as_ref())
          , Error::InvalidArgument(_) => None
        }
    }
}

/// Failure raised by the HTTP backends in [`crate::providers`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderError
{   /// API key is empty or was never supplied
    MissingApiKey(String)
  , /// Transport-level failure (connect, TLS, body read)
    HttpError(String)
  , /// Request exceeded the configured client timeout
    Timeout
  , /// 401/403 from the service
    Authentication(String)
  , /// 429 from the service
    RateLimitExceeded(String)
  , /// 429 caused by an exhausted quota
    QuotaExceeded(String)
  , /// Any other non-success status
    ApiError
    {   status: u16
      , message: String
    }
  , /// Failed to parse API response
    ParseError(String)
  , /// No choices in API response
    NoChoicesInResponse
  , /// Invalid configuration
    InvalidConfiguration(String)
}

impl ProviderError
{   /// Map a reqwest failure onto the transport variants
    pub fn from_reqwest(e: reqwest::Error) -> Self
    {   if e.is_timeout()
        {   ProviderError::Timeout
        } else if e.is_decode()
        {   ProviderError::ParseError(e.to_string())
        } else
        {   ProviderError::HttpError(e.to_string())
        }
    }

    /// Classify a non-success status and its body
    pub fn from_status(status: u16, body: &str) -> Self
    {   let detail = ApiErrorBody::parse(body);
        let message = detail.as_ref()
          .and_then(|d| d.message.clone())
          .unwrap_or_else(|| body.to_string());
        match status
        {   401 | 403 => ProviderError::Authentication(message)
          , 429 => {
              let quota = detail.as_ref()
                .map(|d| d.is_quota())
                .unwrap_or(false);
              if quota
              {   ProviderError::QuotaExceeded(message)
              } else
              {   ProviderError::RateLimitExceeded(message)
              }
            }
          , _ => ProviderError::ApiError { status, message }
        }
    }
}

/// The `{"error": {...}}` envelope both OpenAI and Mistral use
struct ApiErrorBody
{   message: Option<String>
  , code: Option<String>
  , kind: Option<String>
}

impl ApiErrorBody
{   fn parse(body: &str) -> Option<Self>
    {   let value: serde_json::Value
          = serde_json::from_str(body).ok()?;
        let err = value.get("error")?;
        let field = |name: &str| err.get(name)
          .and_then(|v| v.as_str())
          .map(str::to_string);
        Some(ApiErrorBody
        {   message: field("message")
          , code: field("code")
          , kind: field("type")
        })
    }

    fn is_quota(&self) -> bool
    {   [&self.code, &self.kind]
          .iter()
          .any(|v| v.as_deref() == Some("insufficient_quota"))
    }
}

impl fmt::Display for ProviderError
{   fn fmt(&self, f: &mut fmt::Formatter<'_>)
      -> fmt::Result
    {   match self
        {   ProviderError::MissingApiKey(provider) => {
              write!(f, "Missing API key for: {}", provider)
            }
          , ProviderError::HttpError(msg) => {
              write!(f, "HTTP error: {}", msg)
            }
          , ProviderError::Timeout => {
              write!(f, "Request timed out")
            }
          , ProviderError::Authentication(msg) => {
              write!(f, "Authentication failed: {}", msg)
            }
          , ProviderError::RateLimitExceeded(msg) => {
              write!(f, "API rate limit exceeded: {}", msg)
            }
          , ProviderError::QuotaExceeded(msg) => {
              write!(f, "API quota exceeded: {}", msg)
            }
          , ProviderError::ApiError { status, message } => {
              write!(f, "API error ({}): {}", status, message)
            }
          , ProviderError::ParseError(msg) => {
              write!(f, "Parse error: {}", msg)
            }
          , ProviderError::NoChoicesInResponse => {
              write!(f, "API response contained no choices")
            }
          , ProviderError::InvalidConfiguration(msg) => {
              write!(f, "Invalid configuration: {}", msg)
            }
        }
    }
}

impl std::error::Error for ProviderError {}
