//! Request and response types exchanged with a backend

use serde::{Deserialize, Serialize};

/// One prompt-completion request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Request
{   /// Model identifier, e.g. "gpt-5.2"
    pub model: String
  , /// The prompt text, may be empty
    pub prompt: String
}

impl Request
{   pub fn new(
      model: impl Into<String>
    , prompt: impl Into<String>
    ) -> Self
    {   Request
        {   model: model.into()
          , prompt: prompt.into()
        }
    }
}

/// Generated output for one request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Response
{   /// Generated text, returned verbatim
    pub text: String
}

impl Response
{   pub fn new(text: impl Into<String>) -> Self
    {   Response { text: text.into() }
    }
}
