//! Deadline enforcement for any backend

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use log::{debug, error};

use crate::request::{Request, Response};
use crate::runner::Backend;

/// Failure from a [`DeadlineBackend`]
#[derive(Debug)]
pub enum DeadlineError<E>
{   /// The inner call did not finish in time
    Elapsed(Duration)
  , /// The inner backend failed on its own
    Inner(E)
}

impl<E: fmt::Display> fmt::Display for DeadlineError<E>
{   fn fmt(&self, f: &mut fmt::Formatter<'_>)
      -> fmt::Result
    {   match self
        {   DeadlineError::Elapsed(d) => {
              write!(f, "Deadline of {:?} elapsed", d)
            }
          , DeadlineError::Inner(e) => write!(f, "{}", e)
        }
    }
}

impl<E> std::error::Error for DeadlineError<E>
where E: std::error::Error + 'static
{   fn source(&self)
      -> Option<&(dyn std::error::Error + 'static)>
    {   match self
        {   DeadlineError::Inner(e) => Some(e)
          , DeadlineError::Elapsed(_) => None
        }
    }
}

/// Wraps a backend and abandons calls that exceed `deadline`
#[derive(Debug, Clone)]
pub struct DeadlineBackend<B>
{   inner: B
  , deadline: Duration
}

impl<B> DeadlineBackend<B>
{   pub fn new(inner: B, deadline: Duration) -> Self
    {   DeadlineBackend { inner, deadline }
    }

    pub fn deadline(&self) -> Duration
    {   self.deadline
    }

    pub fn into_inner(self) -> B
    {   self.inner
    }
}

#[async_trait]
impl<B> Backend for DeadlineBackend<B>
where B: Backend
{   type Error = DeadlineError<B::Error>;

    async fn generate(&self, request: &Request)
      -> Result<Response, Self::Error>
    {   debug!(
          "Generating for {} with deadline {:?}",
          request.model, self.deadline
        );
        match tokio::time::timeout(
          self.deadline,
          self.inner.generate(request)
        ).await
        {   Ok(result) => result.map_err(DeadlineError::Inner)
          , Err(_) => {
              error!("Deadline {:?} elapsed", self.deadline);
              Err(DeadlineError::Elapsed(self.deadline))
            }
        }
    }
}
