//! Single-shot prompt execution against an injected backend

use async_trait::async_trait;
use log::{debug, error, trace};

use crate::error::Error;
use crate::request::{Request, Response};

/// A text-generation capability: one request in, one response out.
///
/// Implementations own any transport, credentials and deadlines. The
/// runner only borrows a backend for the duration of a single call.
#[async_trait]
pub trait Backend: Send + Sync
{   type Error: std::error::Error + Send + Sync + 'static;

    async fn generate(&self, request: &Request)
      -> Result<Response, Self::Error>;
}

#[async_trait]
impl<B> Backend for &B
where B: Backend + ?Sized
{   type Error = B::Error;

    async fn generate(&self, request: &Request)
      -> Result<Response, Self::Error>
    {   (**self).generate(request).await
    }
}

/// Send `prompt` to `model` through `backend` and return the generated
/// text exactly as the backend produced it.
///
/// Exactly one backend call is made. An empty `model` fails with
/// [`Error::InvalidArgument`] before the backend is touched; any backend
/// failure comes back as [`Error::Backend`] with the cause attached.
pub async fn run<B>(
  backend: &B
, model: &str
, prompt: &str
) -> Result<String, Error>
where B: Backend + ?Sized
{   if model.is_empty()
    {   error!("Rejecting request with empty model");
        return Err(Error::InvalidArgument(
          "model must be a non-empty identifier".to_string()
        ));
    }

    let request = Request::new(model, prompt);
    debug!("Running prompt against model: {}", request.model);
    trace!("Request: {:?}", request);

    let response = backend.generate(&request)
      .await
      .map_err(|e| {
        error!("Backend failed for {}: {}", request.model, e);
        Error::Backend(Box::new(e))
      })?;

    debug!("Received {} bytes of output", response.text.len());
    Ok(response.text)
}

#[cfg(test)]
mod tests
{   use super::*;
    use std::fmt;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    #[derive(Debug)]
    struct Refused(&'static str);

    impl fmt::Display for Refused
    {   fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
        {   write!(f, "refused: {}", self.0)
        }
    }

    impl std::error::Error for Refused {}

    /// Records every request and answers from `reply`
    struct Stub
    {   calls: AtomicUsize
      , seen: Mutex<Vec<Request>>
      , reply: fn(&Request) -> Result<Response, Refused>
    }

    impl Stub
    {   fn new(reply: fn(&Request) -> Result<Response, Refused>) -> Self
        {   Stub
            {   calls: AtomicUsize::new(0)
              , seen: Mutex::new(vec![])
              , reply
            }
        }

        fn echo() -> Self
        {   Stub::new(|r| Ok(Response::new(r.prompt.clone())))
        }

        fn calls(&self) -> usize
        {   self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl Backend for Stub
    {   type Error = Refused;

        async fn generate(&self, request: &Request)
          -> Result<Response, Refused>
        {   self.calls.fetch_add(1, Ordering::SeqCst);
            self.seen.lock().unwrap().push(request.clone());
            (self.reply)(request)
        }
    }

    #[tokio::test]
    async fn echo_returns_prompt_verbatim()
    {   let stub = Stub::echo();
        for prompt in ["", "  padded  \n", "plain", "ünïcödé ✓"]
        {   let text = run(&stub, "m", prompt).await.unwrap();
            assert_eq!(text, prompt);
        }
        assert_eq!(stub.calls(), 4);
    }

    #[tokio::test]
    async fn whitespace_model_is_passed_through()
    {   let stub = Stub::echo();
        let text = run(&stub, " ", "hi").await.unwrap();
        assert_eq!(text, "hi");
        assert_eq!(stub.seen.lock().unwrap()[0].model, " ");
    }

    #[tokio::test]
    async fn empty_model_never_reaches_backend()
    {   let stub = Stub::echo();
        let err = run(&stub, "", "hello").await.unwrap_err();
        assert!(err.is_invalid_argument());
        assert_eq!(stub.calls(), 0);
    }

    #[tokio::test]
    async fn backend_failure_keeps_cause()
    {   let stub = Stub::new(|_| Err(Refused("quota")));
        let err = run(&stub, "gpt-5.2", "hi").await.unwrap_err();
        assert!(err.is_backend());
        let cause = err.downcast_cause::<Refused>().expect("cause");
        assert_eq!(cause.0, "quota");
        assert_eq!(err.to_string(), "Backend error: refused: quota");
        assert_eq!(stub.calls(), 1);
    }

    #[tokio::test]
    async fn exactly_one_call_per_run()
    {   let stub = Stub::echo();
        run(&stub, "a", "one").await.unwrap();
        assert_eq!(stub.calls(), 1);
        let _ = run(&Stub::new(|_| Err(Refused("x"))), "a", "two").await;
        run(&stub, "a", "three").await.unwrap();
        assert_eq!(stub.calls(), 2);
    }

    #[tokio::test]
    async fn request_carries_inputs_unchanged()
    {   let stub = Stub::echo();
        run(&stub, "gpt-5.2", "Say hello in one sentence.")
          .await
          .unwrap();
        let seen = stub.seen.lock().unwrap();
        assert_eq!(
          seen.as_slice(),
          &[Request::new("gpt-5.2", "Say hello in one sentence.")]
        );
    }

    #[test]
    fn repeated_calls_are_deterministic()
    {   let stub = Stub::new(|r| {
          Ok(Response::new(format!("{}:{}", r.model, r.prompt.len())))
        });
        let first = tokio_test::block_on(run(&stub, "m", "abc")).unwrap();
        let second = tokio_test::block_on(run(&stub, "m", "abc")).unwrap();
        assert_eq!(first, "m:3");
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn hello_scenario()
    {   let stub = Stub::new(|_| Ok(Response::new("Hello there!")));
        let text = run(&stub, "gpt-5.2", "Say hello in one sentence.")
          .await
          .unwrap();
        assert_eq!(text, "Hello there!");
    }

    #[tokio::test]
    async fn works_through_trait_object()
    {   let stub = Stub::echo();
        let dyn_backend: &dyn Backend<Error = Refused> = &stub;
        assert_eq!(run(dyn_backend, "m", "x").await.unwrap(), "x");
    }
}
