use std::io::Write;
use std::process::ExitCode;

use clap::Parser;
use log::{debug, error};

use oneshot::config::ProviderConfig;
use oneshot::providers;
use oneshot::Provider;

/// Send one prompt to a hosted model and print the reply
#[derive(Debug, Parser)]
#[command(name = "oneshot", version)]
struct Args
{   /// Prompt text to send
    prompt: String
  , /// Hosted service: openai or mistral
    #[arg(long, env = "ONESHOT_PROVIDER")]
    provider: Option<Provider>
  , /// Model identifier (default depends on provider)
    #[arg(long, short, env = "ONESHOT_MODEL")]
    model: Option<String>
  , /// JSON provider configuration file
    #[arg(long, short)]
    config: Option<std::path::PathBuf>
  , /// Override the API base URL
    #[arg(long)]
    api_base: Option<String>
  , /// Client-side request timeout in seconds
    #[arg(long)]
    timeout_secs: Option<u64>
}

impl Args
{   /// Config file first, then flags on top.
    ///
    /// A `--provider` that differs from the file's drops the file's
    /// provider-specific model, base URL and key variable.
    fn resolve(&self) -> Result<ProviderConfig, oneshot::ProviderError>
    {   let mut config = match &self.config
        {   Some(path) => ProviderConfig::from_json_file(path)?
          , None => ProviderConfig::default()
        };
        if let Some(provider) = self.provider
        {   if provider != config.provider
            {   debug!(
                  "Provider {:?} replaces {:?}; resetting its settings",
                  provider, config.provider
                );
                config = ProviderConfig
                {   timeout_secs: config.timeout_secs
                  , ..ProviderConfig::new(provider)
                };
            }
        }
        if self.model.is_some()
        {   config.model = self.model.clone();
        }
        if self.api_base.is_some()
        {   config.api_base = self.api_base.clone();
        }
        if self.timeout_secs.is_some()
        {   config.timeout_secs = self.timeout_secs;
        }
        Ok(config)
    }
}

async fn execute(args: Args)
  -> Result<String, Box<dyn std::error::Error + Send + Sync>>
{   let config = args.resolve()?;
    debug!("Resolved config: {:?}", config);
    let api_key = config.api_key_from_env()?;
    let backend = providers::connect(&config, api_key)?;
    let text = oneshot::run(backend.as_ref(), config.model(), &args.prompt)
      .await?;
    Ok(text)
}

fn write_reply(out: &mut impl Write, text: &str) -> std::io::Result<()>
{   writeln!(out, "{}", text)?;
    out.flush()
}

#[tokio::main]
async fn main() -> ExitCode
{   env_logger::init();
    let args = Args::parse();

    let result: Result<(), Box<dyn std::error::Error + Send + Sync>>
      = match execute(args).await
    {   Ok(text) => write_reply(&mut std::io::stdout().lock(), &text)
          .map_err(|e| e.into())
      , Err(e) => Err(e)
    };

    match result
    {   Ok(()) => ExitCode::SUCCESS
      , Err(e) => {
          error!("oneshot failed: {}", e);
          eprintln!("error: {}", e);
          ExitCode::FAILURE
        }
    }
}
