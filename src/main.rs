use std::path::PathBuf;

use clap::Parser;
use color_eyre::eyre::{Result, WrapErr, eyre};
use tokio::io::AsyncWriteExt;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use imgfetch::application::FetcherFactory;
use imgfetch::domain::entities::{FetchOptions, ImageUrl, Priority};
use imgfetch::infrastructure::{AppConfig, CliArgs, ConfigStore};

fn init_logging(config: &AppConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.log_level.to_string()));

    if let Some(log_path) = config.effective_log_path() {
        if let Some(parent) = log_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_path)?;

        let file_layer = fmt::layer()
            .with_writer(file)
            .with_ansi(false)
            .with_target(true)
            .with_thread_ids(false);

        tracing_subscriber::registry()
            .with(filter)
            .with(file_layer)
            .init();

        info!(path = %log_path.display(), "Logging initialized");
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_writer(std::io::stderr))
            .init();
    }

    Ok(())
}

fn load_config(args: &CliArgs) -> Result<AppConfig> {
    let store = ConfigStore::new().unwrap_or_else(|_| ConfigStore::with_dir(PathBuf::from(".")));
    let mut config = store.load_config(args.config.as_deref())?;
    config.merge_with_args(args);
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let args = CliArgs::parse();
    let config = load_config(&args)?;
    init_logging(&config)?;

    info!(version = imgfetch::VERSION, "Starting imgfetch");

    let factory = FetcherFactory::from_config(&config)?;

    let url = ImageUrl::parse(&args.url);
    let old_url = args
        .old_url
        .as_deref()
        .map_or_else(|| url.clone(), ImageUrl::parse);
    let output = args
        .output
        .clone()
        .unwrap_or_else(|| PathBuf::from(format!("{}.img", url.cache_key())));
    let options = FetchOptions {
        manga: args.manga,
        load_only_wifi: args.wifi_only,
        source_origin: args.origin.clone(),
        skip_decode: args.skip_decode,
    };

    let fetcher = factory.build(old_url, url, options);
    let mut stream = match fetcher.fetch(Priority::Immediate).await {
        Some(Ok(stream)) => stream,
        Some(Err(e)) => {
            fetcher.cleanup();
            return Err(e).wrap_err("image fetch failed");
        }
        None => return Err(eyre!("image fetch was cancelled")),
    };

    let expected = stream.content_length();
    let mut file = tokio::fs::File::create(&output)
        .await
        .wrap_err_with(|| format!("failed to create {}", output.display()))?;
    let copied = tokio::io::copy(&mut stream, &mut file).await;
    fetcher.cleanup();

    let written = match copied {
        Ok(written) => written,
        Err(e) => {
            warn!(path = %output.display(), error = %e, "Image download incomplete");
            return Err(e).wrap_err("failed to write image");
        }
    };
    file.flush().await?;

    info!(path = %output.display(), bytes = written, ?expected, "Image saved");
    println!("{}", output.display());

    Ok(())
}
