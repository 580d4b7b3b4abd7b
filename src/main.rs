mod api;
mod app;
mod cache;
mod commands;
mod config;
mod event;
mod logging;
mod prefs;
mod query;
mod ui;

use api::{Dispatcher, HttpTransport, MyQuranClient, RequestOptions, Transport};
use cache::{CacheLayer, CacheStorage};
use clap::{Parser, Subcommand};
use color_eyre::{eyre::eyre, Result};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "myq")]
#[command(about = "A terminal client for the myQuran API")]
#[command(version)]
struct Args {
  /// Path to config file (default: $XDG_CONFIG_HOME/myq/config.yaml)
  #[arg(short, long)]
  config: Option<PathBuf>,

  /// API base URL, overrides the config file and MYQ_BASE_URL
  #[arg(long)]
  base_url: Option<String>,

  /// Skip the response cache for this run
  #[arg(long)]
  no_cache: bool,

  #[command(subcommand)]
  command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
  /// Fetch an API path through the cache and print the JSON payload
  Get {
    /// Path relative to the base URL, e.g. /quran/36
    path: String,

    /// HTTP method
    #[arg(short = 'X', long, default_value = "GET")]
    method: String,

    /// Cache lifetime in seconds, 0 bypasses the cache
    #[arg(long)]
    cache_seconds: Option<u64>,

    /// Extra request header as name:value, may be repeated
    #[arg(short = 'H', long = "header")]
    headers: Vec<String>,
  },
  /// Remove every cached response, keeping preferences
  ClearCache,
}

#[tokio::main]
async fn main() -> Result<()> {
  color_eyre::install()?;

  let args = Args::parse();

  let mut config =
    config::Config::load(args.config.as_deref())?.with_base_url_override(args.base_url);
  if args.no_cache {
    config = config.without_cache();
  }

  // Keep the guard alive so buffered log lines are flushed on exit
  let _log_guard = logging::init(&config.log);
  info!(base_url = %config.api.base_url, cache = config.cache.enabled, "starting myq");

  let storage = cache::open_storage(&config.cache);

  match args.command {
    Some(Commands::ClearCache) => {
      let removed = CacheLayer::new(storage)
        .clear()
        .map_err(|e| eyre!("Failed to clear cache: {}", e))?;
      println!("Removed {} cached responses", removed);
      Ok(())
    }
    Some(Commands::Get {
      path,
      method,
      cache_seconds,
      headers,
    }) => {
      let dispatcher = build_dispatcher(&config, storage)?;
      run_get(&dispatcher, &path, &method, cache_seconds, &headers).await
    }
    None => {
      let dispatcher = build_dispatcher(&config, storage.clone())?;
      let client = MyQuranClient::new(dispatcher);
      let prefs = prefs::Preferences::new(storage);
      let mut app = app::App::new(client, prefs);
      app.run().await
    }
  }
}

fn build_dispatcher(
  config: &config::Config,
  storage: Arc<dyn CacheStorage>,
) -> Result<Dispatcher<HttpTransport>> {
  let store = cache::build_store(&config.cache, storage);
  let transport = HttpTransport::new(Duration::from_secs(config.api.timeout_seconds))?;
  Ok(
    Dispatcher::new(transport, store, config.api.base_url.clone())
      .with_default_cache_seconds(config.api.default_cache_seconds),
  )
}

async fn run_get<T: Transport>(
  dispatcher: &Dispatcher<T>,
  path: &str,
  method: &str,
  cache_seconds: Option<u64>,
  headers: &[String],
) -> Result<()> {
  let mut options = RequestOptions::new().method(method);
  if let Some(seconds) = cache_seconds {
    options = options.cache_seconds(seconds);
  }
  for header in headers {
    let (name, value) = parse_header(header)?;
    options = options.header(name, value);
  }

  let payload = dispatcher.request(&normalize_path(path), options).await?;
  println!("{}", serde_json::to_string_pretty(&payload)?);
  Ok(())
}

/// Split a `name:value` header argument
fn parse_header(header: &str) -> Result<(&str, &str)> {
  match header.split_once(':') {
    Some((name, value)) if !name.trim().is_empty() => Ok((name.trim(), value.trim())),
    _ => Err(eyre!("Invalid header '{}', expected name:value", header)),
  }
}

fn normalize_path(path: &str) -> String {
  if path.starts_with('/') {
    path.to_string()
  } else {
    format!("/{}", path)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_parse_header() {
    assert_eq!(parse_header("X-Trace: abc").unwrap(), ("X-Trace", "abc"));
    assert_eq!(parse_header("Accept:a:b").unwrap(), ("Accept", "a:b"));
    assert!(parse_header("no-colon").is_err());
    assert!(parse_header(": value").is_err());
  }

  #[test]
  fn test_normalize_path() {
    assert_eq!(normalize_path("quran/36"), "/quran/36");
    assert_eq!(normalize_path("/quran/36"), "/quran/36");
  }

  #[test]
  fn test_args_parse_get() {
    let args = Args::parse_from([
      "myq",
      "--no-cache",
      "get",
      "/hadis/enc/random",
      "-H",
      "A:b",
      "--cache-seconds",
      "0",
    ]);
    assert!(args.no_cache);
    match args.command {
      Some(Commands::Get {
        path,
        method,
        cache_seconds,
        headers,
      }) => {
        assert_eq!(path, "/hadis/enc/random");
        assert_eq!(method, "GET");
        assert_eq!(cache_seconds, Some(0));
        assert_eq!(headers, vec!["A:b".to_string()]);
      }
      other => panic!("unexpected command: {:?}", other),
    }
  }
}
