//! `vatlive`: query the VATSIM live network state from the terminal.
//!
//! # Usage
//!
//! ```text
//! vatlive pilots --callsign '^BAW'
//! vatlive metar EGLL KSFO
//! vatlive --config ~/.config/vatlive.toml summary
//! ```

mod report;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;
use vatlive_client::{ClientConfig, LiveClient, ReqwestTransport, Selector, UpdatePolicy};

// ─── CLI args ─────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "vatlive", version, about = "Query the VATSIM live network state")]
struct Args {
  /// Path to a TOML config file.
  #[arg(short, long, value_name = "FILE")]
  config: Option<PathBuf>,

  /// Status discovery document URL.
  #[arg(long)]
  status_url: Option<String>,

  #[command(subcommand)]
  command: Command,
}

/// Record filter shared by the connection commands.
#[derive(clap::Args, Debug)]
struct Filter {
  /// Member id to include (repeatable).
  #[arg(long = "cid", value_name = "CID", conflicts_with = "callsigns")]
  cids: Vec<u64>,

  /// Callsign pattern to search for (repeatable, regex).
  #[arg(long = "callsign", value_name = "PATTERN")]
  callsigns: Vec<String>,
}

impl Filter {
  fn selector(&self) -> Selector {
    if !self.cids.is_empty() {
      Selector::cids(self.cids.iter().copied())
    } else if !self.callsigns.is_empty() {
      Selector::callsigns(self.callsigns.iter().cloned())
    } else {
      Selector::All
    }
  }
}

#[derive(Subcommand, Debug)]
enum Command {
  /// Connected pilots.
  Pilots(Filter),
  /// Prefiled flight plans.
  Prefiles(Filter),
  /// Connected controllers.
  Controllers(Filter),
  /// ATIS stations, or one station by exact callsign.
  Atis {
    callsign: Option<String>,
    #[command(flatten)]
    filter:   Filter,
  },
  /// Weather reports for the given stations, or all stations.
  Metar {
    stations: Vec<String>,
    /// Query the weather endpoint directly instead of the cache.
    #[arg(long)]
    direct:   bool,
  },
  /// Network servers.
  Servers,
  /// ATC facility types.
  Facilities,
  /// Controller, pilot and military ratings.
  Ratings,
  /// One line per connected pilot.
  Summary,
}

// ─── Config ───────────────────────────────────────────────────────────────────

/// Defaults, then the config file, then `VATLIVE_*` variables, then flags.
fn load_config(args: &Args) -> Result<ClientConfig> {
  let mut builder = config::Config::builder();
  if let Some(path) = &args.config {
    builder = builder.add_source(config::File::from(path.clone()).required(true));
  }
  let settings = builder
    .add_source(config::Environment::with_prefix("VATLIVE").try_parsing(true))
    .set_override_option("status_url", args.status_url.clone())
    .context("invalid --status-url")?
    .build()
    .context("failed to read configuration")?;

  settings
    .try_deserialize()
    .context("failed to deserialise ClientConfig")
}

// ─── Entry point ──────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .with_writer(std::io::stderr)
    .init();

  let args = Args::parse();
  let config = load_config(&args)?;
  tracing::debug!(status_url = %config.status_url, "loaded configuration");

  let client = LiveClient::connect(&config)
    .await
    .with_context(|| format!("failed to discover endpoints at {}", config.status_url))?;

  run(&client, &args.command).await
}

async fn run(
  client: &LiveClient<ReqwestTransport>,
  command: &Command,
) -> Result<()> {
  let policy = UpdatePolicy::IfStale;
  match command {
    Command::Pilots(filter) => print_json(&client.pilots(&filter.selector(), policy).await?),
    Command::Prefiles(filter) => {
      print_json(&client.prefiled_pilots(&filter.selector(), policy).await?)
    }
    Command::Controllers(filter) => {
      print_json(&client.controllers(&filter.selector(), policy).await?)
    }
    Command::Atis { callsign: Some(callsign), .. } => {
      print_json(&client.atis(callsign, policy).await?)
    }
    Command::Atis { callsign: None, filter } => {
      print_json(&client.atises(&filter.selector(), policy).await?)
    }
    Command::Metar { stations, direct } => {
      let stations: Vec<&str> = stations.iter().map(String::as_str).collect();
      if *direct {
        print_json(&client.fetch_metars(&stations).await?)
      } else if stations.is_empty() {
        print_json(&client.metars(None, policy).await?)
      } else {
        print_json(&client.metars(Some(stations.as_slice()), policy).await?)
      }
    }
    Command::Servers => print_json(&client.servers(policy).await?),
    Command::Facilities => print_json(&client.facilities(policy).await?),
    Command::Ratings => {
      #[derive(Serialize)]
      struct Ratings<C, P, M> {
        controller: C,
        pilot:      P,
        military:   M,
      }
      print_json(&Ratings {
        controller: client.controller_ratings(policy).await?,
        pilot:      client.pilot_ratings(policy).await?,
        military:   client.military_ratings(policy).await?,
      })
    }
    Command::Summary => {
      let pilots = client.pilots(&Selector::All, policy).await?;
      for pilot in pilots.iter().flat_map(|table| table.values()) {
        println!("{}", report::summary_line(pilot));
      }
      if let Some(updated) = client.server_updated().await {
        tracing::info!(%updated, "network data timestamp");
      }
      Ok(())
    }
  }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
  let text = serde_json::to_string_pretty(value).context("serialising output")?;
  println!("{text}");
  Ok(())
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn filter_prefers_cids() {
    let args = Args::parse_from(["vatlive", "pilots", "--cid", "5555555", "--cid", "1"]);
    let Command::Pilots(filter) = args.command else { panic!("expected pilots") };
    assert_eq!(filter.selector(), Selector::Cids(vec![5555555, 1]));
  }

  #[test]
  fn filter_defaults_to_all() {
    let args = Args::parse_from(["vatlive", "controllers"]);
    let Command::Controllers(filter) = args.command else {
      panic!("expected controllers")
    };
    assert_eq!(filter.selector(), Selector::All);
  }

  #[test]
  fn cid_and_callsign_conflict() {
    let parsed =
      Args::try_parse_from(["vatlive", "pilots", "--cid", "1", "--callsign", "BAW"]);
    assert!(parsed.is_err());
  }

  #[test]
  fn flag_overrides_default_status_url() {
    let args = Args::parse_from([
      "vatlive",
      "--status-url",
      "https://status.example/status.json",
      "servers",
    ]);
    let config = load_config(&args).unwrap();
    assert_eq!(config.status_url, "https://status.example/status.json");
    assert_eq!(config.connection_ttl_secs, 15);
  }
}
