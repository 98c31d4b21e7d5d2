use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::prelude::__tracing_subscriber_SubscriberExt;

const DEFAULT_PAGE_SIZE: u32 = 500;
const PAGE_PAUSE: std::time::Duration = std::time::Duration::from_secs(1);

#[derive(Debug, Parser)]
#[command(version, about = "Converts parsed replay event logs into OpenDota match records")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Convert a line-delimited event log into a match record
    Convert {
        input: PathBuf,
        /// Defaults to `<input stem>_opendota.json` next to the input
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// List every match id of a league
    LeagueMatches {
        #[arg(long)]
        league_id: u64,
        #[arg(long, env = "STEAM_API_KEY", hide_env_values = true)]
        steam_api_key: String,
        #[arg(short, long)]
        output: Option<PathBuf>,
        #[arg(long, default_value_t = DEFAULT_PAGE_SIZE)]
        page_size: u32,
    },
    /// Fetch the Steam match details of a single match
    MatchDetails {
        match_id: u64,
        #[arg(long, env = "STEAM_API_KEY", hide_env_values = true)]
        steam_api_key: String,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Show the league listing entry of a league
    LeagueInfo {
        #[arg(long)]
        league_id: u64,
        #[arg(long, env = "STEAM_API_KEY", hide_env_values = true)]
        steam_api_key: String,
    },
    /// Fetch the published OpenDota record of a match
    OpendotaMatch {
        match_id: u64,
        #[arg(long, env = "OPENDOTA_API_KEY", hide_env_values = true)]
        opendota_api_key: Option<String>,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Print a JSON credentials file as a single base64 line
    EncodeCredentials { path: PathBuf },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    if let Err(e) = dotenvy::from_filename(".env.local") {
        if !e.not_found() {
            return Err(e).context("loading .env.local");
        }
    }

    let registry = tracing_subscriber::Registry::default()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        );
    tracing::subscriber::set_global_default(registry)?;

    let cli = Cli::parse();

    match cli.command {
        Command::Convert { input, output } => {
            let output = output.unwrap_or_else(|| importer::convert::default_output_path(&input));
            let conversion = importer::convert::convert_file(&input, &output)?;
            log_summary(&conversion);
        }
        Command::LeagueMatches {
            league_id,
            steam_api_key,
            output,
            page_size,
        } => {
            let client = importer::steam_api::Client::new(steam_api_key);
            let match_ids = client.league_matches(league_id, page_size, PAGE_PAUSE).await;

            tracing::info!("Total matches found: {}", match_ids.len());

            let output =
                output.unwrap_or_else(|| PathBuf::from(format!("league_{}_matches.json", league_id)));
            importer::convert::write_json(&output, &match_ids)?;
            tracing::info!("Saved match ids to {}", output.display());
        }
        Command::MatchDetails {
            match_id,
            steam_api_key,
            output,
        } => {
            let client = importer::steam_api::Client::new(steam_api_key);
            let details = client
                .match_details(match_id)
                .await
                .with_context(|| format!("no details for match {}", match_id))?;
            emit(output.as_deref(), &details)?;
        }
        Command::LeagueInfo {
            league_id,
            steam_api_key,
        } => {
            let client = importer::steam_api::Client::new(steam_api_key);
            let league = client
                .league_info(league_id)
                .await
                .with_context(|| format!("no league listing entry for {}", league_id))?;
            emit(None, &league)?;
        }
        Command::OpendotaMatch {
            match_id,
            opendota_api_key,
            output,
        } => {
            let client = importer::opendota_api::Client::new(opendota_api_key);
            let record = client
                .match_details(match_id)
                .await
                .with_context(|| format!("no OpenDota record for match {}", match_id))?;

            let output = output
                .unwrap_or_else(|| PathBuf::from(format!("opendota_match_{}.json", match_id)));
            emit(Some(&output), &record)?;
        }
        Command::EncodeCredentials { path } => {
            let encoded = importer::credentials::encode_file(&path)?;
            println!("{}", encoded);
        }
    }

    Ok(())
}

fn emit(output: Option<&Path>, value: &serde_json::Value) -> anyhow::Result<()> {
    match output {
        Some(path) => {
            importer::convert::write_json(path, value)?;
            tracing::info!("Saved to {}", path.display());
        }
        None => println!("{}", serde_json::to_string_pretty(value)?),
    }

    Ok(())
}

fn log_summary(conversion: &analysis::Conversion) {
    let record: &common::opendota::Match = &conversion.record;

    tracing::info!(report = ?conversion.report, "Conversion report");
    tracing::info!(
        match_id = record.match_id,
        duration = record.duration,
        radiant_score = record.radiant_score,
        dire_score = record.dire_score,
        "Converted match"
    );
    tracing::info!(
        "Winner: {}, players: {}",
        if record.radiant_win { "Radiant" } else { "Dire" },
        record.players.len()
    );
}
