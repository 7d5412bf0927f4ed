use std::path::PathBuf;

use chrono_tz::Tz;
use clap::{Parser, Subcommand};
use macaddr::MacAddr6;

#[derive(Debug, Parser)]
pub struct Args {
    #[arg(long, env = "DATABASE_URL")]
    pub database_url: String,

    #[arg(long, env = "NTFY_URL", default_value = "https://ntfy.sh")]
    pub ntfy_url: String,

    #[arg(long, env = "NTFY_TOPIC")]
    pub ntfy_topic: String,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Check and store one poll cycle of air device readings.
    Air {
        #[arg(long)]
        file: PathBuf,
    },

    /// Check the MAC addresses currently active on the local network.
    Network {
        #[arg(required = true)]
        mac_addresses: Vec<MacAddr6>,
    },

    /// Import weather forecasts.
    Forecast {
        #[arg(long)]
        file: PathBuf,

        #[arg(long, env = "TZ")]
        timezone: Tz,
    },
}
