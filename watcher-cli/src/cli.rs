use std::{io::Write, time::Duration};

use anyhow::Context;
use clap::{Parser, Subcommand};
use inquire::{Password, PasswordDisplayMode, Text};
use tracing::info;
use watcher_core::{
    Config, SequentialFetchPipeline, WeatherReport,
    config::API_KEY_ENV,
    provider::simulated::DEFAULT_DELAY,
};

use crate::render::render_report;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weather-watcher", version, about = "Look up current weather for a city")]
pub struct Cli {
    /// Log debug output, including the cause of failed lookups.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the OpenWeather API key and default city.
    Configure,

    /// Run the offline pipeline with simulated stages.
    Demo {
        /// Delay of each simulated stage, in milliseconds.
        #[arg(long, default_value_t = DEFAULT_DELAY.as_millis() as u64)]
        delay_ms: u64,
    },

    /// Show current weather for a city.
    Show {
        /// City name; defaults to the configured city.
        city: Option<String>,

        /// Print the report as JSON instead of text.
        #[arg(long)]
        json: bool,
    },
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Command::Configure => configure(),
            Command::Demo { delay_ms } => {
                let pipeline = SequentialFetchPipeline::simulated(Duration::from_millis(delay_ms));
                let report = pipeline.run().await?;
                print_report(&report, false)
            }
            Command::Show { city, json } => {
                let cfg = Config::load()?;
                let client = cfg.openweather_client(std::env::var(API_KEY_ENV).ok())?;
                let city = cfg.city_or_default(city);

                info!("Start Weather Watcher for {city}...");
                let report = SequentialFetchPipeline::for_city(city, client).run_collapsed().await?;
                print_report(&report, json)
            }
        }
    }
}

fn configure() -> anyhow::Result<()> {
    let mut cfg = Config::load()?;

    let api_key = Password::new("OpenWeather API key:")
        .with_display_mode(PasswordDisplayMode::Masked)
        .without_confirmation()
        .with_help_message("Leave empty to keep the current key")
        .prompt()?;
    if !api_key.trim().is_empty() {
        cfg.set_api_key(api_key);
    }

    let current_city = cfg.city_or_default(None);
    let city = Text::new("Default city:").with_default(&current_city).prompt()?;
    cfg.set_default_city(city);

    let path = cfg.save()?;
    println!("Saved configuration to {}", path.display());

    Ok(())
}

fn print_report(report: &WeatherReport, json: bool) -> anyhow::Result<()> {
    let mut out = std::io::stdout().lock();

    if json {
        serde_json::to_writer_pretty(&mut out, report).context("Failed to serialize report")?;
        writeln!(out)?;
    } else {
        render_report(&mut out, report, &chrono::Local)?;
    }

    Ok(())
}
