use std::process::ExitCode;

use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use forecast_core::{Config, Dashboard, RequestState, UnitSystem};
use inquire::{Password, Select, Text};
use tracing::debug;

use crate::render;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "forecast", version, about = "Current weather and a daily forecast")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the OpenWeather API key and default units.
    Configure,

    /// Show current weather and forecast for a location.
    Show {
        /// City name or postal code.
        location: String,

        /// Unit system: "metric" or "imperial". Defaults to the configured one.
        #[arg(long, value_parser = parse_units)]
        units: Option<UnitSystem>,
    },

    /// Query repeatedly; switch units with `:metric` / `:imperial`, leave with `:quit`.
    Interactive {
        #[arg(long, value_parser = parse_units)]
        units: Option<UnitSystem>,
    },
}

fn parse_units(value: &str) -> Result<UnitSystem, String> {
    UnitSystem::try_from(value).map_err(|e| e.to_string())
}

/// A line typed at the interactive prompt.
#[derive(Debug, PartialEq, Eq)]
enum Input {
    Submit(String),
    Unit(UnitSystem),
    Quit,
    Empty,
}

fn parse_input(line: &str) -> anyhow::Result<Input> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(Input::Empty);
    }

    match line.strip_prefix(':') {
        Some("q" | "quit" | "exit") => Ok(Input::Quit),
        Some(unit) => UnitSystem::try_from(unit).map(Input::Unit),
        None => Ok(Input::Submit(line.to_string())),
    }
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<ExitCode> {
        match self.command {
            Command::Configure => configure().map(|()| ExitCode::SUCCESS),
            Command::Show { location, units } => show(&location, units).await,
            Command::Interactive { units } => interactive(units).await.map(|()| ExitCode::SUCCESS),
        }
    }
}

fn load_config(units: Option<UnitSystem>) -> anyhow::Result<Config> {
    let mut config = Config::load()?;
    if let Some(units) = units {
        config.units = units;
    }
    Ok(config)
}

fn configure() -> anyhow::Result<()> {
    let mut config = Config::load()?;

    let api_key = Password::new("OpenWeather API key:")
        .without_confirmation()
        .prompt()
        .context("API key prompt was cancelled")?;
    if api_key.trim().is_empty() {
        bail!("API key must not be empty");
    }
    config.set_api_key(api_key.trim().to_string());

    let units = Select::new("Default units:", UnitSystem::all().to_vec())
        .prompt()
        .context("Unit prompt was cancelled")?;
    config.units = units;

    config.save()?;
    println!("Configuration saved to {}", Config::config_file_path()?.display());
    Ok(())
}

/// The failure message is part of the rendered output, so a failed query
/// only changes the exit status.
async fn show(location: &str, units: Option<UnitSystem>) -> anyhow::Result<ExitCode> {
    let config = load_config(units)?;
    let mut dashboard = Dashboard::from_config(&config)?;

    dashboard.submit_query(location).await;
    print!("{}", render::session(dashboard.session()));

    Ok(exit_code(dashboard.session().request_state()))
}

fn exit_code(state: &RequestState) -> ExitCode {
    match state {
        RequestState::Failed(_) => ExitCode::FAILURE,
        _ => ExitCode::SUCCESS,
    }
}

async fn interactive(units: Option<UnitSystem>) -> anyhow::Result<()> {
    let config = load_config(units)?;
    let mut dashboard = Dashboard::from_config(&config)?;

    loop {
        let line = Text::new("Location:")
            .with_help_message(":metric / :imperial to switch units, :quit to leave")
            .prompt()
            .context("Prompt was cancelled")?;

        let input = match parse_input(&line) {
            Ok(input) => input,
            Err(err) => {
                eprintln!("{err}");
                continue;
            }
        };
        debug!(?input, "interactive input");

        match input {
            Input::Quit => return Ok(()),
            Input::Empty => continue,
            Input::Unit(unit) => dashboard.change_unit(unit),
            Input::Submit(location) => {
                dashboard.submit_query(&location).await;
            }
        }

        print!("{}", render::session(dashboard.session()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_parses_show_with_units() {
        let cli = Cli::try_parse_from(["forecast", "show", "New York", "--units", "imperial"])
            .expect("arguments should parse");
        match cli.command {
            Command::Show { location, units } => {
                assert_eq!(location, "New York");
                assert_eq!(units, Some(UnitSystem::Imperial));
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn cli_rejects_unknown_units() {
        assert!(Cli::try_parse_from(["forecast", "show", "Oslo", "--units", "kelvin"]).is_err());
    }

    #[test]
    fn failed_query_exits_with_failure() {
        let failed = RequestState::Failed(forecast_core::FETCH_FAILED_MESSAGE.to_string());
        assert_eq!(exit_code(&failed), ExitCode::FAILURE);
        assert_eq!(exit_code(&RequestState::Succeeded), ExitCode::SUCCESS);
    }

    #[test]
    fn input_lines() {
        assert_eq!(parse_input("  Paris ").unwrap(), Input::Submit("Paris".into()));
        assert_eq!(parse_input(":imperial").unwrap(), Input::Unit(UnitSystem::Imperial));
        assert_eq!(parse_input(":C").unwrap(), Input::Unit(UnitSystem::Metric));
        assert_eq!(parse_input(":quit").unwrap(), Input::Quit);
        assert_eq!(parse_input("   ").unwrap(), Input::Empty);
        assert!(parse_input(":kelvin").is_err());
    }
}
