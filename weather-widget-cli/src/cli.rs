use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use inquire::{InquireError, Password, PasswordDisplayMode, Text};
use tracing::info;
use weather_widget_core::{
    Action, Config, FetchStatus, WeatherWidget, WidgetRuntime, provider_from_config,
    widget::{HEADING, SUBMIT_LABEL},
};

use crate::view::print_widget;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weather-widget", version, about = "Current temperature for a city")]
pub struct Cli {
    /// City to show first, instead of the configured default.
    #[arg(long, global = true)]
    pub city: Option<String>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Start the interactive widget (the default).
    Run,

    /// Look up one city and exit.
    Show {
        /// City name, passed to the API as typed.
        city: String,
    },

    /// Store the WeatherAPI key and default city.
    Configure,

    /// Print the location of the config file.
    ConfigPath,
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command.unwrap_or(Command::Run) {
            Command::Run => {
                let config = Config::load()?;
                run_interactive(&config, self.city).await
            }
            Command::Show { city } => {
                let config = Config::load()?;
                show_once(&config, city).await
            }
            Command::Configure => configure().await,
            Command::ConfigPath => {
                println!("{}", Config::config_file_path()?.display());
                Ok(())
            }
        }
    }
}

fn runtime_for(config: &Config, city: String) -> anyhow::Result<WidgetRuntime> {
    let provider = provider_from_config(config)?;
    Ok(WidgetRuntime::new(WeatherWidget::new(city), provider))
}

/// `--city` wins over the configured default.
fn starting_city(config: &Config, city: Option<String>) -> String {
    city.unwrap_or_else(|| config.default_city.clone())
}

async fn run_interactive(config: &Config, city: Option<String>) -> anyhow::Result<()> {
    let mut rt = runtime_for(config, starting_city(config, city))?;

    rt.dispatch(Action::Mount);
    rt.settle().await;
    print_widget(rt.widget());

    while let Some(text) = prompt_city(rt.widget().input().to_string()).await? {
        rt.dispatch(Action::InputChanged(text));
        rt.dispatch(Action::Submit);
        rt.settle().await;
        print_widget(rt.widget());
    }

    Ok(())
}

async fn show_once(config: &Config, city: String) -> anyhow::Result<()> {
    println!("{}", lookup_line(config, city).await?);
    Ok(())
}

/// Mount a widget for `city`, wait for its lookup and return the result line.
async fn lookup_line(config: &Config, city: String) -> anyhow::Result<String> {
    let mut rt = runtime_for(config, city)?;

    rt.dispatch(Action::Mount);
    rt.settle().await;

    if let FetchStatus::Failed(reason) = rt.widget().status() {
        bail!("Lookup for '{}' failed: {reason}", rt.widget().active_city());
    }
    Ok(rt.widget().render_line())
}

/// Prompt for the next city. `None` means the user asked to quit.
async fn prompt_city(previous: String) -> anyhow::Result<Option<String>> {
    let answer = tokio::task::spawn_blocking(move || {
        let help = format!("Enter: {SUBMIT_LABEL}   Esc: quit");
        Text::new(HEADING.trim_end())
            .with_initial_value(&previous)
            .with_help_message(&help)
            .prompt()
    })
    .await
    .context("Prompt task panicked")?;

    match answer {
        Ok(text) => Ok(Some(text)),
        Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => Ok(None),
        Err(err) => Err(err).context("Failed to read city from terminal"),
    }
}

async fn configure() -> anyhow::Result<()> {
    let mut config = Config::load_file()?;
    let current_city = config.default_city.clone();

    let (api_key, default_city) = tokio::task::spawn_blocking(move || {
        let api_key = Password::new("WeatherAPI key:")
            .with_display_mode(PasswordDisplayMode::Masked)
            .without_confirmation()
            .prompt()?;
        let default_city =
            Text::new("Default city:").with_default(&current_city).prompt()?;
        Ok::<_, InquireError>((api_key, default_city))
    })
    .await
    .context("Prompt task panicked")?
    .context("Configuration cancelled")?;

    config.api_key = Some(api_key);
    config.default_city = default_city;
    config.require_api_key()?;
    config.save()?;

    let path = Config::config_file_path()?;
    info!(path = %path.display(), "configuration saved");
    println!("Saved configuration to {}", path.display());
    Ok(())
}
