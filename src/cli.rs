//! Command-line front end.
//!
//! Each invocation starts a session, applies one command, flushes pending
//! writes and prints the resulting status.

use std::fmt;
use std::io::{self, IsTerminal, Write};
use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use rc_app::{LoadingIndicator, TrackerSession};
use rc_core::{Screen, SupplyState, UserProfile};
use tracing::{info_span, warn, Instrument};

use crate::bootstrap::{load_config_or_default, start_session, AppPaths};

#[derive(Debug, Parser)]
#[command(name = "rollcall")]
#[command(about = "Track how long the household toilet paper will last", long_about = None)]
pub struct Cli {
    /// Config file path (defaults to config.toml in the data dir)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// Show the current screen and supply
    Status,
    /// Set the number of full rolls on hand (resets the sheet count)
    Rolls { count: u32 },
    /// Set toilet visits per person per day
    Visits { count: u32 },
    /// Set the number of people in the household
    Persons { count: u32 },
    /// Use sheets
    Use {
        #[arg(short = 'n', long, default_value_t = 1)]
        count: u32,
    },
    /// Mark the intro as seen
    Intro,
}

impl Command {
    fn needs_home_screen(&self) -> bool {
        !matches!(self, Command::Status | Command::Intro)
    }
}

/// Prints a busy marker on stderr while the initial load runs.
pub struct TerminalLoadingIndicator {
    enabled: bool,
}

impl TerminalLoadingIndicator {
    pub fn new() -> Self {
        Self {
            enabled: io::stderr().is_terminal(),
        }
    }
}

impl Default for TerminalLoadingIndicator {
    fn default() -> Self {
        Self::new()
    }
}

impl LoadingIndicator for TerminalLoadingIndicator {
    fn show(&self) {
        if self.enabled {
            let mut stderr = io::stderr();
            let _ = write!(stderr, "Loading...");
            let _ = stderr.flush();
        }
    }

    fn release(&self) {
        if self.enabled {
            let _ = write!(io::stderr(), "\r\x1b[2K");
        }
    }
}

/// What the user sees after a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusView {
    pub screen: Screen,
    pub profile: Option<UserProfile>,
    pub supply: SupplyState,
    pub days_remaining: u32,
}

impl StatusView {
    pub async fn capture(session: &TrackerSession) -> Self {
        Self {
            screen: session.active_screen(),
            profile: session.profile().cloned(),
            supply: session.supply().snapshot().await,
            days_remaining: session.supply().days_remaining().await,
        }
    }
}

impl fmt::Display for StatusView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.screen {
            Screen::Intro => {
                match &self.profile {
                    Some(profile) => writeln!(f, "Welcome, {}!", profile.first_name)?,
                    None => writeln!(f, "Welcome!")?,
                }
                writeln!(f, "Find out how long your toilet paper will last.")?;
                writeln!(f, "Run `rollcall intro` to get started.")
            }
            Screen::Home => {
                writeln!(f, "Rolls:          {}", self.supply.rolls_count)?;
                writeln!(f, "Sheets left:    {}", self.supply.sheets_remaining)?;
                writeln!(f, "Visits per day: {}", self.supply.toilet_visits_per_day)?;
                writeln!(f, "Persons:        {}", self.supply.persons_count)?;
                writeln!(f, "Days remaining: {}", self.days_remaining)
            }
        }
    }
}

/// Apply `command` to a running session.
pub async fn execute(session: &TrackerSession, command: Command) -> anyhow::Result<()> {
    if command.needs_home_screen() && session.active_screen() == Screen::Intro {
        anyhow::bail!("finish the intro first: rollcall intro");
    }

    let span = info_span!("cli.execute", command = ?command);
    async {
        let supply = session.supply();
        match command {
            Command::Status => {}
            Command::Rolls { count } => {
                supply.set_rolls(count).await?;
            }
            Command::Visits { count } => {
                supply.set_visits(count).await?;
            }
            Command::Persons { count } => {
                supply.set_persons(count).await?;
            }
            Command::Use { count } => {
                let mut failed = 0;
                for _ in 0..count {
                    if let Err(err) = supply.consume_sheet().await {
                        warn!(error = %err, "sheet use not saved");
                        failed += 1;
                    }
                }
                if failed > 0 {
                    anyhow::bail!("{} of {} sheet uses could not be saved", failed, count);
                }
            }
            Command::Intro => {
                session.acknowledge_intro().await?;
            }
        }
        Ok(())
    }
    .instrument(span)
    .await
}

/// Run one CLI invocation end to end.
pub async fn run(cli: Cli, paths: &AppPaths) -> anyhow::Result<()> {
    let config = load_config_or_default(cli.config.as_deref(), &paths.config_path)?;
    let session = start_session(
        &config,
        &paths.store_path,
        Arc::new(TerminalLoadingIndicator::new()),
    )
    .await?;

    let outcome = execute(&session, cli.command).await;
    session.shutdown().await;

    print!("{}", StatusView::capture(&session).await);
    outcome
}
