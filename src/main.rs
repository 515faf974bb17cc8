use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use coffee_lab::app::CoffeeLab;
use coffee_lab::commands::{BrewCommand, ConfigCommand, DrinkCommand, ShareCommand};
use coffee_lab::config::Config;

#[derive(Parser)]
#[command(name = "clab")]
#[command(version)]
#[command(about = "A personal espresso brew log", long_about = None)]
struct Cli {
    /// Path to config file
    #[arg(long, short, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Log and browse espresso extractions
    Brew(BrewCommand),

    /// Manage drink recipe cards
    Drink(DrinkCommand),

    /// Move data between devices via a share link
    Share(ShareCommand),

    /// Manage configuration
    Config(ConfigCommand),
}

fn main() {
    init_tracing();

    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Load configuration
    let config = Config::load(cli.config)?;

    match cli.command {
        Some(Commands::Brew(cmd)) => {
            let lab = open_lab(&config)?;
            cmd.run(&lab)?;
        }
        Some(Commands::Drink(cmd)) => {
            let lab = open_lab(&config)?;
            cmd.run(&lab)?;
        }
        Some(Commands::Share(cmd)) => {
            let lab = open_lab(&config)?;
            cmd.run(&lab, &config)?;
        }
        Some(Commands::Config(cmd)) => {
            cmd.run(&config)?;
        }
        None => {
            println!("Use --help to see available commands");
        }
    }

    Ok(())
}

/// Opens the dataset and seeds whichever collections are empty, so a
/// fresh device never starts blank.
fn open_lab(config: &Config) -> Result<CoffeeLab, Box<dyn std::error::Error>> {
    let lab = CoffeeLab::open(config);
    lab.ensure_seeded()?;
    Ok(lab)
}
