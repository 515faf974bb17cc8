mod brew_cmd;
mod config_cmd;
mod drink_cmd;
mod share_cmd;

pub use brew_cmd::BrewCommand;
pub use config_cmd::ConfigCommand;
pub use drink_cmd::DrinkCommand;
pub use share_cmd::ShareCommand;

use clap::ValueEnum;
use std::io::{self, Write};

#[derive(Clone, ValueEnum, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Prompts on stdout and reads a yes/no answer, defaulting to no.
fn confirm(prompt: &str) -> Result<bool, io::Error> {
    print!("{} [y/N] ", prompt);
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    Ok(matches!(input.trim().to_lowercase().as_str(), "y" | "yes"))
}
