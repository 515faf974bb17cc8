use clap::{Args, Subcommand};

use super::confirm;
use crate::app::CoffeeLab;
use crate::config::Config;
use crate::share::{share_fragment, ImportOutcome};

#[derive(Args)]
pub struct ShareCommand {
    #[command(subcommand)]
    pub command: ShareSubcommand,
}

#[derive(Subcommand)]
pub enum ShareSubcommand {
    /// Encode the full dataset into a shareable link
    Export,

    /// Replace local data from a shared link
    Import {
        /// The pasted link (or bare #import= fragment)
        link: String,

        /// Skip confirmation prompt
        #[arg(long, short)]
        force: bool,
    },
}

impl ShareCommand {
    pub fn run(&self, lab: &CoffeeLab, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
        match &self.command {
            ShareSubcommand::Export => {
                let token = lab.export_token()?;
                println!("{}{}", config.share_base, share_fragment(&token));
                println!();
                println!("Send this link to your other device to sync your data.");
                Ok(())
            }

            ShareSubcommand::Import { link, force } => {
                let outcome = lab.import_from_link(link, || {
                    if *force {
                        return true;
                    }
                    confirm("Import data from this link? This overwrites your local data.")
                        .unwrap_or(false)
                })?;

                match outcome {
                    ImportOutcome::NoToken => {
                        Err("No import token found in the link (expected an #import= fragment)"
                            .into())
                    }
                    ImportOutcome::Declined => {
                        println!("Import cancelled");
                        Ok(())
                    }
                    ImportOutcome::Failed(e) => {
                        Err(format!("Import failed: {}. The link might be broken.", e).into())
                    }
                    ImportOutcome::Applied { brews, drinks } => {
                        println!("Data imported successfully");
                        if let Some(count) = brews {
                            println!("  {} brew(s)", count);
                        }
                        if let Some(count) = drinks {
                            println!("  {} drink(s)", count);
                        }
                        Ok(())
                    }
                }
            }
        }
    }
}
