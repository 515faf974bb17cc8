use clap::{Args, Subcommand};
use std::path::PathBuf;

use super::{confirm, OutputFormat};
use crate::app::CoffeeLab;
use crate::models::{load_image_data_uri, Drink, DrinkPatch};

#[derive(Args)]
pub struct DrinkCommand {
    #[command(subcommand)]
    pub command: DrinkSubcommand,
}

#[derive(Subcommand)]
pub enum DrinkSubcommand {
    /// Add a drink recipe card
    Add {
        /// Drink title
        title: String,

        /// Recipe description
        #[arg(long)]
        description: Option<String>,

        /// Image file to embed (png, jpg, gif or webp)
        #[arg(long)]
        image: Option<PathBuf>,
    },

    /// List drink cards, newest first
    List {
        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Show one drink card
    Show {
        /// Drink id
        id: i64,

        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Update a drink card
    Update {
        /// Drink id
        id: i64,

        /// New title
        #[arg(long)]
        title: Option<String>,

        /// New description
        #[arg(long)]
        description: Option<String>,

        /// New image file to embed; the stored image is kept if omitted
        #[arg(long)]
        image: Option<PathBuf>,
    },

    /// Delete a drink card
    Delete {
        /// Drink id
        id: i64,

        /// Skip confirmation prompt
        #[arg(long, short)]
        force: bool,
    },
}

impl DrinkCommand {
    pub fn run(&self, lab: &CoffeeLab) -> Result<(), Box<dyn std::error::Error>> {
        match &self.command {
            DrinkSubcommand::Add {
                title,
                description,
                image,
            } => {
                if title.trim().is_empty() {
                    return Err("Drink title cannot be empty".into());
                }

                // Read the image before creating anything, so an
                // unreadable file aborts with no partial record.
                let image = match image {
                    Some(path) => Some(load_image_data_uri(path)?),
                    None => None,
                };

                let mut drink = Drink::new(lab.next_id(), title.trim());
                if let Some(description) = description {
                    drink = drink.with_description(description);
                }
                if let Some(image) = image {
                    drink = drink.with_image(image);
                }

                lab.create_drink(&drink)?;
                println!("Added drink {}:", drink.id);
                println!("{}", drink);
                Ok(())
            }

            DrinkSubcommand::List { format } => {
                let mut drinks = lab.list_drinks();
                drinks.sort_by(|a, b| b.id.cmp(&a.id));

                if drinks.is_empty() {
                    println!("No drinks found");
                    return Ok(());
                }

                match format {
                    OutputFormat::Json => {
                        println!("{}", serde_json::to_string_pretty(&drinks)?);
                    }
                    OutputFormat::Text => {
                        println!("{:<15}  {:<24}  IMAGE", "ID", "TITLE");
                        println!("{}", "-".repeat(50));
                        for drink in &drinks {
                            let image = if drink.image.is_some() { "yes" } else { "-" };
                            println!("{:<15}  {:<24}  {}", drink.id, drink.title, image);
                        }
                        println!("\nTotal: {} drink(s)", drinks.len());
                    }
                }
                Ok(())
            }

            DrinkSubcommand::Show { id, format } => {
                let drink = lab.list_drinks().into_iter().find(|d| d.id == *id);
                match drink {
                    Some(drink) => {
                        match format {
                            OutputFormat::Json => {
                                println!("{}", serde_json::to_string_pretty(&drink)?);
                            }
                            OutputFormat::Text => {
                                println!("{}", drink);
                            }
                        }
                        Ok(())
                    }
                    None => Err(format!("Drink not found: {}", id).into()),
                }
            }

            DrinkSubcommand::Update {
                id,
                title,
                description,
                image,
            } => {
                let patch = DrinkPatch {
                    title: title.clone(),
                    description: description.clone(),
                    image: match image {
                        Some(path) => Some(load_image_data_uri(path)?),
                        None => None,
                    },
                };

                if patch.is_empty() {
                    return Err("Nothing to update. Provide at least one option.".into());
                }

                if !lab.update_drink(*id, &patch)? {
                    return Err(format!("Drink not found: {}", id).into());
                }
                println!("Updated drink {}", id);
                Ok(())
            }

            DrinkSubcommand::Delete { id, force } => {
                if !force && !confirm("Delete this drink?")? {
                    println!("Cancelled");
                    return Ok(());
                }

                if !lab.delete_drink(*id)? {
                    return Err(format!("Drink not found: {}", id).into());
                }
                println!("Deleted drink {}", id);
                Ok(())
            }
        }
    }
}
