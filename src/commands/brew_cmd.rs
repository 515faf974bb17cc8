use chrono::{NaiveDate, Utc};
use clap::{Args, Subcommand};

use super::{confirm, OutputFormat};
use crate::app::CoffeeLab;
use crate::models::{Brew, BrewPatch, FreshnessBand, PressurePhase};

#[derive(Args)]
pub struct BrewCommand {
    #[command(subcommand)]
    pub command: BrewSubcommand,
}

#[derive(Subcommand)]
pub enum BrewSubcommand {
    /// Log a new extraction
    Add {
        /// Bean name
        #[arg(long)]
        bean: Option<String>,

        /// Roast date (YYYY-MM-DD)
        #[arg(long)]
        roast_date: Option<NaiveDate>,

        /// Dose in grams
        #[arg(long)]
        dose: Option<String>,

        /// Brew ratio (the "2.5" in 1:2.5)
        #[arg(long)]
        ratio: Option<String>,

        /// Grinder setting
        #[arg(long)]
        grind: Option<String>,

        /// Grinder RPM
        #[arg(long)]
        rpm: Option<String>,

        /// Peak pressure in bar
        #[arg(long)]
        peak_bar: String,

        /// Scale weight at peak pressure, grams
        #[arg(long)]
        peak_weight: String,

        /// Pre-infusion pressure in bar
        #[arg(long, requires = "preinfusion_weight")]
        preinfusion_bar: Option<String>,

        /// Scale weight at end of pre-infusion, grams
        #[arg(long, requires = "preinfusion_bar")]
        preinfusion_weight: Option<String>,

        /// Tapering pressure in bar
        #[arg(long, requires = "tapering_weight")]
        tapering_bar: Option<String>,

        /// Scale weight at start of taper, grams
        #[arg(long, requires = "tapering_bar")]
        tapering_weight: Option<String>,
    },

    /// List logged extractions, newest first
    List {
        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Show one extraction's details
    Show {
        /// Brew id
        id: i64,

        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Update an existing extraction
    Update {
        /// Brew id
        id: i64,

        /// New bean name
        #[arg(long)]
        bean: Option<String>,

        /// New roast date (YYYY-MM-DD)
        #[arg(long)]
        roast_date: Option<NaiveDate>,

        /// New dose in grams
        #[arg(long)]
        dose: Option<String>,

        /// New brew ratio
        #[arg(long)]
        ratio: Option<String>,

        /// New grinder setting
        #[arg(long)]
        grind: Option<String>,

        /// New grinder RPM
        #[arg(long)]
        rpm: Option<String>,

        /// New peak pressure in bar
        #[arg(long, requires = "peak_weight")]
        peak_bar: Option<String>,

        /// New weight at peak pressure, grams
        #[arg(long, requires = "peak_bar")]
        peak_weight: Option<String>,

        /// New pre-infusion pressure in bar
        #[arg(long, requires = "preinfusion_weight")]
        preinfusion_bar: Option<String>,

        /// New weight at end of pre-infusion, grams
        #[arg(long, requires = "preinfusion_bar")]
        preinfusion_weight: Option<String>,

        /// New tapering pressure in bar
        #[arg(long, requires = "tapering_weight")]
        tapering_bar: Option<String>,

        /// New weight at start of taper, grams
        #[arg(long, requires = "tapering_bar")]
        tapering_weight: Option<String>,
    },

    /// Delete an extraction
    Delete {
        /// Brew id
        id: i64,

        /// Skip confirmation prompt
        #[arg(long, short)]
        force: bool,
    },
}

impl BrewCommand {
    pub fn run(&self, lab: &CoffeeLab) -> Result<(), Box<dyn std::error::Error>> {
        match &self.command {
            BrewSubcommand::Add {
                bean,
                roast_date,
                dose,
                ratio,
                grind,
                rpm,
                peak_bar,
                peak_weight,
                preinfusion_bar,
                preinfusion_weight,
                tapering_bar,
                tapering_weight,
            } => {
                let mut brew = Brew::new(
                    lab.next_id(),
                    PressurePhase::new(peak_bar.clone(), peak_weight.clone()),
                );

                if let Some(bean) = bean {
                    brew = brew.with_bean_name(bean);
                }
                if let Some(roast_date) = roast_date {
                    brew = brew.with_roast_date(*roast_date);
                }
                if let Some(dose) = dose {
                    brew = brew.with_dose(dose);
                }
                if let Some(ratio) = ratio {
                    brew = brew.with_ratio(ratio);
                }
                if let Some(grind) = grind {
                    brew = brew.with_grind_size(grind);
                }
                if let Some(rpm) = rpm {
                    brew = brew.with_rpm(rpm);
                }
                if let (Some(bar), Some(weight)) = (preinfusion_bar, preinfusion_weight) {
                    brew = brew.with_preinfusion(PressurePhase::new(bar.clone(), weight.clone()));
                }
                if let (Some(bar), Some(weight)) = (tapering_bar, tapering_weight) {
                    brew = brew.with_tapering(PressurePhase::new(bar.clone(), weight.clone()));
                }

                lab.create_brew(&brew)?;
                println!("Logged brew {}:", brew.id);
                println!("{}", brew);
                Ok(())
            }

            BrewSubcommand::List { format } => {
                let mut brews = lab.list_brews();
                brews.sort_by(|a, b| b.id.cmp(&a.id));

                if brews.is_empty() {
                    println!("No brews logged");
                    return Ok(());
                }

                match format {
                    OutputFormat::Json => {
                        println!("{}", serde_json::to_string_pretty(&brews)?);
                    }
                    OutputFormat::Text => {
                        let today = Utc::now().date_naive();
                        println!("{:<15}  {:<20}  {:<16}  IN / OUT", "ID", "BEAN", "AGE");
                        println!("{}", "-".repeat(72));
                        for brew in &brews {
                            let bean = brew.bean_name.as_deref().unwrap_or("Unknown Bean");
                            let age = match brew.bean_age_days(today) {
                                Some(days) => {
                                    format!("{} days ({})", days, FreshnessBand::for_age(days))
                                }
                                None => "unknown age".to_string(),
                            };
                            let in_out = match (brew.dose.as_deref(), brew.target_yield()) {
                                (Some(dose), Some(target)) => {
                                    format!("{} g in, {:.1} g out", dose, target)
                                }
                                (Some(dose), None) => format!("{} g in", dose),
                                _ => "-".to_string(),
                            };
                            println!("{:<15}  {:<20}  {:<16}  {}", brew.id, bean, age, in_out);
                        }
                        println!("\nTotal: {} brew(s)", brews.len());
                    }
                }
                Ok(())
            }

            BrewSubcommand::Show { id, format } => {
                let brew = lab.list_brews().into_iter().find(|b| b.id == *id);
                match brew {
                    Some(brew) => {
                        match format {
                            OutputFormat::Json => {
                                println!("{}", serde_json::to_string_pretty(&brew)?);
                            }
                            OutputFormat::Text => {
                                println!("{}", brew);
                            }
                        }
                        Ok(())
                    }
                    None => Err(format!("Brew not found: {}", id).into()),
                }
            }

            BrewSubcommand::Update {
                id,
                bean,
                roast_date,
                dose,
                ratio,
                grind,
                rpm,
                peak_bar,
                peak_weight,
                preinfusion_bar,
                preinfusion_weight,
                tapering_bar,
                tapering_weight,
            } => {
                let mut patch = BrewPatch {
                    bean_name: bean.clone(),
                    roast_date: *roast_date,
                    dose: dose.clone(),
                    ratio: ratio.clone(),
                    grind_size: grind.clone(),
                    rpm: rpm.clone(),
                    ..Default::default()
                };
                if let (Some(bar), Some(weight)) = (peak_bar, peak_weight) {
                    patch.peak = Some(PressurePhase::new(bar.clone(), weight.clone()));
                }
                if let (Some(bar), Some(weight)) = (preinfusion_bar, preinfusion_weight) {
                    patch.preinfusion = Some(PressurePhase::new(bar.clone(), weight.clone()));
                }
                if let (Some(bar), Some(weight)) = (tapering_bar, tapering_weight) {
                    patch.tapering = Some(PressurePhase::new(bar.clone(), weight.clone()));
                }

                if patch.is_empty() {
                    return Err("Nothing to update. Provide at least one option.".into());
                }

                if !lab.update_brew(*id, &patch)? {
                    return Err(format!("Brew not found: {}", id).into());
                }
                println!("Updated brew {}", id);
                Ok(())
            }

            BrewSubcommand::Delete { id, force } => {
                if !force && !confirm("Delete this brew log?")? {
                    println!("Cancelled");
                    return Ok(());
                }

                if !lab.delete_brew(*id)? {
                    return Err(format!("Brew not found: {}", id).into());
                }
                println!("Deleted brew {}", id);
                Ok(())
            }
        }
    }
}
