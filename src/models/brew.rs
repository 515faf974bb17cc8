use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::store::{Record, Slot};

/// One phase of a pressure profile: a target pressure and the scale
/// weight at which it applies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PressurePhase {
    pub bar: String,
    pub weight: String,
}

impl PressurePhase {
    pub fn new(bar: impl Into<String>, weight: impl Into<String>) -> Self {
        Self {
            bar: bar.into(),
            weight: weight.into(),
        }
    }
}

/// A logged espresso extraction.
///
/// `id` is unique within the brew collection and immutable once assigned.
/// Dose and ratio are kept as entered (free text); yield and bean age are
/// derived at render time, never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Brew {
    pub id: i64,
    pub created_date: DateTime<Utc>,
    pub bean_name: Option<String>,
    pub roast_date: Option<NaiveDate>,
    pub dose: Option<String>,
    pub ratio: Option<String>,
    pub grind_size: Option<String>,
    pub rpm: Option<String>,
    pub peak: PressurePhase,
    pub preinfusion: Option<PressurePhase>,
    pub tapering: Option<PressurePhase>,
}

impl Brew {
    pub fn new(id: i64, peak: PressurePhase) -> Self {
        Self {
            id,
            created_date: Utc::now(),
            bean_name: None,
            roast_date: None,
            dose: None,
            ratio: None,
            grind_size: None,
            rpm: None,
            peak,
            preinfusion: None,
            tapering: None,
        }
    }

    pub fn with_bean_name(mut self, bean_name: impl Into<String>) -> Self {
        self.bean_name = Some(bean_name.into());
        self
    }

    pub fn with_roast_date(mut self, roast_date: NaiveDate) -> Self {
        self.roast_date = Some(roast_date);
        self
    }

    pub fn with_dose(mut self, dose: impl Into<String>) -> Self {
        self.dose = Some(dose.into());
        self
    }

    pub fn with_ratio(mut self, ratio: impl Into<String>) -> Self {
        self.ratio = Some(ratio.into());
        self
    }

    pub fn with_grind_size(mut self, grind_size: impl Into<String>) -> Self {
        self.grind_size = Some(grind_size.into());
        self
    }

    pub fn with_rpm(mut self, rpm: impl Into<String>) -> Self {
        self.rpm = Some(rpm.into());
        self
    }

    pub fn with_preinfusion(mut self, phase: PressurePhase) -> Self {
        self.preinfusion = Some(phase);
        self
    }

    pub fn with_tapering(mut self, phase: PressurePhase) -> Self {
        self.tapering = Some(phase);
        self
    }

    /// Target yield in grams (`dose * ratio`), when both fields parse.
    pub fn target_yield(&self) -> Option<f64> {
        let dose: f64 = self.dose.as_deref()?.trim().parse().ok()?;
        let ratio: f64 = self.ratio.as_deref()?.trim().parse().ok()?;
        Some(dose * ratio)
    }

    /// Whole days since the roast date, relative to `today`.
    pub fn bean_age_days(&self, today: NaiveDate) -> Option<i64> {
        self.roast_date.map(|roast| (today - roast).num_days())
    }

    pub fn freshness(&self, today: NaiveDate) -> Option<FreshnessBand> {
        self.bean_age_days(today).map(FreshnessBand::for_age)
    }
}

impl fmt::Display for Brew {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = self.bean_name.as_deref().unwrap_or("Unknown Bean");
        writeln!(f, "{}", name)?;
        writeln!(f, "{}", "=".repeat(name.len()))?;
        writeln!(f, "Logged: {}", self.created_date.format("%Y-%m-%d %H:%M"))?;

        if let Some(roast) = self.roast_date {
            let today = Utc::now().date_naive();
            let days = (today - roast).num_days();
            writeln!(
                f,
                "Roasted: {} ({} days, {})",
                roast,
                days,
                FreshnessBand::for_age(days)
            )?;
        }

        if let Some(dose) = &self.dose {
            match (self.ratio.as_deref(), self.target_yield()) {
                (Some(ratio), Some(target)) => {
                    writeln!(f, "Dose: {} g at 1:{} (target {:.1} g)", dose, ratio, target)?
                }
                (Some(ratio), None) => writeln!(f, "Dose: {} g at 1:{}", dose, ratio)?,
                _ => writeln!(f, "Dose: {} g", dose)?,
            }
        }

        if let Some(grind) = &self.grind_size {
            match &self.rpm {
                Some(rpm) => writeln!(f, "Grind: {} @ {} RPM", grind, rpm)?,
                None => writeln!(f, "Grind: {}", grind)?,
            }
        }

        writeln!(f, "\nProfile:")?;
        if let Some(pre) = &self.preinfusion {
            writeln!(f, "  Pre-inf: {}bar -> {}g", pre.bar, pre.weight)?;
        }
        writeln!(f, "  Peak: {}bar -> {}g", self.peak.bar, self.peak.weight)?;
        if let Some(taper) = &self.tapering {
            writeln!(f, "  Taper: {}bar -> {}g", taper.bar, taper.weight)?;
        }

        Ok(())
    }
}

/// Freshness category for a bean age, per the 7/30-day thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FreshnessBand {
    Fresh,
    Peak,
    Old,
}

impl FreshnessBand {
    pub fn for_age(days: i64) -> Self {
        if days < 7 {
            FreshnessBand::Fresh
        } else if days > 30 {
            FreshnessBand::Old
        } else {
            FreshnessBand::Peak
        }
    }
}

impl fmt::Display for FreshnessBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FreshnessBand::Fresh => write!(f, "fresh"),
            FreshnessBand::Peak => write!(f, "peak"),
            FreshnessBand::Old => write!(f, "old"),
        }
    }
}

/// Partial update for a brew. `Some` fields overwrite, `None` fields keep
/// their stored values; the record id is never part of a patch.
#[derive(Debug, Clone, Default)]
pub struct BrewPatch {
    pub bean_name: Option<String>,
    pub roast_date: Option<NaiveDate>,
    pub dose: Option<String>,
    pub ratio: Option<String>,
    pub grind_size: Option<String>,
    pub rpm: Option<String>,
    pub peak: Option<PressurePhase>,
    pub preinfusion: Option<PressurePhase>,
    pub tapering: Option<PressurePhase>,
}

impl BrewPatch {
    pub fn is_empty(&self) -> bool {
        self.bean_name.is_none()
            && self.roast_date.is_none()
            && self.dose.is_none()
            && self.ratio.is_none()
            && self.grind_size.is_none()
            && self.rpm.is_none()
            && self.peak.is_none()
            && self.preinfusion.is_none()
            && self.tapering.is_none()
    }
}

impl Record for Brew {
    const SLOT: Slot = Slot::Brews;
    type Patch = BrewPatch;

    fn id(&self) -> i64 {
        self.id
    }

    fn apply(&mut self, patch: &BrewPatch) {
        if let Some(bean_name) = &patch.bean_name {
            self.bean_name = Some(bean_name.clone());
        }
        if let Some(roast_date) = patch.roast_date {
            self.roast_date = Some(roast_date);
        }
        if let Some(dose) = &patch.dose {
            self.dose = Some(dose.clone());
        }
        if let Some(ratio) = &patch.ratio {
            self.ratio = Some(ratio.clone());
        }
        if let Some(grind_size) = &patch.grind_size {
            self.grind_size = Some(grind_size.clone());
        }
        if let Some(rpm) = &patch.rpm {
            self.rpm = Some(rpm.clone());
        }
        if let Some(peak) = &patch.peak {
            self.peak = peak.clone();
        }
        if let Some(preinfusion) = &patch.preinfusion {
            self.preinfusion = Some(preinfusion.clone());
        }
        if let Some(tapering) = &patch.tapering {
            self.tapering = Some(tapering.clone());
        }
    }
}
