use fractic_server_error::ServerError;

use crate::errors::{InvalidEngineerRouting, InvalidSplitRule};

use super::work_record::VisaCategory;

const SPLIT_SUM_TOLERANCE: f64 = 1e-9;

#[derive(Debug, PartialEq, Clone, serde_derive::Serialize)]
pub struct EngineerAssignment {
    pub name: String,
    pub categories: Vec<VisaCategory>,
}

/// Static visa category -> reviewing engineer table. Every category is owned
/// by exactly one engineer.
#[derive(Debug, PartialEq, Clone, serde_derive::Serialize)]
pub struct EngineerRouting {
    assignments: Vec<EngineerAssignment>,
}

/// Fraction of each engineer's gross kept by the consejo; the rest goes to the
/// engineer. The two always sum to 1.
#[derive(Debug, PartialEq, Clone, Copy, serde_derive::Serialize)]
pub struct SplitRule {
    consejo_pct: f64,
    engineer_pct: f64,
}

#[derive(Debug, PartialEq, Clone, Default)]
pub struct TasasConfig {
    pub routing: EngineerRouting,
    pub split: SplitRule,
}

// --

pub fn assignment(name: impl Into<String>, categories: &[VisaCategory]) -> EngineerAssignment {
    EngineerAssignment {
        name: name.into(),
        categories: categories.to_vec(),
    }
}

impl EngineerRouting {
    pub fn new(assignments: Vec<EngineerAssignment>) -> Result<Self, ServerError> {
        for category in VisaCategory::ALL {
            let owners: Vec<&str> = assignments
                .iter()
                .filter(|a| a.categories.contains(&category))
                .map(|a| a.name.as_str())
                .collect();
            match owners.len() {
                0 => {
                    return Err(InvalidEngineerRouting::new(&format!(
                        "category '{}' has no owning engineer",
                        category
                    )))
                }
                1 => {}
                _ => {
                    return Err(InvalidEngineerRouting::new(&format!(
                        "category '{}' is owned by more than one engineer ({})",
                        category,
                        owners.join(", ")
                    )))
                }
            }
        }
        for a in &assignments {
            if a.name.trim().is_empty() {
                return Err(InvalidEngineerRouting::new("engineer name is blank"));
            }
            if assignments.iter().filter(|b| b.name == a.name).count() > 1 {
                return Err(InvalidEngineerRouting::new(&format!(
                    "engineer '{}' listed more than once",
                    a.name
                )));
            }
            // A category repeated within one engineer is still owned twice.
            let mut seen = a.categories.clone();
            seen.sort();
            seen.dedup();
            if seen.len() != a.categories.len() {
                return Err(InvalidEngineerRouting::new(&format!(
                    "engineer '{}' lists a category more than once",
                    a.name
                )));
            }
        }
        Ok(Self { assignments })
    }

    pub fn assignments(&self) -> &[EngineerAssignment] {
        &self.assignments
    }

    pub fn owner_of(&self, category: VisaCategory) -> Option<&str> {
        self.assignments
            .iter()
            .find(|a| a.categories.contains(&category))
            .map(|a| a.name.as_str())
    }
}

impl Default for EngineerRouting {
    fn default() -> Self {
        Self {
            assignments: vec![
                assignment(
                    "IMLAUER FERNANDO",
                    &[VisaCategory::Gas, VisaCategory::Salubridad],
                ),
                assignment(
                    "ONETTO JOSE",
                    &[VisaCategory::Electrica, VisaCategory::Electromecanica],
                ),
            ],
        }
    }
}

impl SplitRule {
    pub fn new(consejo_pct: f64, engineer_pct: f64) -> Result<Self, ServerError> {
        let valid = consejo_pct.is_finite()
            && engineer_pct.is_finite()
            && consejo_pct >= 0.0
            && engineer_pct >= 0.0
            && (consejo_pct + engineer_pct - 1.0).abs() <= SPLIT_SUM_TOLERANCE;
        if !valid {
            return Err(InvalidSplitRule::new(consejo_pct, engineer_pct));
        }
        Ok(Self {
            consejo_pct,
            engineer_pct,
        })
    }

    pub fn consejo_pct(&self) -> f64 {
        self.consejo_pct
    }

    pub fn engineer_pct(&self) -> f64 {
        self.engineer_pct
    }

    /// Splits `gross` into `(consejo_share, engineer_share)`. The consejo
    /// share is rounded to the minor currency unit and the engineer receives
    /// the remainder, so both shares always add back up to `gross`.
    pub fn split(&self, gross: f64) -> (f64, f64) {
        let consejo_share = round_to_minor_unit(gross * self.consejo_pct);
        (consejo_share, gross - consejo_share)
    }
}

impl Default for SplitRule {
    fn default() -> Self {
        Self {
            consejo_pct: 0.30,
            engineer_pct: 0.70,
        }
    }
}

fn round_to_minor_unit(amount: f64) -> f64 {
    (amount * 100.0).round() / 100.0
}
