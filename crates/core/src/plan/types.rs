//! Plan data types.

use std::str::FromStr;

use pennyplan_shared::config::PlanDefaults;
use pennyplan_shared::types::Money;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{EngineError, EngineResult};

/// Upper bound for `annual_rate` (100% per year).
const MAX_ANNUAL_RATE: Decimal = Decimal::ONE;

/// Plan type classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlanType {
    /// Flat monthly targets.
    Savings,
    /// Targets grow month over month at an assumed rate.
    Investment,
    /// Blend of the flat and growing curves.
    Hybrid,
}

impl PlanType {
    /// Wire name of the plan type.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Savings => "savings",
            Self::Investment => "investment",
            Self::Hybrid => "hybrid",
        }
    }
}

impl std::fmt::Display for PlanType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PlanType {
    type Err = EngineError;

    /// Blank input is malformed (`InvalidInput`); any other unrecognized
    /// name is `UnknownPlanType`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(EngineError::InvalidInput("plan type is required".into()));
        }
        match trimmed.to_lowercase().as_str() {
            "savings" => Ok(Self::Savings),
            "investment" => Ok(Self::Investment),
            "hybrid" => Ok(Self::Hybrid),
            _ => Err(EngineError::UnknownPlanType(trimmed.to_string())),
        }
    }
}

/// Plan type together with the parameters that type needs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "plan_type", rename_all = "lowercase")]
pub enum PlanConfig {
    /// Flat distribution; takes no parameters.
    Savings,
    /// Growing distribution.
    Investment {
        /// Assumed annual growth rate (0.06 = 6%).
        annual_rate: Decimal,
    },
    /// Blended distribution.
    Hybrid {
        /// Assumed annual growth rate for the growing part.
        annual_rate: Decimal,
        /// Percent of the weight that follows the flat curve.
        savings_share_percent: u8,
    },
}

impl PlanConfig {
    /// Returns the plan type of this configuration.
    #[must_use]
    pub const fn plan_type(&self) -> PlanType {
        match self {
            Self::Savings => PlanType::Savings,
            Self::Investment { .. } => PlanType::Investment,
            Self::Hybrid { .. } => PlanType::Hybrid,
        }
    }

    /// Builds the configuration for `plan_type` from configured defaults.
    #[must_use]
    pub fn with_defaults(plan_type: PlanType, defaults: &PlanDefaults) -> Self {
        match plan_type {
            PlanType::Savings => Self::Savings,
            PlanType::Investment => Self::Investment {
                annual_rate: defaults.annual_rate,
            },
            PlanType::Hybrid => Self::Hybrid {
                annual_rate: defaults.annual_rate,
                savings_share_percent: defaults.savings_share_percent,
            },
        }
    }

    /// Builds a configuration from a plan-type name and an untyped
    /// parameter bag, filling absent parameters from `defaults`.
    ///
    /// # Errors
    ///
    /// Returns `EngineError::UnknownPlanType` for an unrecognized name and
    /// `EngineError::InvalidInput` for a blank name, a non-object bag, or a
    /// parameter that is malformed or out of range.
    pub fn from_parts(
        plan_type: &str,
        extra_config: Option<&Value>,
        defaults: &PlanDefaults,
    ) -> EngineResult<Self> {
        let plan_type = PlanType::from_str(plan_type)?;

        let empty = Map::new();
        let params = match extra_config {
            None | Some(Value::Null) => &empty,
            Some(Value::Object(map)) => map,
            Some(other) => {
                return Err(EngineError::InvalidInput(format!(
                    "extra_config must be an object, got {other}"
                )));
            }
        };

        let config = match Self::with_defaults(plan_type, defaults) {
            Self::Savings => Self::Savings,
            Self::Investment { annual_rate } => Self::Investment {
                annual_rate: decimal_param(params, "annual_rate")?.unwrap_or(annual_rate),
            },
            Self::Hybrid {
                annual_rate,
                savings_share_percent,
            } => Self::Hybrid {
                annual_rate: decimal_param(params, "annual_rate")?.unwrap_or(annual_rate),
                savings_share_percent: percent_param(params, "savings_share_percent")?
                    .unwrap_or(savings_share_percent),
            },
        };

        config.validate()?;
        Ok(config)
    }

    /// Checks parameter ranges.
    ///
    /// # Errors
    ///
    /// Returns `EngineError::InvalidInput` if `annual_rate` is outside
    /// `[0, 1]` or `savings_share_percent` exceeds 100.
    pub fn validate(&self) -> EngineResult<()> {
        match self {
            Self::Savings => Ok(()),
            Self::Investment { annual_rate } => validate_rate(*annual_rate),
            Self::Hybrid {
                annual_rate,
                savings_share_percent,
            } => {
                validate_rate(*annual_rate)?;
                if *savings_share_percent > 100 {
                    return Err(EngineError::InvalidInput(format!(
                        "savings_share_percent must be at most 100, got {savings_share_percent}"
                    )));
                }
                Ok(())
            }
        }
    }

    /// Renders the parameters as the untyped bag external services expect.
    #[must_use]
    pub fn extra_config(&self) -> Value {
        let mut map = Map::new();
        match self {
            Self::Savings => {}
            Self::Investment { annual_rate } => {
                map.insert("annual_rate".into(), Value::String(annual_rate.to_string()));
            }
            Self::Hybrid {
                annual_rate,
                savings_share_percent,
            } => {
                map.insert("annual_rate".into(), Value::String(annual_rate.to_string()));
                map.insert(
                    "savings_share_percent".into(),
                    Value::from(*savings_share_percent),
                );
            }
        }
        Value::Object(map)
    }
}

fn validate_rate(rate: Decimal) -> EngineResult<()> {
    if rate < Decimal::ZERO || rate > MAX_ANNUAL_RATE {
        return Err(EngineError::InvalidInput(format!(
            "annual_rate must be between 0 and 1, got {rate}"
        )));
    }
    Ok(())
}

fn decimal_param(params: &Map<String, Value>, key: &str) -> EngineResult<Option<Decimal>> {
    let parsed = match params.get(key) {
        None | Some(Value::Null) => return Ok(None),
        Some(Value::Number(n)) => {
            let text = n.to_string();
            Decimal::from_str(&text).or_else(|_| Decimal::from_scientific(&text))
        }
        Some(Value::String(s)) => Decimal::from_str(s.trim()),
        Some(other) => {
            return Err(EngineError::InvalidInput(format!(
                "{key} must be a number, got {other}"
            )));
        }
    };
    parsed
        .map(Some)
        .map_err(|e| EngineError::InvalidInput(format!("{key} is not a valid decimal: {e}")))
}

fn percent_param(params: &Map<String, Value>, key: &str) -> EngineResult<Option<u8>> {
    match params.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(n)) => n
            .as_u64()
            .and_then(|v| u8::try_from(v).ok())
            .filter(|v| *v <= 100)
            .map(Some)
            .ok_or_else(|| {
                EngineError::InvalidInput(format!("{key} must be an integer in 0..=100, got {n}"))
            }),
        Some(other) => Err(EngineError::InvalidInput(format!(
            "{key} must be an integer, got {other}"
        ))),
    }
}

/// Whether cumulative actual progress is ahead of, level with, or behind
/// the cumulative ideal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PaceStatus {
    /// Cumulative actual exceeds cumulative ideal.
    Ahead,
    /// Cumulative actual equals cumulative ideal.
    OnTrack,
    /// Cumulative actual is below cumulative ideal.
    Behind,
}

impl PaceStatus {
    /// Wire name of the status.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Ahead => "ahead",
            Self::OnTrack => "on-track",
            Self::Behind => "behind",
        }
    }

    /// Classifies cumulative actual against cumulative ideal.
    #[must_use]
    pub fn compare(cumulative_actual: Money, cumulative_ideal: Money) -> Self {
        match cumulative_actual.cmp(&cumulative_ideal) {
            std::cmp::Ordering::Greater => Self::Ahead,
            std::cmp::Ordering::Equal => Self::OnTrack,
            std::cmp::Ordering::Less => Self::Behind,
        }
    }
}

impl std::fmt::Display for PaceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One month of a savings schedule.
///
/// Produced with only `month` and `ideal_target` set; the progress
/// reconciler fills the remaining fields. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanScheduleEntry {
    /// 1-based month index.
    pub month: u32,
    /// Target amount for this month.
    pub ideal_target: Money,
    /// Amount logged for this month, if any.
    pub actual_logged: Option<Money>,
    /// Sum of ideal targets up to and including this month.
    pub cumulative_ideal: Option<Money>,
    /// Sum of logged amounts up to and including this month.
    pub cumulative_actual: Option<Money>,
    /// Pace classification; `None` for months past the last logged one.
    pub pace_status: Option<PaceStatus>,
}

impl PlanScheduleEntry {
    /// Creates an entry carrying only its ideal target.
    #[must_use]
    pub const fn ideal(month: u32, ideal_target: Money) -> Self {
        Self {
            month,
            ideal_target,
            actual_logged: None,
            cumulative_ideal: None,
            cumulative_actual: None,
            pace_status: None,
        }
    }
}
