use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::clock::is_today;

use super::ToolInputError;

pub const GLASS_ML: u32 = 250;
pub const DEFAULT_TARGET_ML: u32 = 2000;

/// Day-keyed water counter. A counter from another day reads as zero.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WaterIntake {
    pub date: Option<NaiveDate>,
    pub consumed_ml: u32,
}

impl WaterIntake {
    pub fn consumed_on(&self, now: NaiveDateTime) -> u32 {
        if is_today(self.date.as_ref(), now) {
            self.consumed_ml
        } else {
            0
        }
    }

    pub fn add(&mut self, amount_ml: u32, now: NaiveDateTime) {
        let consumed = self.consumed_on(now);
        self.date = Some(now.date());
        self.consumed_ml = consumed.saturating_add(amount_ml);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WaterTarget(u32);

impl WaterTarget {
    pub fn new(target_ml: u32) -> Result<Self, ToolInputError> {
        if target_ml == 0 {
            return Err(ToolInputError::InvalidWaterTarget(target_ml.to_string()));
        }
        Ok(Self(target_ml))
    }

    pub fn parse(raw: &str) -> Result<Self, ToolInputError> {
        raw.trim()
            .parse::<u32>()
            .map_err(|_| ToolInputError::InvalidWaterTarget(raw.trim().to_string()))
            .and_then(Self::new)
    }

    pub fn ml(&self) -> u32 {
        self.0
    }
}

impl Default for WaterTarget {
    fn default() -> Self {
        Self(DEFAULT_TARGET_ML)
    }
}

/// Parses an optional amount in ml. No amount means one glass.
pub fn parse_amount(raw: &str) -> Result<u32, ToolInputError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(GLASS_ML);
    }

    match raw.parse::<u32>() {
        Ok(amount) if amount > 0 => Ok(amount),
        _ => Err(ToolInputError::InvalidWaterAmount(raw.to_string())),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaterProgress {
    pub consumed_ml: u32,
    pub target_ml: u32,
    /// Share of the target reached, capped at 100.
    pub percent: u32,
    pub met: bool,
}

impl WaterProgress {
    pub fn new(consumed_ml: u32, target: WaterTarget) -> Self {
        let target_ml = target.ml().max(1);
        let percent = (u64::from(consumed_ml) * 100 / u64::from(target_ml)).min(100) as u32;

        Self {
            consumed_ml,
            target_ml,
            percent,
            met: consumed_ml >= target_ml,
        }
    }
}
