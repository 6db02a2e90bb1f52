use super::errors::SolveError;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// How the crossover segment is placed in the gene sequence.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum SegmentPolicy {
    /// The middle half, `[N/4, 3N/4]`, identical for every crossover.
    Fixed,
    /// Fresh bounds drawn for every crossover.
    Random,
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum MutationPolicy {
    /// Mutants join the population unconditionally; the next selection decides.
    AlwaysAccept,
    /// A mutant costlier than its parent is replaced by a copy of the parent.
    RejectOnWorse,
}

/// Switches the mutation rate to `rate` once remaining time first falls below
/// `below_fraction` of the budget.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
pub struct MutationBoost {
    pub below_fraction: f64,
    pub rate: f64,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    pub population_size: usize,
    pub selection_rate: f64,
    pub mutation_rate: f64,
    pub mutation_boosts: Vec<MutationBoost>,
    pub time_error_rate: f64,
    pub safety_margin: f64,
    pub segment: SegmentPolicy,
    pub mutation_policy: MutationPolicy,
    pub seed: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            population_size: 20,
            selection_rate: 60.0,
            mutation_rate: 50.0,
            mutation_boosts: vec![MutationBoost {
                below_fraction: 0.25,
                rate: 60.0,
            }],
            time_error_rate: 0.02,
            safety_margin: 0.05,
            segment: SegmentPolicy::Fixed,
            mutation_policy: MutationPolicy::AlwaysAccept,
            seed: None,
        }
    }
}

impl Config {
    /// Merges `hyperparameters` over the defaults and validates the result.
    pub fn initialize(hyperparameters: &Option<Map<String, Value>>) -> Result<Self> {
        let mut merged_params = serde_json::to_value(Self::default())?;
        if let (Value::Object(ref mut obj), Some(map)) = (&mut merged_params, hyperparameters) {
            for (k, v) in map {
                obj.insert(k.clone(), v.clone());
            }
        }
        let config: Self = serde_json::from_value(merged_params)
            .map_err(|e| SolveError::InvalidHyperparameters {
                reason: e.to_string(),
            })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> std::result::Result<(), SolveError> {
        if self.population_size == 0 {
            return Err(SolveError::InvalidPopulationSize);
        }
        if !(self.selection_rate > 0.0 && self.selection_rate <= 100.0) {
            return Err(SolveError::InvalidSelectionRate {
                rate: self.selection_rate,
            });
        }
        if !(self.mutation_rate > 0.0 && self.mutation_rate.is_finite()) {
            return Err(SolveError::InvalidMutationRate {
                rate: self.mutation_rate,
            });
        }
        if !(self.time_error_rate >= 0.0 && self.time_error_rate < 1.0) {
            return Err(SolveError::InvalidSchedule {
                reason: format!("time_error_rate {} not in [0, 1)", self.time_error_rate),
            });
        }
        if !(self.safety_margin >= 0.0 && self.safety_margin.is_finite()) {
            return Err(SolveError::InvalidSchedule {
                reason: format!("safety_margin {} must be non-negative", self.safety_margin),
            });
        }
        for boost in &self.mutation_boosts {
            if !(boost.below_fraction > 0.0 && boost.below_fraction <= 1.0) {
                return Err(SolveError::InvalidSchedule {
                    reason: format!("below_fraction {} not in (0, 1]", boost.below_fraction),
                });
            }
            if !(boost.rate > 0.0 && boost.rate.is_finite()) {
                return Err(SolveError::InvalidMutationRate { rate: boost.rate });
            }
        }
        Ok(())
    }
}
