use crate::error::{BalanceError, BalanceResult};
use clap::{parser::ValueSource, ArgMatches, Args};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use strum_macros::{Display, EnumIter, EnumString};

#[derive(Args, Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    #[command(flatten)]
    pub evolution: EvolutionParams,
    #[command(flatten)]
    pub workload: WorkloadParams,
}

/// Generational step used to advance a population.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, EnumString, Display, Serialize, Deserialize,
)]
#[strum(serialize_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum Strategy {
    /// Roulette-pick two parents, recombine, mutate the child, replace the weaker parent.
    Crossover,
    /// Roulette-pick two members and hill-climb both in place.
    TwoRandom,
}

#[derive(Args, Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EvolutionParams {
    #[arg(long, default_value_t = 20)]
    pub population_size: usize,
    /// Chance of re-ranking buckets after each group while seeding the population.
    #[arg(long, default_value_t = 0.5)]
    pub sorting_chance: f32,
    #[arg(long, default_value_t = 1000)]
    pub generations: usize,
    #[arg(long, default_value_t = 10)]
    pub mutations_per_child: usize,
    #[arg(long, default_value_t = 1)]
    pub trials: usize,
    /// Generations without a new best before a trial stops. 0 disables.
    #[arg(long, default_value_t = 0)]
    pub patience: usize,
    #[arg(long, default_value_t = true, action = clap::ArgAction::Set)]
    pub stop_at_zero: bool,
}

impl Default for EvolutionParams {
    fn default() -> Self {
        Self {
            population_size: 20,
            sorting_chance: 0.5,
            generations: 1000,
            mutations_per_child: 10,
            trials: 1,
            patience: 0,
            stop_at_zero: true,
        }
    }
}

#[derive(Args, Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkloadParams {
    #[arg(long, default_value_t = 100)]
    pub groups: usize,
    #[arg(long, default_value_t = 25)]
    pub buckets: usize,
    #[arg(long, default_value_t = 1000)]
    pub max_group_scale: u64,
    #[arg(long, default_value_t = 100)]
    pub max_unit_factor: u64,
}

impl Default for WorkloadParams {
    fn default() -> Self {
        Self {
            groups: 100,
            buckets: 25,
            max_group_scale: 1000,
            max_unit_factor: 100,
        }
    }
}

impl Config {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> BalanceResult<Self> {
        let content = fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Overlays only the flags the user typed, so file values survive clap defaults.
    pub fn merge_from_cli(&mut self, cli: &Config, matches: &ArgMatches) {
        macro_rules! update_if_present {
            ($section:ident . $field:ident) => {
                if matches.value_source(stringify!($field)) == Some(ValueSource::CommandLine) {
                    self.$section.$field = cli.$section.$field.clone();
                }
            };
        }

        update_if_present!(evolution.population_size);
        update_if_present!(evolution.sorting_chance);
        update_if_present!(evolution.generations);
        update_if_present!(evolution.mutations_per_child);
        update_if_present!(evolution.trials);
        update_if_present!(evolution.patience);
        update_if_present!(evolution.stop_at_zero);

        update_if_present!(workload.groups);
        update_if_present!(workload.buckets);
        update_if_present!(workload.max_group_scale);
        update_if_present!(workload.max_unit_factor);
    }

    pub fn validate(&self) -> BalanceResult<()> {
        self.evolution.validate()?;
        self.workload.validate()
    }
}

impl EvolutionParams {
    pub fn validate(&self) -> BalanceResult<()> {
        if self.population_size == 0 {
            return Err(BalanceError::Config(
                "population_size must be at least 1".into(),
            ));
        }
        if !(0.0..=1.0).contains(&self.sorting_chance) {
            return Err(BalanceError::Config(format!(
                "sorting_chance must be within [0, 1], got {}",
                self.sorting_chance
            )));
        }
        if self.trials == 0 {
            return Err(BalanceError::Config("trials must be at least 1".into()));
        }
        Ok(())
    }
}

impl WorkloadParams {
    pub fn validate(&self) -> BalanceResult<()> {
        if self.groups == 0 || self.buckets == 0 {
            return Err(BalanceError::Config(format!(
                "workload needs at least one group and one bucket (groups={}, buckets={})",
                self.groups, self.buckets
            )));
        }
        if self.max_group_scale == 0 || self.max_unit_factor == 0 {
            return Err(BalanceError::Config(
                "max_group_scale and max_unit_factor must be positive".into(),
            ));
        }
        let largest_total = (self.max_group_scale - 1)
            .checked_mul(self.max_unit_factor - 1)
            .and_then(|unit| unit.checked_mul(self.groups as u64))
            .and_then(|total| total.checked_mul(self.buckets as u64));
        if largest_total.is_none() {
            return Err(BalanceError::Config(
                "generated loads could overflow u64, lower the scale or factor".into(),
            ));
        }
        Ok(())
    }
}
