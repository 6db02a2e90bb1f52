use super::chromosome::Chromosome;
use super::config::Config;
use super::crossover::crossing;
use super::errors::SolveError;
use super::mutation::mutating;
use super::population::{populate, select};
use anyhow::{anyhow, Result};
use log::{debug, info, trace, warn};
use logging_timer::time;
use rand::{rngs::SmallRng, SeedableRng};
use std::time::Instant;
use tsp_challenges::CityRegistry;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Initializing,
    Evolving,
    Finalizing,
}

/// Time-bounded evolutionary loop over one city registry.
///
/// Every generation runs selection, crossover back up to the configured size,
/// then mutation on top of it. The measured duration of each generation is
/// padded by `time_error_rate` before it is taken off the remaining budget, and
/// no new generation starts once the remainder is at or below `safety_margin`.
/// A generation in progress is never interrupted, so the wall-clock bound is
/// `budget * (1 + time_error_rate)` plus at most one generation's overshoot
/// of the margin, not `budget` exactly.
pub struct Solver<'a> {
    registry: &'a CityRegistry,
    config: Config,
    budget: f64,
    started: Instant,
    rng: SmallRng,
    phase: Phase,
    mutation_rate: f64,
    boosts_fired: Vec<bool>,
    generations: usize,
}

impl<'a> Solver<'a> {
    /// `started` is when the caller's clock began; time already spent before
    /// the solver exists counts against `budget` (seconds).
    pub fn new(
        registry: &'a CityRegistry,
        config: Config,
        budget: f64,
        started: Instant,
    ) -> std::result::Result<Self, SolveError> {
        if registry.is_empty() {
            return Err(SolveError::NoCities);
        }
        if !(budget > 0.0 && budget.is_finite()) {
            return Err(SolveError::NonPositiveBudget { budget });
        }
        config.validate()?;

        let rng = match config.seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_entropy(),
        };
        Ok(Self {
            registry,
            mutation_rate: config.mutation_rate,
            boosts_fired: vec![false; config.mutation_boosts.len()],
            config,
            budget,
            started,
            rng,
            phase: Phase::Initializing,
            generations: 0,
        })
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn generations(&self) -> usize {
        self.generations
    }

    /// Mutation rate currently in force, after any boosts.
    pub fn mutation_rate(&self) -> f64 {
        self.mutation_rate
    }

    fn enter(&mut self, phase: Phase) {
        debug!(
            "{:?} -> {:?} after {:.3}s",
            self.phase,
            phase,
            self.started.elapsed().as_secs_f64()
        );
        self.phase = phase;
    }

    fn apply_boosts(&mut self, time_left: f64) {
        for (i, boost) in self.config.mutation_boosts.iter().enumerate() {
            if !self.boosts_fired[i] && time_left < self.budget * boost.below_fraction {
                self.boosts_fired[i] = true;
                self.mutation_rate = boost.rate;
                info!(
                    "Mutation rate raised to {}% with {:.3}s left",
                    boost.rate, time_left
                );
            }
        }
    }

    /// Runs the search to the end of the budget and returns the cheapest tour.
    /// `observer` sees the best chromosome after each selection; its errors
    /// are logged and otherwise ignored.
    #[time("info", "Solver::{}")]
    pub fn run(
        &mut self,
        observer: Option<&dyn Fn(&Chromosome) -> Result<()>>,
    ) -> Result<Chromosome> {
        let mut population = populate(self.config.population_size, self.registry, &mut self.rng);

        let mut time_left = self.budget - self.started.elapsed().as_secs_f64();
        time_left -= time_left * self.config.time_error_rate;

        self.enter(Phase::Evolving);
        while time_left > self.config.safety_margin {
            let generation_start = Instant::now();

            select(&mut population, self.config.selection_rate);
            trace!(
                "Generation {}: best cost {}",
                self.generations,
                population[0].cost()
            );
            if let Some(observer) = observer {
                if let Err(e) = observer(&population[0]) {
                    warn!("Observer failed: {}", e);
                }
            }
            crossing(
                &mut population,
                self.config.population_size,
                self.registry,
                self.config.segment,
                &mut self.rng,
            );
            mutating(
                &mut population,
                self.mutation_rate,
                self.config.mutation_policy,
                self.registry,
                &mut self.rng,
            );
            self.apply_boosts(time_left);
            self.generations += 1;

            let elapsed = generation_start.elapsed().as_secs_f64();
            time_left -= elapsed + elapsed * self.config.time_error_rate;
        }

        self.enter(Phase::Finalizing);
        population.sort_by(|a, b| a.cost().total_cmp(&b.cost()));
        let best = population
            .into_iter()
            .next()
            .ok_or_else(|| anyhow!("Population is empty"))?;
        info!(
            "Best cost {} after {} generations",
            best.cost(),
            self.generations
        );
        debug!("Best tour {}", best);
        Ok(best)
    }
}
