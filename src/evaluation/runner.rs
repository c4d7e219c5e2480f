//! Batch evaluation over consecutive seeds

use std::fmt;

use serde::Serialize;
use tracing::info;

use crate::core::config::SimulationConfig;
use crate::core::error::{BadlandsError, Result};
use crate::core::types::Tick;
use crate::evaluation::stats::{rate, Summary};
use crate::learning::ValueTable;
use crate::simulation::{RunState, Simulation, SimulationResult};

/// Ticks between progression samples
pub const SAMPLE_INTERVAL: Tick = 10;

/// Hunter readings taken every `SAMPLE_INTERVAL` ticks
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ProgressSample {
    pub tick: Tick,
    pub reputation: u32,
    pub health: i32,
    pub stamina: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunRecord {
    pub result: SimulationResult,
    /// Reputation at the end, counted as 0 for a hunter that died
    pub final_reputation: u32,
    pub progression: Vec<ProgressSample>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EvaluationReport {
    pub runs: usize,
    pub base_seed: u64,
    pub ticks: Summary,
    pub reputation: Summary,
    pub victory_rate: f64,
    pub survival_rate: f64,
    pub average_trophies: f64,
    pub records: Vec<RunRecord>,
}

/// Runs `runs` simulations with seeds `base_seed..base_seed + runs`
#[derive(Debug, Clone)]
pub struct Evaluator {
    pub runs: usize,
    pub base_seed: u64,
    /// Seed each run's learner with the table the previous run ended with
    pub carry_learning: bool,
}

impl Evaluator {
    pub fn new(runs: usize, base_seed: u64) -> Self {
        Self {
            runs,
            base_seed,
            carry_learning: false,
        }
    }

    pub fn carry_learning(mut self, carry: bool) -> Self {
        self.carry_learning = carry;
        self
    }

    pub fn run(&self, config: &SimulationConfig) -> Result<EvaluationReport> {
        if self.runs == 0 {
            return Err(BadlandsError::Config("evaluation needs at least one run".into()));
        }

        let mut records = Vec::with_capacity(self.runs);
        let mut carried: Option<ValueTable> = None;

        for i in 0..self.runs {
            let seed = self.base_seed + i as u64;
            let run_config = SimulationConfig {
                seed,
                ..config.clone()
            };
            let mut sim = Simulation::new(run_config)?;
            if let Some(table) = carried.take() {
                sim = sim.with_value_table(table);
            }

            let record = run_recorded(&mut sim);
            info!(
                run = i + 1,
                seed,
                state = ?record.result.state,
                ticks = record.result.ticks,
                reputation = record.final_reputation,
                rank = %record.result.rank,
                "run complete"
            );

            if self.carry_learning {
                carried = sim.policy().map(|policy| policy.table().clone());
            }
            records.push(record);
        }

        EvaluationReport::from_records(self.base_seed, records)
    }
}

/// Step a simulation to the end, sampling the hunter along the way
pub fn run_recorded(sim: &mut Simulation) -> RunRecord {
    let mut progression = Vec::new();
    while !sim.state().is_terminal() {
        sim.step();
        let tick = sim.current_tick();
        if tick % SAMPLE_INTERVAL == 0 {
            let hunter = sim.world().get(sim.cast().protagonist);
            progression.push(ProgressSample {
                tick,
                reputation: hunter.map_or(0, |entity| entity.reputation()),
                health: hunter.map_or(0, |entity| entity.vitals.health),
                stamina: hunter.and_then(|entity| entity.stamina()).unwrap_or(0),
            });
        }
    }

    let result = sim.result();
    let final_reputation = if result.survived { result.reputation } else { 0 };
    RunRecord {
        result,
        final_reputation,
        progression,
    }
}

impl EvaluationReport {
    pub fn from_records(base_seed: u64, records: Vec<RunRecord>) -> Result<Self> {
        let ticks: Vec<f64> = records.iter().map(|record| record.result.ticks as f64).collect();
        let reputations: Vec<f64> = records.iter().map(|record| record.final_reputation as f64).collect();
        let (Some(ticks), Some(reputation)) = (Summary::from_samples(&ticks), Summary::from_samples(&reputations))
        else {
            return Err(BadlandsError::Config("no runs to summarise".into()));
        };

        let trophies: usize = records.iter().map(|record| record.result.trophies.len()).sum();
        Ok(Self {
            runs: records.len(),
            base_seed,
            ticks,
            reputation,
            victory_rate: rate(records.iter().map(|record| record.result.victory)),
            survival_rate: rate(records.iter().map(|record| record.result.survived)),
            average_trophies: trophies as f64 / records.len() as f64,
            records,
        })
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

fn outcome_label(state: RunState) -> &'static str {
    match state {
        RunState::Victory => "VICTORY",
        RunState::Defeat => "DEFEAT",
        RunState::Timeout => "TIMEOUT",
        RunState::Running => "RUNNING",
    }
}

fn write_summary(f: &mut fmt::Formatter<'_>, label: &str, summary: &Summary) -> fmt::Result {
    writeln!(f, "{label} (mean ± std):  {:.2} ± {:.2}", summary.mean, summary.std)?;
    writeln!(f, "{label} (median):      {:.2}", summary.median)?;
    writeln!(f, "{label} (range):       {:.0} - {:.0}", summary.min, summary.max)?;
    writeln!(f, "95% confidence interval: ({:.2}, {:.2})", summary.ci95.0, summary.ci95.1)
}

impl fmt::Display for EvaluationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rule = "-".repeat(70);
        writeln!(f, "{}", "=".repeat(70))?;
        writeln!(f, "BADLANDS HUNT - EVALUATION REPORT")?;
        writeln!(f, "{}", "=".repeat(70))?;
        writeln!(f, "Runs: {} (seeds {}..{})", self.runs, self.base_seed, self.base_seed + self.runs as u64)?;
        writeln!(f)?;

        writeln!(f, "{rule}\nSURVIVAL\n{rule}")?;
        write_summary(f, "Ticks", &self.ticks)?;
        writeln!(f)?;
        writeln!(f, "{rule}\nREPUTATION\n{rule}")?;
        write_summary(f, "Final reputation", &self.reputation)?;
        writeln!(f)?;

        writeln!(f, "{rule}\nSUCCESS RATES\n{rule}")?;
        writeln!(f, "Boss defeated:      {:.1}%", self.victory_rate)?;
        writeln!(f, "Hunter survived:    {:.1}%", self.survival_rate)?;
        writeln!(f, "Average trophies:   {:.2}", self.average_trophies)?;
        writeln!(f)?;

        writeln!(f, "{rule}\nRUNS\n{rule}")?;
        for (i, record) in self.records.iter().enumerate() {
            let result = &record.result;
            writeln!(
                f,
                "Run {:2} | {:8} | Ticks: {:3} | Reputation: {:3} | Rank: {}",
                i + 1,
                outcome_label(result.state),
                result.ticks,
                record.final_reputation,
                result.rank
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quick_config() -> SimulationConfig {
        let mut config = SimulationConfig::default();
        config.max_ticks = 40;
        config
    }

    #[test]
    fn test_seeds_are_consecutive() {
        let report = Evaluator::new(3, 100).run(&quick_config()).unwrap();
        let seeds: Vec<u64> = report.records.iter().map(|record| record.result.seed).collect();
        assert_eq!(seeds, vec![100, 101, 102]);
        assert_eq!(report.runs, 3);
    }

    #[test]
    fn test_progression_sampled_on_interval() {
        let mut sim = Simulation::new(quick_config()).unwrap();
        let record = run_recorded(&mut sim);
        assert!(record
            .progression
            .iter()
            .all(|sample| sample.tick % SAMPLE_INTERVAL == 0));
        assert_eq!(record.progression.len() as u64, record.result.ticks / SAMPLE_INTERVAL);
    }

    #[test]
    fn test_zero_runs_rejected() {
        assert!(Evaluator::new(0, 0).run(&quick_config()).is_err());
    }

    #[test]
    fn test_text_report_lists_every_run() {
        let report = Evaluator::new(2, 7).run(&quick_config()).unwrap();
        let text = report.to_string();
        assert!(text.contains("Run  1 |"));
        assert!(text.contains("Run  2 |"));
        assert!(text.contains("Boss defeated:"));
        let json: serde_json::Value = serde_json::from_str(&report.to_json().unwrap()).unwrap();
        assert_eq!(json["runs"], 2);
    }
}
