//! Badlands Hunt - Entry Point
//!
//! Runs a single narrated demo encounter or a batch evaluation over
//! consecutive seeds.

use std::path::PathBuf;

use badlands_hunt::core::config::SimulationConfig;
use badlands_hunt::core::error::Result;
use badlands_hunt::core::types::EntityId;
use badlands_hunt::entity::HunterMind;
use badlands_hunt::evaluation::Evaluator;
use badlands_hunt::simulation::{Simulation, TickEvent};
use clap::Parser;
use tracing_subscriber::EnvFilter;

/// Learning hunter versus adaptive boss
#[derive(Parser, Debug)]
#[command(name = "badlands-hunt")]
#[command(about = "Run the hunt once, or evaluate it over many seeds")]
struct Args {
    /// Run one encounter and narrate notable events
    #[arg(long)]
    demo: bool,

    /// Number of evaluation runs (seeds start at --seed)
    #[arg(long, default_value_t = 20)]
    runs: usize,

    /// Seed for the demo, base seed for evaluation
    #[arg(long)]
    seed: Option<u64>,

    /// Tick ceiling per run
    #[arg(long)]
    max_ticks: Option<u64>,

    /// TOML config file; missing keys keep their defaults
    #[arg(long)]
    config: Option<PathBuf>,

    /// Print the evaluation report (or demo result) as JSON
    #[arg(long)]
    json: bool,

    /// Rule-based hunter instead of the learner
    #[arg(long)]
    scripted: bool,

    /// Boss without pattern detection or ability unlocks
    #[arg(long)]
    static_boss: bool,

    /// Carry the learned value table from one evaluation run to the next
    #[arg(long)]
    carry_learning: bool,
}

fn load_config(args: &Args) -> Result<SimulationConfig> {
    let mut config = match &args.config {
        Some(path) => SimulationConfig::load(path)?,
        None => SimulationConfig::default(),
    };
    if let Some(seed) = args.seed {
        config.seed = seed;
    }
    if let Some(max_ticks) = args.max_ticks {
        config.max_ticks = max_ticks;
    }
    if args.scripted {
        config.hunter.mind = HunterMind::Scripted;
    }
    if args.static_boss {
        config.boss.adaptive = false;
    }
    config.validate()?;
    Ok(config)
}

fn narrate(sim: &Simulation, event: &TickEvent) {
    let name = |id: EntityId| {
        sim.world()
            .get(id)
            .map_or_else(|| id.to_string(), |entity| entity.name.clone())
    };
    let tick = sim.current_tick();
    match event {
        TickEvent::Defeated { attacker, defender } => {
            println!("[{tick:3}] {} defeated {}", name(*attacker), name(*defender))
        }
        TickEvent::RankChanged { entity, from, to } => {
            println!("[{tick:3}] {} rank {from} -> {to}", name(*entity))
        }
        TickEvent::TrophyCollected { entity, trophy } => {
            println!("[{tick:3}] {} claims trophy {trophy}", name(*entity))
        }
        TickEvent::Challenged { winner, loser } => {
            println!("[{tick:3}] {} wins a clan challenge against {}", name(*winner), name(*loser))
        }
        TickEvent::Advice { text, .. } => println!("[{tick:3}] Thia: {text}"),
        TickEvent::AbilityUnlocked { ability, .. } => {
            println!("[{tick:3}] The boss unlocks {ability:?}")
        }
        TickEvent::PatternCountered { pattern, .. } => {
            println!("[{tick:3}] The boss counters {pattern:?}")
        }
        TickEvent::Weather(change) => println!("[{tick:3}] Weather: {change:?}"),
        TickEvent::Finished { state, .. } => println!("[{tick:3}] Finished: {state:?}"),
        _ => {}
    }
}

fn run_demo(config: SimulationConfig, json: bool) -> Result<()> {
    let mut sim = Simulation::new(config)?;
    while !sim.state().is_terminal() {
        let events = sim.step();
        if !json {
            for event in &events {
                narrate(&sim, event);
            }
        }
    }

    let result = sim.result();
    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        println!();
        println!("Outcome:    {:?} after {} ticks", result.state, result.ticks);
        println!("Reputation: {} ({})", result.reputation, result.rank);
        match result.standing.next_threshold {
            Some(threshold) => println!("Next rank:  {threshold} ({} to go)", result.standing.needed),
            None => println!("Next rank:  none, top of the ladder"),
        }
        if result.standing.clan_acceptance {
            println!("Clan:       accepted");
        }
        println!("Trophies:   {}", result.trophies.len());
        if let Some(stats) = &result.learning {
            println!(
                "Learning:   {} states, {} entries, ε = {:.3}",
                stats.q_table_size, stats.total_state_actions, stats.current_epsilon
            );
        }
        if let Some(stats) = &result.adaptation {
            println!(
                "Boss:       adaptation level {}, {} damage absorbed",
                stats.adaptation_level, stats.total_damage_received
            );
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("badlands_hunt=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let config = load_config(&args)?;

    if args.demo {
        return run_demo(config, args.json);
    }

    let report = Evaluator::new(args.runs, config.seed)
        .carry_learning(args.carry_learning)
        .run(&config)?;
    if args.json {
        println!("{}", report.to_json()?);
    } else {
        print!("{report}");
    }
    Ok(())
}
