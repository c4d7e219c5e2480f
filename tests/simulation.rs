//! End-to-end simulation tests

use ahash::AHashSet;
use badlands_hunt::core::config::SimulationConfig;
use badlands_hunt::core::types::EntityId;
use badlands_hunt::entity::HunterMind;
use badlands_hunt::simulation::{RunState, Simulation, TickEvent};

fn run_events(config: SimulationConfig) -> (Vec<Vec<TickEvent>>, Simulation) {
    let mut sim = Simulation::new(config).unwrap();
    let mut ticks = Vec::new();
    while !sim.state().is_terminal() {
        ticks.push(sim.step());
    }
    (ticks, sim)
}

/// The entity whose own turn produced this event, if any
fn actor(event: &TickEvent) -> Option<EntityId> {
    match event {
        TickEvent::Moved { entity, .. }
        | TickEvent::Rested { entity }
        | TickEvent::ActionFailed { entity, .. }
        | TickEvent::LearnerDecision { entity, .. }
        | TickEvent::BossDecision { entity, .. } => Some(*entity),
        TickEvent::Attacked { attacker, .. } => Some(*attacker),
        TickEvent::Scanned { support, .. } => Some(*support),
        _ => None,
    }
}

#[test]
fn test_same_seed_same_run() {
    let config = SimulationConfig {
        max_ticks: 200,
        ..SimulationConfig::default()
    };
    let (first_events, first) = run_events(config.clone());
    let (second_events, second) = run_events(config);

    assert_eq!(first_events, second_events);
    assert_eq!(first.result(), second.result());
    assert_eq!(first.value_table_json().unwrap(), second.value_table_json().unwrap());
}

#[test]
fn test_runs_end_by_the_tick_ceiling() {
    for seed in 0..5 {
        let config = SimulationConfig {
            seed,
            max_ticks: 150,
            ..SimulationConfig::default()
        };
        let (events, sim) = run_events(config);
        let result = sim.result();

        assert!(result.ticks <= 150);
        assert_eq!(events.len() as u64, result.ticks);
        assert_ne!(result.state, RunState::Running);
        if result.state == RunState::Timeout {
            assert_eq!(result.ticks, 150);
        }
        assert_eq!(result.survived, result.state != RunState::Defeat);
        assert_eq!(result.victory, result.state == RunState::Victory);

        let finished: Vec<_> = events
            .iter()
            .flatten()
            .filter(|event| matches!(event, TickEvent::Finished { .. }))
            .collect();
        assert_eq!(finished.len(), 1);
    }
}

#[test]
fn test_dead_entities_never_act() {
    for seed in [3, 17, 99] {
        let config = SimulationConfig {
            seed,
            max_ticks: 300,
            ..SimulationConfig::default()
        };
        let (events, sim) = run_events(config);

        let mut dead: AHashSet<EntityId> = AHashSet::new();
        for event in events.iter().flatten() {
            if let Some(id) = actor(event) {
                assert!(!dead.contains(&id), "{id} acted after dying");
            }
            match event {
                TickEvent::Defeated { defender, .. } => {
                    dead.insert(*defender);
                }
                TickEvent::Pruned { entity } => {
                    dead.insert(*entity);
                }
                _ => {}
            }
        }

        assert!(sim.world().entities().iter().all(|entity| entity.is_alive()));
    }
}

#[test]
fn test_scripted_hunter_keeps_no_table() {
    let mut config = SimulationConfig {
        max_ticks: 100,
        ..SimulationConfig::default()
    };
    config.hunter.mind = HunterMind::Scripted;
    let (events, sim) = run_events(config);

    assert!(sim.policy().is_none());
    assert_eq!(sim.value_table_json().unwrap(), None);
    assert!(sim.result().learning.is_none());
    assert!(!events
        .iter()
        .flatten()
        .any(|event| matches!(event, TickEvent::LearnerDecision { .. })));
}

#[test]
fn test_config_from_toml_drives_a_run() {
    let config = SimulationConfig::from_toml_str(
        r#"
        seed = 8
        max_ticks = 60

        [wildlife]
        count = 3

        [hazards]
        traps = 0
        hostile_terrain = 0
        weather = false
        "#,
    )
    .unwrap();
    let (_, sim) = run_events(config);
    let result = sim.result();
    assert_eq!(result.seed, 8);
    assert!(result.ticks <= 60);
}

#[test]
fn test_finished_run_ignores_further_steps() {
    let config = SimulationConfig {
        max_ticks: 20,
        ..SimulationConfig::default()
    };
    let (_, mut sim) = run_events(config);
    let ticks = sim.current_tick();
    assert!(sim.step().is_empty());
    assert_eq!(sim.current_tick(), ticks);
}
