//! Tick system - the turn scheduler
//!
//! Owns the world, the hazard field, the reputation economy, the hunter's
//! learning policy and the run's random number generator. One call to
//! [`Simulation::step`] advances the encounter by one tick.
//!
//! Everything is sequential: entities act one at a time in registry order and
//! each sees the effects of those that acted before it.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::Serialize;
use tracing::{debug, info};

use crate::actions::Action;
use crate::adversary::{decide, AdaptationStats, BossAction, OpponentReading};
use crate::core::config::SimulationConfig;
use crate::core::error::Result;
use crate::core::types::{EntityId, Tick};
use crate::ecs::World;
use crate::entity::{Archetype, Entity, HunterMind, SupportState};
use crate::learning::{LearningPolicy, LearningStats, Observation, Sighting, ValueTable};
use crate::reputation::{Rank, ReputationEconomy, ReputationSummary};
use crate::simulation::behavior::{rival_action, scripted_hunter_action, support_action, wildlife_action};
use crate::simulation::events::{RunState, TickEvent};
use crate::simulation::execution::{execute, TurnContext};
use crate::simulation::hazards::HazardField;
use crate::simulation::setup::{build_world, Cast};

/// Final (or current) standing of a run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimulationResult {
    pub seed: u64,
    pub ticks: Tick,
    pub state: RunState,
    pub reputation: u32,
    pub rank: Rank,
    /// Progress toward the next rank and clan acceptance
    pub standing: ReputationSummary,
    pub trophies: Vec<String>,
    pub survived: bool,
    pub victory: bool,
    pub boss_health: i32,
    pub learning: Option<LearningStats>,
    pub adaptation: Option<AdaptationStats>,
}

/// What the hunter `id` can see right now
pub fn observe(world: &World, id: EntityId) -> Option<Observation> {
    let hunter = world.get(id)?;
    let wildlife = world
        .iter_living()
        .filter(|entity| entity.archetype() == Archetype::Wildlife)
        .map(|prey| Sighting {
            id: prey.id,
            position: prey.position,
        })
        .collect();
    let boss = world.boss().map(|boss| Sighting {
        id: boss.id,
        position: boss.position,
    });

    Some(Observation {
        position: hunter.position,
        alive: hunter.is_alive(),
        health: hunter.vitals.health,
        stamina: hunter.stamina().unwrap_or(0),
        reputation: hunter.reputation(),
        trophies: hunter.hunter().map_or(0, |state| state.trophies.len()),
        wildlife,
        boss,
    })
}

pub struct Simulation {
    config: SimulationConfig,
    world: World,
    cast: Cast,
    hazards: HazardField,
    economy: ReputationEconomy,
    /// Present when the protagonist learns
    learner: Option<LearningPolicy>,
    rng: ChaCha8Rng,
    state: RunState,
    /// Named participants removed by pruning, kept for the final report
    fallen: Vec<Entity>,
}

impl Simulation {
    /// Validate the config and build a fresh world from its seed
    pub fn new(config: SimulationConfig) -> Result<Self> {
        config.validate()?;

        let mut rng = ChaCha8Rng::seed_from_u64(config.seed);
        let (world, cast, hazards) = build_world(&config, &mut rng);
        let learner = (config.hunter.mind == HunterMind::Learning)
            .then(|| LearningPolicy::new(&config.learning, config.discretization.clone()));
        let economy = ReputationEconomy::new(config.ranks.clone());

        info!(
            seed = config.seed,
            entities = world.len(),
            learning = learner.is_some(),
            adaptive_boss = config.boss.adaptive,
            "simulation ready"
        );

        Ok(Self {
            config,
            world,
            cast,
            hazards,
            economy,
            learner,
            rng,
            state: RunState::Running,
            fallen: Vec::new(),
        })
    }

    /// Seed the hunter's policy with previously learned values
    pub fn with_value_table(mut self, table: ValueTable) -> Self {
        self.learner = self.learner.take().map(|policy| policy.with_table(table));
        self
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    pub fn hazards(&self) -> &HazardField {
        &self.hazards
    }

    pub fn hazards_mut(&mut self) -> &mut HazardField {
        &mut self.hazards
    }

    pub fn cast(&self) -> &Cast {
        &self.cast
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    pub fn current_tick(&self) -> Tick {
        self.world.current_tick
    }

    pub fn policy(&self) -> Option<&LearningPolicy> {
        self.learner.as_ref()
    }

    /// The learned table as JSON, if the hunter learns
    pub fn value_table_json(&self) -> Result<Option<String>> {
        self.learner
            .as_ref()
            .map(|policy| policy.table().to_json())
            .transpose()
    }

    fn is_alive(&self, id: EntityId) -> bool {
        self.world.get(id).is_some_and(Entity::is_alive)
    }

    /// A named participant, whether still registered or already pruned
    fn participant(&self, id: EntityId) -> Option<&Entity> {
        self.world
            .get(id)
            .or_else(|| self.fallen.iter().find(|entity| entity.id == id))
    }

    /// Run a single simulation tick
    ///
    /// 1. Advance the tick counter and snapshot the living roster
    /// 2. For each entity still alive: decide, apply, learning update (hunter), hazards
    /// 3. Scheduled support advice
    /// 4. Terminal learning update if the hunter died
    /// 5. Prune the dead
    /// 6. Weather: advance the active event, maybe start a new one
    /// 7. Exploration decay on schedule
    /// 8. Termination: defeat, then victory, then timeout
    ///
    /// A finished run ignores further calls and returns no events.
    pub fn step(&mut self) -> Vec<TickEvent> {
        let mut events = Vec::new();
        if self.state.is_terminal() {
            return events;
        }

        self.world.tick();
        let tick = self.world.current_tick;

        for id in self.world.roster() {
            // Entities killed earlier this tick never get to act
            if !self.is_alive(id) {
                continue;
            }
            self.take_turn(id, &mut events);
            self.check_hazards(id, &mut events);
        }

        if let Some(support) = self.cast.support {
            if tick % self.config.support.advice_interval == 0 && self.is_alive(support) {
                let context = TurnContext {
                    economy: &self.economy,
                    protagonist: self.cast.protagonist,
                };
                execute(
                    &mut self.world,
                    support,
                    Action::ProvideKnowledge,
                    &context,
                    &mut self.rng,
                    &mut events,
                );
            }
        }

        let protagonist = self.cast.protagonist;
        if !self.is_alive(protagonist) {
            if let (Some(policy), Some(observation)) = (self.learner.as_mut(), observe(&self.world, protagonist)) {
                if let Some(reward) = policy.update(&observation) {
                    events.push(TickEvent::ValueUpdated {
                        entity: protagonist,
                        reward,
                    });
                }
            }
        }

        for fallen in self.world.prune_dead() {
            debug!(entity = %fallen.name, "pruned");
            events.push(TickEvent::Pruned { entity: fallen.id });
            if fallen.id == protagonist || fallen.id == self.cast.boss {
                self.fallen.push(fallen);
            }
        }

        if let Some(change) = self.hazards.update_weather(self.world.entities_mut()) {
            events.push(TickEvent::Weather(change));
        }
        if self.config.hazards.weather {
            if let Some(change) = self.hazards.trigger_random_weather(&mut self.rng) {
                events.push(TickEvent::Weather(change));
            }
        }

        if let Some(epsilon) = self.learner.as_mut().and_then(|policy| policy.maybe_decay(tick)) {
            debug!(tick, epsilon, "exploration decayed");
            events.push(TickEvent::ExplorationDecayed { epsilon });
        }

        self.state = self.termination(tick);
        if self.state.is_terminal() {
            info!(tick, state = ?self.state, "simulation finished");
            events.push(TickEvent::Finished {
                tick,
                state: self.state,
            });
        }

        events
    }

    fn termination(&self, tick: Tick) -> RunState {
        if !self.is_alive(self.cast.protagonist) {
            RunState::Defeat
        } else if !self.is_alive(self.cast.boss) {
            RunState::Victory
        } else if tick >= self.config.max_ticks {
            RunState::Timeout
        } else {
            RunState::Running
        }
    }

    fn take_turn(&mut self, id: EntityId, events: &mut Vec<TickEvent>) {
        let Some(entity) = self.world.get(id) else {
            return;
        };
        let action = match entity.archetype() {
            Archetype::Learner => {
                let mind = entity.hunter().map(|hunter| hunter.mind);
                if id == self.cast.protagonist && self.learner.is_some() {
                    self.learner_turn(id, events);
                    return;
                }
                match mind {
                    Some(HunterMind::ClanRival) => {
                        rival_action(&self.world, entity, self.cast.protagonist, &mut self.rng)
                    }
                    _ => scripted_hunter_action(&self.world, entity, &mut self.rng),
                }
            }
            Archetype::Boss => self.boss_decision(id, events),
            Archetype::Wildlife => wildlife_action(&self.world, entity, &mut self.rng),
            Archetype::Support => support_action(entity, &mut self.rng),
        };

        let context = TurnContext {
            economy: &self.economy,
            protagonist: self.cast.protagonist,
        };
        execute(&mut self.world, id, action, &context, &mut self.rng, events);
    }

    /// Observe, select, act, then learn from what the action did
    fn learner_turn(&mut self, id: EntityId, events: &mut Vec<TickEvent>) {
        let Some(policy) = self.learner.as_mut() else {
            return;
        };
        let Some(observation) = observe(&self.world, id) else {
            return;
        };

        let selection = policy.select(&observation, &mut self.rng);
        events.push(TickEvent::LearnerDecision {
            entity: id,
            action: selection.action,
            mode: selection.mode,
        });

        let context = TurnContext {
            economy: &self.economy,
            protagonist: self.cast.protagonist,
        };
        execute(&mut self.world, id, selection.command, &context, &mut self.rng, events);

        if let Some(after) = observe(&self.world, id) {
            if let Some(reward) = policy.update(&after) {
                events.push(TickEvent::ValueUpdated { entity: id, reward });
            }
        }
    }

    fn boss_decision(&mut self, id: EntityId, events: &mut Vec<TickEvent>) -> Action {
        let Some(position) = self.world.get(id).map(|boss| boss.position) else {
            return Action::Idle;
        };
        let opponent = self
            .world
            .nearest(position, Archetype::Learner, |_| true)
            .map(|hunter| OpponentReading {
                id: hunter.id,
                position: hunter.position,
            });

        let Some(entity) = self.world.get_mut(id) else {
            return Action::Idle;
        };
        let health = entity.vitals.health;
        let Some(boss) = entity.boss_mut() else {
            return Action::Idle;
        };
        let decision = decide(position, health, boss, opponent, &mut self.rng);

        events.push(TickEvent::BossDecision {
            entity: id,
            state: decision.state,
        });
        events.extend(
            decision
                .unlocked
                .iter()
                .map(|&ability| TickEvent::AbilityUnlocked { entity: id, ability }),
        );
        if let Some(pattern) = decision.countered {
            events.push(TickEvent::PatternCountered { entity: id, pattern });
        }

        match decision.action {
            BossAction::Attack(target) => Action::Attack(target),
            BossAction::Move(direction) => Action::Move(direction),
            BossAction::Hold => Action::Idle,
        }
    }

    fn check_hazards(&mut self, id: EntityId, events: &mut Vec<TickEvent>) {
        let Some(entity) = self.world.get_mut(id) else {
            return;
        };
        // A carried unit rides above the ground
        if !entity.is_alive() || entity.support().is_some_and(SupportState::is_carried) {
            return;
        }
        for effect in self.hazards.check_hazards(entity) {
            events.push(TickEvent::Hazard { entity: id, effect });
        }
    }

    /// Step until the run ends and report the outcome
    pub fn run(&mut self) -> SimulationResult {
        while !self.state.is_terminal() {
            self.step();
        }
        self.result()
    }

    pub fn result(&self) -> SimulationResult {
        let hunter = self.participant(self.cast.protagonist);
        let (reputation, rank, trophies) = hunter
            .and_then(Entity::hunter)
            .map_or((0, Rank::Unblooded, Vec::new()), |state| {
                (state.reputation, state.rank, state.trophies.clone())
            });

        let boss = self.participant(self.cast.boss);
        let adaptation = boss.and_then(|entity| {
            let state = entity.boss()?;
            let memory = state.adaptive.as_ref()?;
            Some(memory.stats(state.effective_threat_radius()))
        });

        SimulationResult {
            seed: self.config.seed,
            ticks: self.world.current_tick,
            state: self.state,
            reputation,
            rank,
            standing: self.economy.summary(reputation),
            trophies,
            survived: self.is_alive(self.cast.protagonist),
            victory: self.state == RunState::Victory,
            boss_health: boss.map_or(0, |entity| entity.vitals.health),
            learning: self.learner.as_ref().map(LearningPolicy::stats),
            adaptation,
        }
    }
}
