//! Tabular Q-learning policy for the hunter
//!
//! Selection order each decision:
//! 1. forced engagement of the boss when the hunter is ready
//! 2. forced hunting when reputation is low and prey is close
//! 3. ε-greedy over the legal actions of the discretized state

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::actions::Action;
use crate::core::config::{DiscretizationConfig, LearningConfig};
use crate::core::types::{Direction, GridPos};
use crate::learning::exploration::ExplorationSchedule;
use crate::learning::reward::{shaped_reward, td_update};
use crate::learning::state_key::{discretize, Observation, Sighting, StateKey};
use crate::learning::value_table::ValueTable;

pub const MOVE_STAMINA: i32 = 5;
pub const HUNT_STAMINA: i32 = 10;
pub const HUNT_RADIUS: i32 = 5;
pub const SEEK_RADIUS: i32 = 10;
pub const ENGAGE_REPUTATION: u32 = 40;
pub const ENGAGE_HEALTH: i32 = 40;
pub const SEEK_REPUTATION: u32 = 50;

pub const FORCED_ENGAGE_REPUTATION: u32 = 50;
pub const FORCED_ENGAGE_HEALTH: i32 = 50;
pub const FORCED_ENGAGE_STAMINA: i32 = 40;
pub const FORCED_ENGAGE_CHANCE: f64 = 0.8;
pub const FORCED_HUNT_REPUTATION: u32 = 40;
pub const FORCED_HUNT_STAMINA: i32 = 20;
pub const FORCED_HUNT_CHANCE: f64 = 0.7;

/// Abstract actions the value table scores
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LearnerAction {
    Rest,
    MoveNorth,
    MoveSouth,
    MoveEast,
    MoveWest,
    HuntWildlife,
    EngageBoss,
    SeekPrey,
}

impl LearnerAction {
    pub fn direction(&self) -> Option<Direction> {
        match self {
            LearnerAction::MoveNorth => Some(Direction::North),
            LearnerAction::MoveSouth => Some(Direction::South),
            LearnerAction::MoveEast => Some(Direction::East),
            LearnerAction::MoveWest => Some(Direction::West),
            _ => None,
        }
    }
}

/// How an action was chosen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SelectionMode {
    ForcedEngage,
    ForcedHunt,
    Explore,
    Exploit,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Selection {
    pub state: StateKey,
    pub action: LearnerAction,
    pub mode: SelectionMode,
    /// What the hunter actually does this turn
    pub command: Action,
}

/// The (state, action, reputation) recorded at selection time
#[derive(Debug, Clone, PartialEq)]
pub struct Experience {
    pub state: StateKey,
    pub action: LearnerAction,
    pub reputation: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LearningStats {
    pub total_rewards: f64,
    pub actions_taken: u64,
    pub avg_reward: f64,
    pub exploration_count: u64,
    pub exploitation_count: u64,
    pub forced_count: u64,
    pub exploration_rate: f64,
    pub q_table_size: usize,
    pub total_state_actions: usize,
    pub current_epsilon: f64,
}

/// Actions legal in the situation the observation describes
pub fn legal_actions(observation: &Observation) -> Vec<LearnerAction> {
    let mut actions = vec![LearnerAction::Rest];
    if observation.stamina >= MOVE_STAMINA {
        actions.extend([
            LearnerAction::MoveNorth,
            LearnerAction::MoveSouth,
            LearnerAction::MoveEast,
            LearnerAction::MoveWest,
        ]);
    }
    if observation.stamina >= HUNT_STAMINA && observation.wildlife_within(HUNT_RADIUS).next().is_some() {
        actions.push(LearnerAction::HuntWildlife);
    }
    if observation.boss.is_some()
        && observation.reputation >= ENGAGE_REPUTATION
        && observation.health > ENGAGE_HEALTH
    {
        actions.push(LearnerAction::EngageBoss);
    }
    if observation.reputation < SEEK_REPUTATION {
        actions.push(LearnerAction::SeekPrey);
    }
    actions
}

/// Attack when adjacent, otherwise a cardinal step toward the target
fn close_in(from: GridPos, target: &Sighting) -> Action {
    if from.manhattan(&target.position) <= 1 {
        Action::Attack(target.id)
    } else {
        Action::Move(from.cardinal_toward(&target.position))
    }
}

fn random_step<R: Rng>(rng: &mut R) -> Action {
    Direction::CARDINALS
        .choose(rng)
        .map_or(Action::Rest, |&direction| Action::Move(direction))
}

/// Concrete command for an abstract action; missing targets degrade to rest
pub fn translate<R: Rng>(action: LearnerAction, observation: &Observation, rng: &mut R) -> Action {
    let here = observation.position;
    match action {
        LearnerAction::Rest => Action::Rest,
        LearnerAction::MoveNorth
        | LearnerAction::MoveSouth
        | LearnerAction::MoveEast
        | LearnerAction::MoveWest => action.direction().map_or(Action::Rest, Action::Move),
        LearnerAction::HuntWildlife => observation
            .closest_wildlife(HUNT_RADIUS)
            .map_or(Action::Rest, |target| close_in(here, &target)),
        LearnerAction::EngageBoss => observation
            .boss
            .map_or(Action::Rest, |boss| close_in(here, &boss)),
        LearnerAction::SeekPrey => match observation.closest_wildlife(SEEK_RADIUS) {
            Some(prey) => Action::Move(here.cardinal_toward(&prey.position)),
            None => random_step(rng),
        },
    }
}

#[derive(Debug, Clone)]
pub struct LearningPolicy {
    table: ValueTable,
    schedule: ExplorationSchedule,
    learning_rate: f64,
    discount_factor: f64,
    discretization: DiscretizationConfig,
    last: Option<Experience>,
    total_rewards: f64,
    actions_taken: u64,
    exploration_count: u64,
    exploitation_count: u64,
    forced_count: u64,
}

impl LearningPolicy {
    pub fn new(config: &LearningConfig, discretization: DiscretizationConfig) -> Self {
        Self {
            table: ValueTable::new(),
            schedule: ExplorationSchedule::from_config(config),
            learning_rate: config.learning_rate,
            discount_factor: config.discount_factor,
            discretization,
            last: None,
            total_rewards: 0.0,
            actions_taken: 0,
            exploration_count: 0,
            exploitation_count: 0,
            forced_count: 0,
        }
    }

    /// Start from previously learned values
    pub fn with_table(mut self, table: ValueTable) -> Self {
        self.table = table;
        self
    }

    pub fn table(&self) -> &ValueTable {
        &self.table
    }

    pub fn into_table(self) -> ValueTable {
        self.table
    }

    pub fn epsilon(&self) -> f64 {
        self.schedule.epsilon()
    }

    pub fn schedule(&self) -> &ExplorationSchedule {
        &self.schedule
    }

    pub fn last_experience(&self) -> Option<&Experience> {
        self.last.as_ref()
    }

    pub fn state_key(&self, observation: &Observation) -> StateKey {
        discretize(observation, &self.discretization)
    }

    /// Decay ε if `tick` is on the schedule; returns the new ε when it decayed
    pub fn maybe_decay(&mut self, tick: u64) -> Option<f64> {
        self.schedule
            .is_decay_tick(tick)
            .then(|| self.schedule.decay())
    }

    /// Choose this turn's action and remember it for the next update
    pub fn select<R: Rng>(&mut self, observation: &Observation, rng: &mut R) -> Selection {
        let state = self.state_key(observation);
        let legal = legal_actions(observation);
        self.table.ensure_row(&state, &legal);

        let (action, mode, command) = match self.forced(observation, rng) {
            Some(forced) => forced,
            None => {
                let (action, mode) = self.epsilon_greedy(&state, &legal, rng);
                (action, mode, translate(action, observation, rng))
            }
        };

        match mode {
            SelectionMode::ForcedEngage | SelectionMode::ForcedHunt => self.forced_count += 1,
            SelectionMode::Explore => self.exploration_count += 1,
            SelectionMode::Exploit => self.exploitation_count += 1,
        }
        self.actions_taken += 1;
        self.last = Some(Experience {
            state: state.clone(),
            action,
            reputation: observation.reputation,
        });

        Selection {
            state,
            action,
            mode,
            command,
        }
    }

    fn forced<R: Rng>(
        &self,
        observation: &Observation,
        rng: &mut R,
    ) -> Option<(LearnerAction, SelectionMode, Action)> {
        let here = observation.position;

        if observation.reputation >= FORCED_ENGAGE_REPUTATION
            && observation.health > FORCED_ENGAGE_HEALTH
            && observation.stamina > FORCED_ENGAGE_STAMINA
        {
            if let Some(boss) = observation.boss {
                if rng.gen_bool(FORCED_ENGAGE_CHANCE) {
                    return Some((
                        LearnerAction::EngageBoss,
                        SelectionMode::ForcedEngage,
                        close_in(here, &boss),
                    ));
                }
            }
        }

        if observation.reputation < FORCED_HUNT_REPUTATION
            && observation.stamina > FORCED_HUNT_STAMINA
        {
            if let Some(target) = observation.closest_wildlife(HUNT_RADIUS) {
                if rng.gen_bool(FORCED_HUNT_CHANCE) {
                    return Some((
                        LearnerAction::HuntWildlife,
                        SelectionMode::ForcedHunt,
                        close_in(here, &target),
                    ));
                }
            }
        }

        None
    }

    fn epsilon_greedy<R: Rng>(
        &self,
        state: &StateKey,
        legal: &[LearnerAction],
        rng: &mut R,
    ) -> (LearnerAction, SelectionMode) {
        if rng.gen::<f64>() < self.schedule.epsilon() {
            let action = legal.choose(rng).copied().unwrap_or(LearnerAction::Rest);
            return (action, SelectionMode::Explore);
        }
        let best = self.table.best_actions(state);
        let action = best.choose(rng).copied().unwrap_or(LearnerAction::Rest);
        (action, SelectionMode::Exploit)
    }

    /// Temporal-difference update for the last selection.
    ///
    /// Returns the reward used, or `None` before the first selection.
    pub fn update(&mut self, observation: &Observation) -> Option<f64> {
        let last = self.last.as_ref()?;
        let reward = shaped_reward(observation, last.reputation, last.action);

        let next_state = discretize(observation, &self.discretization);
        self.table.ensure_row(&next_state, &legal_actions(observation));
        let max_future = self.table.max_value(&next_state);

        let old = self.table.value(&last.state, last.action);
        let new = td_update(old, reward, max_future, self.learning_rate, self.discount_factor);
        let (state, action) = (last.state.clone(), last.action);
        self.table.set(&state, action, new);
        self.total_rewards += reward;

        trace!(%state, ?action, reward, old, new, "value update");
        Some(reward)
    }

    pub fn stats(&self) -> LearningStats {
        let actions = self.actions_taken.max(1) as f64;
        LearningStats {
            total_rewards: self.total_rewards,
            actions_taken: self.actions_taken,
            avg_reward: self.total_rewards / actions,
            exploration_count: self.exploration_count,
            exploitation_count: self.exploitation_count,
            forced_count: self.forced_count,
            exploration_rate: self.exploration_count as f64 / actions,
            q_table_size: self.table.len(),
            total_state_actions: self.table.entry_count(),
            current_epsilon: self.schedule.epsilon(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::EntityId;
    use crate::learning::state_key::tests::{observation, sighting};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn policy_with_epsilon(epsilon: f64) -> LearningPolicy {
        let config = LearningConfig {
            epsilon,
            ..LearningConfig::default()
        };
        LearningPolicy::new(&config, DiscretizationConfig::default())
    }

    #[test]
    fn test_legal_actions_follow_resources() {
        let exhausted = observation(30, 4, 45);
        assert_eq!(legal_actions(&exhausted), vec![LearnerAction::Rest, LearnerAction::SeekPrey]);

        let mut ready = observation(80, 80, 60);
        ready.boss = Some(sighting(9, 20, 20));
        ready.wildlife = vec![sighting(2, 12, 10)];
        let legal = legal_actions(&ready);
        assert!(legal.contains(&LearnerAction::HuntWildlife));
        assert!(legal.contains(&LearnerAction::EngageBoss));
        assert!(!legal.contains(&LearnerAction::SeekPrey));
    }

    #[test]
    fn test_first_visit_seeds_every_legal_action() {
        let mut policy = policy_with_epsilon(0.0);
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let obs = observation(100, 100, 45);
        let selection = policy.select(&obs, &mut rng);
        let row = policy.table().row(&selection.state).unwrap();
        for action in legal_actions(&obs) {
            assert_eq!(row.get(&action), Some(&0.0));
        }
    }

    #[test]
    fn test_forced_engagement_when_ready() {
        let mut policy = policy_with_epsilon(0.0);
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let mut obs = observation(90, 90, 60);
        obs.boss = Some(sighting(9, 11, 10));

        let mut forced = 0;
        for _ in 0..200 {
            let selection = policy.select(&obs, &mut rng);
            if selection.mode == SelectionMode::ForcedEngage {
                forced += 1;
                assert_eq!(selection.action, LearnerAction::EngageBoss);
                assert_eq!(selection.command, Action::Attack(EntityId(9)));
            }
        }
        // p = 0.8 over 200 draws
        assert!((130..=190).contains(&forced), "forced {forced}");
    }

    #[test]
    fn test_forced_hunt_targets_the_closest_prey() {
        let mut policy = policy_with_epsilon(0.0);
        let mut rng = ChaCha8Rng::seed_from_u64(4);
        let mut obs = observation(90, 90, 0);
        obs.wildlife = vec![sighting(6, 14, 10), sighting(5, 11, 10)];

        for _ in 0..50 {
            let selection = policy.select(&obs, &mut rng);
            if selection.mode == SelectionMode::ForcedHunt {
                assert_eq!(selection.command, Action::Attack(EntityId(5)));
                return;
            }
        }
        panic!("forced hunt never triggered");
    }

    #[test]
    fn test_forced_hunt_ties_go_to_earliest_sighting() {
        let mut policy = policy_with_epsilon(0.0);
        let mut rng = ChaCha8Rng::seed_from_u64(8);
        let mut obs = observation(90, 90, 0);
        obs.wildlife = vec![sighting(7, 10, 13), sighting(3, 13, 10)];

        for _ in 0..50 {
            let selection = policy.select(&obs, &mut rng);
            if selection.mode == SelectionMode::ForcedHunt {
                assert_eq!(selection.command, Action::Move(Direction::South));
                return;
            }
        }
        panic!("forced hunt never triggered");
    }

    #[test]
    fn test_exploit_picks_best_value() {
        let mut policy = policy_with_epsilon(0.0);
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let obs = observation(100, 100, 45);
        let state = policy.state_key(&obs);
        policy.table.ensure_row(&state, &legal_actions(&obs));
        policy.table.set(&state, LearnerAction::MoveWest, 4.0);

        let selection = policy.select(&obs, &mut rng);
        assert_eq!(selection.mode, SelectionMode::Exploit);
        assert_eq!(selection.action, LearnerAction::MoveWest);
        assert_eq!(selection.command, Action::Move(Direction::West));
    }

    #[test]
    fn test_update_applies_td_rule() {
        let config = LearningConfig {
            epsilon: 0.0,
            learning_rate: 0.1,
            discount_factor: 0.9,
            ..LearningConfig::default()
        };
        let mut policy = LearningPolicy::new(&config, DiscretizationConfig::default());
        let mut rng = ChaCha8Rng::seed_from_u64(6);
        assert_eq!(policy.update(&observation(50, 50, 0)), None);

        let before = observation(50, 50, 45);
        let selection = policy.select(&before, &mut rng);

        // Same bucket afterwards with one extra reputation point: reward 10 + 1
        let after = observation(50, 50, 46);
        let reward = policy.update(&after).unwrap();
        assert_eq!(reward, 11.0);
        let value = policy.table().value(&selection.state, selection.action);
        assert!((value - 1.1).abs() < 1e-9);
    }

    #[test]
    fn test_terminal_update_uses_death_penalty() {
        let mut policy = policy_with_epsilon(0.0);
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let before = observation(30, 50, 10);
        policy.select(&before, &mut rng);

        let mut dead = observation(0, 50, 10);
        dead.alive = false;
        let reward = policy.update(&dead).unwrap();
        assert_eq!(reward, -210.0);
    }

    #[test]
    fn test_seek_prey_without_prey_steps_randomly() {
        let mut rng = ChaCha8Rng::seed_from_u64(8);
        let obs = observation(100, 100, 0);
        assert!(matches!(
            translate(LearnerAction::SeekPrey, &obs, &mut rng),
            Action::Move(direction) if !direction.is_diagonal()
        ));
        assert_eq!(translate(LearnerAction::EngageBoss, &obs, &mut rng), Action::Rest);
    }

    #[test]
    fn test_stats_track_selection_modes() {
        let mut policy = policy_with_epsilon(1.0);
        let mut rng = ChaCha8Rng::seed_from_u64(9);
        let obs = observation(100, 100, 45);
        for _ in 0..10 {
            policy.select(&obs, &mut rng);
        }
        let stats = policy.stats();
        assert_eq!(stats.actions_taken, 10);
        assert_eq!(stats.exploration_count, 10);
        assert_eq!(stats.exploration_rate, 1.0);
        assert_eq!(stats.q_table_size, 1);
    }
}
