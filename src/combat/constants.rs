//! Combat constants - all tunable values in one place

// Attack costs
pub const ATTACK_STAMINA_COST: i32 = 10;
pub const MIN_ATTACK_STAMINA: i32 = 10;
pub const MELEE_RANGE: i32 = 1;

// Attacker base damage by archetype
pub const LEARNER_BASE_DAMAGE: i32 = 20;
pub const REPUTATION_PER_DAMAGE_POINT: u32 = 10;
pub const REPUTATION_DAMAGE_BONUS_CAP: i32 = 15;
pub const ENCUMBERED_DAMAGE_FACTOR: f64 = 0.7;
pub const BOSS_BASE_DAMAGE: i32 = 35;
pub const DAMAGE_PER_AGGRESSION: i32 = 2;
pub const WILDLIFE_DAMAGE_PER_TIER: i32 = 5;
pub const SUPPORT_BASE_DAMAGE: i32 = 20;

// Defender resistance (multiplicative, truncated)
pub const BOSS_RESISTANCE: f64 = 0.85;

// Randomness
pub const DAMAGE_VARIANCE_MIN: f64 = 0.8;
pub const DAMAGE_VARIANCE_MAX: f64 = 1.2;
pub const CRITICAL_CHANCE: f64 = 0.15;
pub const CRITICAL_MULTIPLIER: f64 = 1.5;
pub const MIN_DAMAGE: i32 = 1;

// Clan challenges
pub const CHALLENGE_DAMAGE: i32 = 15;
pub const CHALLENGE_STAMINA_COST: i32 = 15;
pub const CHALLENGE_JITTER_MIN: f64 = 0.8;
pub const CHALLENGE_JITTER_MAX: f64 = 1.2;
