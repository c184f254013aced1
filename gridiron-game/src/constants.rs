//! Centralized balance and tuning constants for Gridiron game logic.
//!
//! These values define the deterministic math for the core simulation.
//! Keeping them together ensures that gameplay can only be adjusted via
//! code changes reviewed in version control.

// Movement -----------------------------------------------------------------
pub(crate) const BASE_SPEED_SCALE: f64 = 200.0;
pub(crate) const DEFAULT_BASE_SPEED: f64 = 160.0;
pub(crate) const SPRINT_MULTIPLIER: f64 = 1.5;
pub(crate) const JUKE_SPEED: f64 = 200.0;
pub(crate) const WAYPOINT_REACHED_RADIUS: f64 = 10.0;

// Stamina ------------------------------------------------------------------
pub(crate) const STAMINA_MAX: f64 = 100.0;
pub(crate) const STAMINA_RECOVERY_PER_TICK: f64 = 0.5;
pub(crate) const STAMINA_SPRINT_DRAIN_PER_TICK: f64 = 0.3;
pub(crate) const SPRINT_MIN_STAMINA: f64 = 20.0;
pub(crate) const JUKE_STAMINA_COST: f64 = 10.0;
pub(crate) const SPIN_STAMINA_COST: f64 = 15.0;
pub(crate) const STIFF_ARM_STAMINA_COST: f64 = 12.0;

// Outcome resolution -------------------------------------------------------
pub(crate) const DEFAULT_THROW_ACCURACY: f64 = 70.0;
pub(crate) const DEFAULT_THROW_POWER: f64 = 70.0;
pub(crate) const DEFAULT_CATCHING: f64 = 50.0;
pub(crate) const DEFAULT_TACKLING: f64 = 50.0;
pub(crate) const TACKLE_RANGE: f64 = 30.0;
pub(crate) const CATCH_RADIUS: f64 = 30.0;

// Ball ---------------------------------------------------------------------
pub(crate) const THROW_SPEED_SCALE: f64 = 200.0;
pub(crate) const APEX_DISTANCE_DIVISOR: f64 = 3.0;
pub(crate) const SPIRAL_INCREMENT: f64 = 0.3;
pub(crate) const KICK_VELOCITY_SCALE: f64 = 300.0;
pub(crate) const KICK_GRAVITY: f64 = 300.0;
pub(crate) const FUMBLE_JITTER: f64 = 100.0;
pub(crate) const LOOSE_BALL_DAMPING: f64 = 0.95;
pub(crate) const LOOSE_BALL_REST_SPEED: f64 = 5.0;
pub(crate) const CARRY_OFFSET: f64 = 10.0;

// Match clock --------------------------------------------------------------
pub(crate) const QUARTER_LENGTH_MS: u64 = 900_000;
pub(crate) const QUARTERS_PER_GAME: u8 = 4;

// Season -------------------------------------------------------------------
pub(crate) const SEASON_TOTAL_WEEKS: u32 = 17;
pub(crate) const SEASON_START_YEAR: u32 = 2024;
pub(crate) const STARTING_SALARY_POOL: u64 = 50_000_000;
pub(crate) const WIN_BONUS: u64 = 100_000;
pub(crate) const COMEBACK_DEFICIT: u32 = 14;
pub(crate) const ROSTER_MAX_PLAYERS: usize = 53;
pub(crate) const RETIREMENT_AGE_KICKER: u8 = 40;
pub(crate) const RETIREMENT_AGE_DEFAULT: u8 = 35;
pub(crate) const FACILITY_MAX_LEVEL: u8 = 4;

// Roster generation --------------------------------------------------------
pub(crate) const SKILL_MIN_GENERATED: u8 = 60;
pub(crate) const SKILL_MAX_GENERATED: u8 = 99;
pub(crate) const SALARY_BASE: f64 = 500_000.0;
pub(crate) const SALARY_SKILL_DIVISOR: f64 = 50.0;
pub(crate) const ROOKIE_MIN_AGE: u8 = 21;
pub(crate) const ROOKIE_MAX_AGE: u8 = 30;
pub(crate) const CONTRACT_MIN_YEARS: u8 = 1;
pub(crate) const CONTRACT_MAX_YEARS: u8 = 4;
pub(crate) const STARTING_MORALE: u8 = 75;

// Snapshots ----------------------------------------------------------------
pub(crate) const SAVE_FORMAT_VERSION: u32 = 1;
