//! Round state and core simulation types
//!
//! `Round` owns everything a single round touches. All mutation happens
//! either through its methods (host commands) or through `tick`.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::collision::Aabb;
use super::mutation::{Mutation, MutationEconomy, MutationType};
use super::scroller::Scroller;
use super::spawner::Spawner;
use crate::clamp_to_band;
use crate::tuning::RoundConfig;

/// Lifecycle of a round. `Won` and `Lost` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoundState {
    /// Constructed or reset, waiting for `start`
    Pending,
    /// Active gameplay
    Running,
    /// Paused by the player or by an open mutation choice
    Paused,
    Won,
    Lost,
}

impl RoundState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, RoundState::Won | RoundState::Lost)
    }
}

/// Scrolling entity kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntityKind {
    /// Hitting one costs the grace window, or the round
    Obstacle,
    /// Collectible resource (DNA / coin)
    Particle,
}

/// An obstacle or particle. `pos` is the center.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    pub id: u32,
    pub kind: EntityKind,
    pub pos: Vec2,
    pub size: Vec2,
    /// Leftward speed in points per second
    pub speed: f32,
}

impl Entity {
    pub fn bounds(&self) -> Aabb {
        Aabb::from_center(self.pos, self.size)
    }

    /// Past the left edge: strictly less than `-width`
    pub fn is_off_screen(&self) -> bool {
        self.pos.x < -self.size.x
    }
}

/// The player's fish
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub pos: Vec2,
    pub size: Vec2,
    pub hitbox_scale: f32,
    /// Remaining invulnerability (seconds); zero when vulnerable
    pub invulnerable_for: f32,
    /// Set by the first obstacle hit; the next unprotected hit loses
    pub collided: bool,
}

impl Player {
    pub fn new(config: &RoundConfig) -> Self {
        let tuning = &config.player;
        Self {
            pos: Vec2::new(
                config.screen.x * tuning.x_fraction,
                config.screen.y * tuning.y_fraction,
            ),
            size: tuning.size,
            hitbox_scale: tuning.hitbox_scale,
            invulnerable_for: 0.0,
            collided: false,
        }
    }

    /// Move vertically, clamped so the sprite stays on screen.
    /// Non-finite input is ignored.
    pub fn set_y(&mut self, y: f32, screen_height: f32) {
        if !y.is_finite() {
            return;
        }
        let half = self.size.y / 2.0;
        self.pos.y = clamp_to_band(y, half, screen_height - half);
    }

    pub fn hitbox(&self) -> Aabb {
        Aabb::from_center(self.pos, self.size * self.hitbox_scale)
    }

    pub fn is_invulnerable(&self) -> bool {
        self.invulnerable_for > 0.0
    }
}

/// Discrete things that happened, drained by the host each frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    StateChanged { from: RoundState, to: RoundState },
    /// A particle was picked up
    Collected { value: u32 },
    /// An obstacle hit that counted; `first` starts the grace window
    Collided { first: bool },
    InvulnerabilityEnded,
    /// Paid-for draw waiting for accept/reject
    MutationDrawn(Mutation),
    MutationApplied(Mutation),
    MutationDiscarded(Mutation),
}

/// One round of play
#[derive(Debug, Clone)]
pub struct Round {
    pub config: RoundConfig,
    seed: u64,
    pub(super) rng: Pcg32,
    pub(super) state: RoundState,
    /// Seconds spent running since `start`
    pub time: f32,
    /// Countdown to the time-out loss
    pub time_remaining: f32,
    pub scroller: Scroller,
    pub spawner: Spawner,
    pub player: Player,
    pub(super) economy: MutationEconomy,
    /// Total resource value collected this round
    pub score: u64,
    pub collected_count: u32,
    pending_mutation: Option<Mutation>,
    modal_open: bool,
    resume_after_modal: bool,
    pub(super) events: Vec<GameEvent>,
}

impl Round {
    /// New round in `Pending`; the seed drives target choice and spawns
    pub fn new(config: RoundConfig, seed: u64) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let economy = MutationEconomy::with_random_target(&mut rng);
        Self {
            seed,
            rng,
            state: RoundState::Pending,
            time: 0.0,
            time_remaining: config.duration,
            scroller: Scroller::new(config.background_width),
            spawner: Spawner::new(),
            player: Player::new(&config),
            economy,
            score: 0,
            collected_count: 0,
            pending_mutation: None,
            modal_open: false,
            resume_after_modal: false,
            events: Vec::new(),
            config,
        }
    }

    pub fn state(&self) -> RoundState {
        self.state
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn economy(&self) -> &MutationEconomy {
        &self.economy
    }

    /// The drawn-but-undecided mutation, for the preview UI
    pub fn pending_mutation(&self) -> Option<&Mutation> {
        self.pending_mutation.as_ref()
    }

    /// True while a mutation choice is open (pause/resume are locked)
    pub fn is_modal_open(&self) -> bool {
        self.modal_open
    }

    pub fn is_terminal(&self) -> bool {
        self.state.is_terminal()
    }

    /// Pending -> Running. No-op from any other state.
    pub fn start(&mut self) {
        if self.state == RoundState::Pending {
            self.transition(RoundState::Running);
        }
    }

    /// Running -> Paused, unless a mutation choice is open
    pub fn pause(&mut self) {
        if self.state == RoundState::Running && !self.modal_open {
            self.transition(RoundState::Paused);
        }
    }

    /// Paused -> Running, unless a mutation choice is open
    pub fn resume(&mut self) {
        if self.state == RoundState::Paused && !self.modal_open {
            self.transition(RoundState::Running);
        }
    }

    /// Vertical drag input; the core clamps it to the screen
    pub fn set_player_y(&mut self, y: f32) {
        if self.is_terminal() {
            return;
        }
        self.player.set_y(y, self.config.screen.y);
    }

    /// Credit resources outside of particle pickups. Wins immediately if the
    /// economy is already matched.
    pub fn add_resources(&mut self, amount: u64) {
        if self.is_terminal() {
            return;
        }
        if self.economy.add_resources(amount) {
            self.transition(RoundState::Won);
        }
    }

    /// Fix the target before the round starts (no-op once started)
    pub fn set_target(&mut self, target: MutationType) {
        if self.state == RoundState::Pending {
            self.economy.set_target(target);
        }
    }

    /// Pay for a draw and open the accept/reject choice. A running round is
    /// paused until the choice is made. `None` if unaffordable, not in play,
    /// or a choice is already open.
    pub fn perform_mutation(&mut self) -> Option<Mutation> {
        if !matches!(self.state, RoundState::Running | RoundState::Paused) || self.modal_open {
            return None;
        }
        let mutation = self.economy.perform_mutation(&mut self.rng)?;
        log::info!(
            "Mutation #{} drawn: {:?} (cost {}, {} left)",
            mutation.serial,
            mutation.kind,
            mutation.cost,
            self.economy.available()
        );

        self.pending_mutation = Some(mutation);
        self.modal_open = true;
        self.resume_after_modal = self.state == RoundState::Running;
        if self.state == RoundState::Running {
            self.transition(RoundState::Paused);
        }
        self.events.push(GameEvent::MutationDrawn(mutation));
        Some(mutation)
    }

    /// Apply the pending draw. A match wins the round on the spot.
    pub fn accept_mutation(&mut self) -> Option<Mutation> {
        let mutation = self.pending_mutation.take()?;
        self.economy.apply_mutation(&mutation);
        self.events.push(GameEvent::MutationApplied(mutation));
        self.close_modal();
        Some(mutation)
    }

    /// Throw the pending draw away; its cost is not refunded
    pub fn reject_mutation(&mut self) -> Option<Mutation> {
        let mutation = self.pending_mutation.take()?;
        self.events.push(GameEvent::MutationDiscarded(mutation));
        self.close_modal();
        Some(mutation)
    }

    fn close_modal(&mut self) {
        self.modal_open = false;
        if self.economy.has_won() {
            self.transition(RoundState::Won);
        } else if std::mem::take(&mut self.resume_after_modal) {
            self.resume();
        }
    }

    /// Back to a ready-to-run `Pending` round with the same config and seed.
    /// The RNG is reseeded, so resetting twice equals resetting once.
    pub fn reset(&mut self) {
        self.rng = Pcg32::seed_from_u64(self.seed);
        self.economy = MutationEconomy::with_random_target(&mut self.rng);
        self.state = RoundState::Pending;
        self.time = 0.0;
        self.time_remaining = self.config.duration;
        self.scroller.reset();
        self.spawner.reset();
        self.player = Player::new(&self.config);
        self.score = 0;
        self.collected_count = 0;
        self.pending_mutation = None;
        self.modal_open = false;
        self.resume_after_modal = false;
        self.events.clear();
        log::info!("Round reset (level {}, seed {})", self.config.level, self.seed);
    }

    /// Reset with a different seed (new target, new spawn pattern)
    pub fn reseed(&mut self, seed: u64) {
        self.seed = seed;
        self.reset();
    }

    /// Take all events queued since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub(super) fn transition(&mut self, to: RoundState) {
        let from = self.state;
        if from == to || from.is_terminal() {
            return;
        }
        log::info!("Round {:?} -> {:?} at t={:.2}", from, to, self.time);
        self.state = to;
        self.events.push(GameEvent::StateChanged { from, to });
    }

    /// Serializable view for the UI layer
    pub fn snapshot(&self) -> RoundSnapshot {
        RoundSnapshot {
            level: self.config.level,
            state: self.state,
            time: self.time,
            time_remaining: self.time_remaining,
            score: self.score,
            available_resources: self.economy.available(),
            next_cost: self.economy.next_cost(),
            can_afford: self.economy.can_afford(),
            mutation_count: self.economy.mutation_count(),
            total_spent: self.economy.total_spent(),
            current: self.economy.current(),
            target: self.economy.target(),
            pending: self.pending_mutation,
            invulnerable: self.player.is_invulnerable(),
            collided: self.player.collided,
            player: self.player.pos,
            entities: self.spawner.entities.clone(),
            background: (self.scroller.a, self.scroller.b),
            skin_id: self.config.skin_id.clone(),
            background_id: self.config.background_id.clone(),
        }
    }
}

/// Everything the UI shows about a round
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoundSnapshot {
    pub level: u32,
    pub state: RoundState,
    pub time: f32,
    pub time_remaining: f32,
    pub score: u64,
    pub available_resources: u64,
    pub next_cost: u64,
    pub can_afford: bool,
    pub mutation_count: u32,
    pub total_spent: u64,
    pub current: Option<MutationType>,
    pub target: MutationType,
    pub pending: Option<Mutation>,
    pub invulnerable: bool,
    pub collided: bool,
    pub player: Vec2,
    pub entities: Vec<Entity>,
    /// Left edges of the two background segments
    pub background: (f32, f32),
    pub skin_id: String,
    pub background_id: String,
}
