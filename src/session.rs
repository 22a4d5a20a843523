//! Host-facing game session
//!
//! Wraps a `Round` together with the player's progress and settings. Frame
//! time from the host is split into fixed simulation steps; round events are
//! routed to progress (coins, outcome, achievements) and outcome overlays
//! are shown after a short exit delay through the token scheduler, so a
//! restart in between never shows a stale overlay.

use crate::catalog;
use crate::consts::{WIN_AFTER_ACCEPT_DELAY, WIN_AFTER_COLLECT_DELAY};
use crate::progress::{Progress, Purchase, RoundRecord};
use crate::settings::Settings;
use crate::sim::{
    FixedTimestep, GameEvent, Mutation, Round, RoundSnapshot, RoundState, Scheduler, TickInput,
    tick,
};
use crate::tuning::Tuning;

/// End-of-round screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Overlay {
    Victory,
    Defeat,
}

pub struct Session {
    tuning: Tuning,
    pub settings: Settings,
    progress: Progress,
    round: Round,
    base_seed: u64,
    timestep: FixedTimestep,
    scheduler: Scheduler<Overlay>,
    overlay: Option<Overlay>,
    last_record: Option<RoundRecord>,
    outbox: Vec<GameEvent>,
}

impl Session {
    /// Session on `level` (clamped to what the player has unlocked)
    pub fn new(
        tuning: Tuning,
        settings: Settings,
        progress: Progress,
        level: u32,
        seed: u64,
    ) -> Self {
        let level = level.clamp(1, progress.max_available_level.max(1));
        let config = tuning.round_config(
            level,
            &progress.selected_skin,
            &progress.selected_background,
        );
        let round = Round::new(config, seed.wrapping_add(level as u64));
        log::info!("Session created: level {}, seed {}", level, seed);
        Self {
            tuning,
            settings,
            progress,
            round,
            base_seed: seed,
            timestep: FixedTimestep::default(),
            scheduler: Scheduler::new(),
            overlay: None,
            last_record: None,
            outbox: Vec::new(),
        }
    }

    pub fn round(&self) -> &Round {
        &self.round
    }

    pub fn progress(&self) -> &Progress {
        &self.progress
    }

    pub fn level(&self) -> u32 {
        self.round.config.level
    }

    pub fn snapshot(&self) -> RoundSnapshot {
        self.round.snapshot()
    }

    /// The outcome screen, once its exit delay has passed
    pub fn overlay(&self) -> Option<Overlay> {
        self.overlay
    }

    /// What the last finished round did to progress
    pub fn last_record(&self) -> Option<&RoundRecord> {
        self.last_record.as_ref()
    }

    pub fn start(&mut self) {
        self.round.start();
        self.pump_events();
    }

    pub fn pause(&mut self) {
        self.round.pause();
        self.pump_events();
    }

    pub fn resume(&mut self) {
        self.round.resume();
        // Time spent paused must not be simulated in one burst
        self.timestep.reset();
        self.pump_events();
    }

    /// Advance by one host frame. Returns how many simulation steps ran.
    pub fn frame(&mut self, dt: f32, input: &TickInput) -> u32 {
        if let Some(y) = input.player_y {
            self.round.set_player_y(y);
        }

        let steps = self.timestep.accumulate(dt);
        let step = self.timestep.step();
        let idle = TickInput::default();
        for _ in 0..steps {
            tick(&mut self.round, &idle, step);
        }
        self.pump_events();

        for overlay in self.scheduler.advance(dt) {
            log::info!("Showing {:?} overlay", overlay);
            self.overlay = Some(overlay);
        }
        steps
    }

    pub fn perform_mutation(&mut self) -> Option<Mutation> {
        let mutation = self.round.perform_mutation();
        self.pump_events();
        mutation
    }

    pub fn accept_mutation(&mut self) -> Option<Mutation> {
        let mutation = self.round.accept_mutation();
        self.pump_events();
        mutation
    }

    pub fn reject_mutation(&mut self) -> Option<Mutation> {
        let mutation = self.round.reject_mutation();
        self.pump_events();
        mutation
    }

    /// Replay the current level against the same target. The round is left
    /// pending so the host can show the pre-round screen first.
    pub fn restart(&mut self) {
        let target = self.round.economy().target();
        self.round.reset();
        self.round.set_target(target);
        self.clear_outcome();
    }

    /// Switch to another unlocked level with a fresh target
    pub fn select_level(&mut self, level: u32) -> bool {
        if !self.progress.is_level_available(level) {
            return false;
        }
        let config = self.tuning.round_config(
            level,
            &self.progress.selected_skin,
            &self.progress.selected_background,
        );
        self.round = Round::new(config, self.base_seed.wrapping_add(level as u64));
        self.clear_outcome();
        true
    }

    /// After a win, move on to the next level if it is unlocked
    pub fn next_level(&mut self) -> bool {
        if self.round.state() != RoundState::Won {
            return false;
        }
        self.select_level(self.level() + 1)
    }

    fn clear_outcome(&mut self) {
        self.scheduler.invalidate();
        self.timestep.reset();
        self.overlay = None;
        self.last_record = None;
    }

    /// Texture the fish should wear right now: the applied mutation if any,
    /// otherwise the skin chosen in the shop
    pub fn current_skin_texture(&self) -> &'static str {
        match self.round.economy().current() {
            Some(kind) => kind.texture_name(),
            None => catalog::skin(&self.progress.selected_skin).image_name,
        }
    }

    pub fn target_skin_texture(&self) -> &'static str {
        self.round.economy().target().texture_name()
    }

    pub fn current_mutation_name(&self) -> &'static str {
        self.round
            .economy()
            .current()
            .map_or("Basic", |kind| kind.display_name())
    }

    pub fn target_mutation_name(&self) -> &'static str {
        self.round.economy().target().display_name()
    }

    /// Shop purchase; owning every skin may complete an achievement
    pub fn purchase_skin(&mut self, id: &str) -> Purchase {
        let result = self.progress.purchase_skin(id);
        if result == Purchase::Bought {
            self.progress.evaluate_achievements();
        }
        result
    }

    pub fn purchase_background(&mut self, id: &str) -> Purchase {
        self.progress.purchase_background(id)
    }

    pub fn select_skin(&mut self, id: &str) -> bool {
        self.progress.select_skin(id)
    }

    pub fn select_background(&mut self, id: &str) -> bool {
        self.progress.select_background(id)
    }

    pub fn claim_reward(&mut self, achievement_id: &str) -> Option<u64> {
        self.progress.claim_reward(achievement_id)
    }

    /// Events seen since the last drain, after the session has acted on them
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.outbox)
    }

    fn pump_events(&mut self) {
        let events = self.round.drain_events();
        let mut won_by_accept = false;
        for event in &events {
            match event {
                GameEvent::Collected { value } => self.progress.add_coins(*value as u64),
                GameEvent::MutationApplied(_) => won_by_accept = true,
                GameEvent::StateChanged { to: RoundState::Won, .. } => {
                    let delay = if won_by_accept {
                        WIN_AFTER_ACCEPT_DELAY
                    } else {
                        WIN_AFTER_COLLECT_DELAY
                    };
                    self.finish(true, Overlay::Victory, delay);
                }
                GameEvent::StateChanged { to: RoundState::Lost, .. } => {
                    self.finish(false, Overlay::Defeat, 0.0);
                }
                _ => {}
            }
        }
        self.outbox.extend(events);
    }

    fn finish(&mut self, won: bool, overlay: Overlay, delay: f32) {
        debug_assert!(self.last_record.is_none(), "round outcome recorded twice");
        let record = self
            .progress
            .record_round(self.level(), won, self.round.player.collided);
        log::info!(
            "Level {} {}: +{} coins, achievements {:?}",
            self.level(),
            if won { "won" } else { "lost" },
            record.coins_awarded,
            record.achievements
        );
        self.last_record = Some(record);
        self.scheduler.schedule(delay, overlay);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::SIM_DT;
    use crate::sim::EntityKind;
    use glam::Vec2;

    fn session() -> Session {
        Session::new(Tuning::default(), Settings::default(), Progress::new(), 1, 99)
    }

    fn park_particle(session: &mut Session) {
        let pos = session.round.player.pos;
        session
            .round
            .spawner
            .insert(EntityKind::Particle, pos, Vec2::splat(20.0), 0.0);
    }

    #[test]
    fn test_level_clamped_to_unlocked() {
        let session = Session::new(Tuning::default(), Settings::default(), Progress::new(), 3, 1);
        assert_eq!(session.level(), 1);
    }

    #[test]
    fn test_collect_awards_coins() {
        let mut session = session();
        session.start();
        park_particle(&mut session);
        session.frame(SIM_DT, &TickInput::default());
        assert_eq!(session.progress().coins, 1);
        assert_eq!(session.round().economy().available(), 1);
        assert!(
            session
                .drain_events()
                .contains(&GameEvent::Collected { value: 1 })
        );
    }

    #[test]
    fn test_defeat_overlay_after_timeout() {
        let mut session = session();
        session.start();
        session.round.time_remaining = 0.01;
        session.frame(SIM_DT, &TickInput::default());
        assert_eq!(session.round().state(), RoundState::Lost);
        assert_eq!(session.overlay(), Some(Overlay::Defeat));
        assert_eq!(session.last_record(), Some(&RoundRecord::default()));
    }

    #[test]
    fn test_victory_overlay_waits_for_exit_delay() {
        let mut session = session();
        let target = session.round().economy().target();
        session.start();

        let mut won = false;
        for _ in 0..200 {
            let cost = session.round().economy().next_cost();
            session.round.add_resources(cost);
            let drawn = session.perform_mutation().unwrap();
            if drawn.kind == target {
                session.accept_mutation();
                won = true;
                break;
            }
            session.reject_mutation();
        }
        assert!(won);
        assert_eq!(session.round().state(), RoundState::Won);
        assert_eq!(session.current_skin_texture(), target.texture_name());
        assert_eq!(session.progress().coins, 100);
        assert_eq!(session.progress().max_available_level, 2);

        session.frame(0.1, &TickInput::default());
        assert_eq!(session.overlay(), None);
        session.frame(0.15, &TickInput::default());
        assert_eq!(session.overlay(), Some(Overlay::Victory));

        assert!(session.next_level());
        assert_eq!(session.level(), 2);
        assert_eq!(session.overlay(), None);
    }

    #[test]
    fn test_restart_drops_pending_overlay_and_keeps_target() {
        let mut session = session();
        session.start();
        session.round.time_remaining = 0.01;
        // Lose without letting the scheduler run, so the overlay is still queued
        tick(&mut session.round, &TickInput::default(), SIM_DT);
        session.pump_events();
        assert_eq!(session.round().state(), RoundState::Lost);
        assert_eq!(session.scheduler.pending(), 1);

        let target = session.round().economy().target();
        session.restart();
        assert_eq!(session.round().state(), RoundState::Pending);
        assert_eq!(session.round().economy().target(), target);

        session.frame(1.0, &TickInput::default());
        assert_eq!(session.overlay(), None);
    }

    #[test]
    fn test_skin_texture_falls_back_to_shop_skin() {
        let mut progress = Progress::new();
        progress.add_coins(100);
        progress.purchase_skin("skin2");
        progress.select_skin("skin2");
        let session = Session::new(Tuning::default(), Settings::default(), progress, 1, 5);
        assert_eq!(session.current_skin_texture(), "skin2");
        assert_eq!(session.current_mutation_name(), "Basic");
        assert_eq!(session.round().config.skin_id, "skin2");
    }

    #[test]
    fn test_select_locked_level_refused() {
        let mut session = session();
        assert!(!session.select_level(2));
        assert!(!session.next_level());
        assert!(session.select_level(1));
    }
}
