//! Per-frame simulation tick
//!
//! Core game loop that advances a round. Order within a tick:
//! input, grace window, background, spawner (move/spawn/retire), collisions,
//! win check, countdown. Everything a tick causes is visible before it returns.

use super::collision::detect_contacts;
use super::state::{EntityKind, GameEvent, Round, RoundState};

/// Input commands for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Target vertical position from a drag (clamped by the round)
    pub player_y: Option<f32>,
}

/// Advance the round by `dt` seconds. No-op unless running.
pub fn tick(round: &mut Round, input: &TickInput, dt: f32) {
    if round.state != RoundState::Running {
        return;
    }
    let dt = dt.max(0.0);

    if let Some(y) = input.player_y {
        round.set_player_y(y);
    }

    round.time += dt;

    if round.player.invulnerable_for > 0.0 {
        round.player.invulnerable_for -= dt;
        if round.player.invulnerable_for <= 0.0 {
            round.player.invulnerable_for = 0.0;
            round.events.push(GameEvent::InvulnerabilityEnded);
            log::debug!("Invulnerability ended at t={:.2}", round.time);
        }
    }

    round
        .scroller
        .advance(dt, round.config.background_speed);

    round
        .spawner
        .tick(round.time, dt, &round.config, &mut round.rng);

    let contacts = detect_contacts(&round.player.hitbox(), &round.spawner.entities);
    for contact in contacts {
        match contact.kind {
            EntityKind::Obstacle => handle_obstacle_hit(round),
            EntityKind::Particle => {
                if round.spawner.remove(contact.entity_id).is_some() {
                    handle_collect(round);
                }
            }
        }
        if round.state.is_terminal() {
            return;
        }
    }

    // A win this tick beats a simultaneous time-out
    if round.economy.has_won() {
        round.transition(RoundState::Won);
        return;
    }

    round.time_remaining -= dt;
    if round.time_remaining <= 0.0 {
        round.time_remaining = 0.0;
        round.transition(RoundState::Lost);
    }
}

/// First unprotected hit starts the grace window; the next one loses
fn handle_obstacle_hit(round: &mut Round) {
    let player = &mut round.player;
    if player.is_invulnerable() {
        return;
    }
    if player.collided {
        round.events.push(GameEvent::Collided { first: false });
        round.transition(RoundState::Lost);
    } else {
        player.collided = true;
        player.invulnerable_for = round.config.player.invulnerability_secs;
        round.events.push(GameEvent::Collided { first: true });
        log::info!("First collision at t={:.2}, invulnerable", round.time);
    }
}

fn handle_collect(round: &mut Round) {
    let value = round.config.particle.value;
    round.score += value as u64;
    round.collected_count += 1;
    round.events.push(GameEvent::Collected { value });
    round.add_resources(value as u64);
}
