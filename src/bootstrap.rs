//! Launch-time routing
//!
//! On launch the app either shows the support page or goes straight to the
//! game. A reachability probe decides; if it has not answered within the
//! loading limit the game wins. Driven by elapsed time so it stays testable.

use std::fmt;

use crate::consts::MAX_LOADING_SECS;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppState {
    /// Waiting for the probe
    Initial,
    Support,
    Game,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeError(pub String);

impl fmt::Display for ProbeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "reachability probe failed: {}", self.0)
    }
}

impl std::error::Error for ProbeError {}

/// Host-side network check
pub trait ReachabilityProbe {
    /// A support URL remembered from an earlier launch
    fn cached_target(&self) -> Option<&str>;
    /// `None` while the request is in flight, then whether to show support
    fn poll(&mut self) -> Option<Result<bool, ProbeError>>;
}

pub struct Bootstrap<P> {
    probe: P,
    state: AppState,
    elapsed: f32,
    timeout: f32,
}

impl<P: ReachabilityProbe> Bootstrap<P> {
    pub fn new(probe: P) -> Self {
        Self::with_timeout(probe, MAX_LOADING_SECS)
    }

    pub fn with_timeout(probe: P, timeout: f32) -> Self {
        Self {
            probe,
            state: AppState::Initial,
            elapsed: 0.0,
            timeout,
        }
    }

    pub fn state(&self) -> AppState {
        self.state
    }

    pub fn probe(&self) -> &P {
        &self.probe
    }

    /// Begin the check. A cached target resolves to support immediately.
    pub fn start(&mut self) -> AppState {
        self.elapsed = 0.0;
        self.state = AppState::Initial;
        if let Some(url) = self.probe.cached_target() {
            log::info!("Cached support target {url}, skipping probe");
            self.state = AppState::Support;
        }
        self.state
    }

    /// Poll the probe and count down the loading limit. Once resolved the
    /// state never changes again.
    pub fn update(&mut self, dt: f32) -> AppState {
        if self.state != AppState::Initial {
            return self.state;
        }

        if let Some(answer) = self.probe.poll() {
            self.state = match answer {
                Ok(true) => AppState::Support,
                Ok(false) => AppState::Game,
                Err(err) => {
                    log::warn!("{err}, falling back to game");
                    AppState::Game
                }
            };
            log::info!("Bootstrap resolved to {:?}", self.state);
            return self.state;
        }

        self.elapsed += dt.max(0.0);
        if self.elapsed >= self.timeout {
            log::warn!("No probe answer after {:.1}s, starting game", self.elapsed);
            self.state = AppState::Game;
        }
        self.state
    }
}
