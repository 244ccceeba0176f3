//! Frame driver and session ownership
//!
//! A `Session` owns the arena plus the last-writer-wins input cells
//! (pointer position, paused flag). Each tick runs physics when active and
//! always repaints. `FixedStep` turns wall-clock frame time into a whole
//! number of 60 Hz ticks, and `CancelToken` stops the loop for good.

use std::cell::Cell;
use std::rc::Rc;

use glam::Vec2;

use crate::config::ArenaConfig;
use crate::consts::{MAX_SUBSTEPS, SIM_DT};
use crate::renderer::{Canvas, paint};
use crate::sim::{Arena, BodyColor, BodyId, TickInput, tick};

/// Shared flag that halts a running session
///
/// Everything runs on one thread, so a `Cell` is enough.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Rc<Cell<bool>>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.set(true);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.get()
    }
}

/// Fixed timestep accumulator
///
/// Frames that arrive late run at most `max_substeps` ticks (one with the
/// default clock). Whatever time is left over beyond that is dropped, so a
/// stall costs simulated time instead of producing a burst of ticks.
#[derive(Debug, Clone)]
pub struct FixedStep {
    dt: f32,
    max_substeps: u32,
    accumulator: f32,
}

impl Default for FixedStep {
    fn default() -> Self {
        Self::new(SIM_DT, MAX_SUBSTEPS)
    }
}

impl FixedStep {
    pub fn new(dt: f32, max_substeps: u32) -> Self {
        Self {
            dt,
            max_substeps,
            accumulator: 0.0,
        }
    }

    /// Add `elapsed` seconds and return how many ticks are now due
    pub fn advance(&mut self, elapsed: f32) -> u32 {
        // Tab switches can report huge gaps
        self.accumulator += elapsed.clamp(0.0, 0.1);

        let mut ticks = 0;
        while self.accumulator >= self.dt && ticks < self.max_substeps {
            self.accumulator -= self.dt;
            ticks += 1;
        }
        if ticks == self.max_substeps && self.accumulator >= self.dt {
            log::trace!("Dropping {:.3}s of frame backlog", self.accumulator);
            self.accumulator %= self.dt;
        }
        ticks
    }

    pub fn reset(&mut self) {
        self.accumulator = 0.0;
    }
}

/// Notifications for the UI layer
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    /// A click landed on a body
    BodySelected { id: BodyId },
    /// A body's color was changed
    BodyRecolored { id: BodyId, color: BodyColor },
    /// Physics frozen (rendering continues)
    Paused,
    /// Physics running again
    Resumed,
}

/// One running simulation
#[derive(Debug)]
pub struct Session {
    arena: Arena,
    input: TickInput,
    clock: FixedStep,
    selected: Option<BodyId>,
    events: Vec<SessionEvent>,
    token: CancelToken,
}

impl Session {
    pub fn new(seed: u64) -> Self {
        Self::with_config(ArenaConfig::default(), seed)
    }

    pub fn with_config(config: ArenaConfig, seed: u64) -> Self {
        let arena = Arena::with_config(config, seed);
        log::info!(
            "Session started with {} bodies (seed {})",
            arena.bodies().len(),
            seed
        );
        Self::from_arena(arena)
    }

    /// Wrap an existing arena (starts active)
    pub fn from_arena(arena: Arena) -> Self {
        Self {
            arena,
            input: TickInput::default(),
            clock: FixedStep::default(),
            selected: None,
            events: Vec::new(),
            token: CancelToken::new(),
        }
    }

    pub fn arena(&self) -> &Arena {
        &self.arena
    }

    pub fn is_active(&self) -> bool {
        !self.input.paused
    }

    pub fn set_active(&mut self, active: bool) {
        if active == self.is_active() {
            return;
        }
        self.input.paused = !active;
        if active {
            log::info!("Simulation resumed");
            self.events.push(SessionEvent::Resumed);
        } else {
            log::info!("Simulation paused at tick {}", self.arena.time_ticks);
            self.events.push(SessionEvent::Paused);
        }
    }

    /// Flip the active flag and return the new state
    pub fn toggle_active(&mut self) -> bool {
        let active = !self.is_active();
        self.set_active(active);
        active
    }

    /// Record the latest pointer position (arena coordinates)
    pub fn set_pointer(&mut self, pos: Vec2) {
        self.input.pointer = Some(pos);
    }

    pub fn pointer(&self) -> Option<Vec2> {
        self.input.pointer
    }

    /// Hit-test a click and remember the selected body
    pub fn click(&mut self, point: Vec2) -> Option<BodyId> {
        let id = self.arena.hit_test(point).map(|b| b.id())?;
        log::debug!("Selected body {} at ({:.1}, {:.1})", id, point.x, point.y);
        self.selected = Some(id);
        self.events.push(SessionEvent::BodySelected { id });
        Some(id)
    }

    pub fn selected(&self) -> Option<BodyId> {
        self.selected
    }

    /// Recolor a body by id. Returns false if it doesn't exist.
    pub fn recolor(&mut self, id: BodyId, color: BodyColor) -> bool {
        if !self.arena.set_color(id, color.clone()) {
            log::warn!("Recolor of unknown body {}", id);
            return false;
        }
        log::debug!("Body {} recolored to {}", id, color);
        self.events.push(SessionEvent::BodyRecolored { id, color });
        true
    }

    /// Recolor the selected body and clear the selection
    pub fn recolor_selected(&mut self, color: BodyColor) -> Option<BodyId> {
        let id = self.selected.take()?;
        self.recolor(id, color).then_some(id)
    }

    /// Take all events raised since the last call
    pub fn drain_events(&mut self) -> Vec<SessionEvent> {
        std::mem::take(&mut self.events)
    }

    /// Run one tick: physics when active, then repaint.
    /// Returns whether physics ran.
    pub fn step<C: Canvas + ?Sized>(&mut self, canvas: &mut C) -> bool {
        let moved = tick(&mut self.arena, &self.input);
        paint(&self.arena, canvas);
        moved
    }

    /// Run however many ticks `elapsed` seconds of wall time call for.
    /// Returns the number of ticks run (zero once cancelled).
    pub fn advance<C: Canvas + ?Sized>(&mut self, elapsed: f32, canvas: &mut C) -> u32 {
        if self.token.is_cancelled() {
            return 0;
        }
        let due = self.clock.advance(elapsed);
        for _ in 0..due {
            self.step(canvas);
        }
        due
    }

    pub fn cancel_token(&self) -> CancelToken {
        self.token.clone()
    }

    pub fn is_running(&self) -> bool {
        !self.token.is_cancelled()
    }

    /// End the session; further `advance` calls do nothing
    pub fn stop(&mut self) {
        if !self.token.is_cancelled() {
            self.token.cancel();
            self.clock.reset();
            log::info!("Session stopped after {} ticks", self.arena.time_ticks);
        }
    }
}

/// Convert a position relative to the displayed surface into arena
/// coordinates, compensating for CSS scaling of the canvas element
pub fn client_to_arena(offset: Vec2, client_size: Vec2, arena_size: Vec2) -> Vec2 {
    if client_size.x <= 0.0 || client_size.y <= 0.0 {
        return offset;
    }
    offset * (arena_size / client_size)
}

/// Drive a session at the fixed tick rate on the current thread until it
/// is cancelled or `max_ticks` ticks have run
#[cfg(not(target_arch = "wasm32"))]
pub fn run_blocking<C: Canvas + ?Sized>(session: &mut Session, canvas: &mut C, max_ticks: u64) {
    use std::time::{Duration, Instant};

    let period = Duration::from_secs_f32(SIM_DT);
    let mut last = Instant::now();
    let mut ran = 0u64;

    while session.is_running() && ran < max_ticks {
        std::thread::sleep(period);
        let now = Instant::now();
        let elapsed = now.duration_since(last).as_secs_f32();
        last = now;
        ran += session.advance(elapsed, canvas) as u64;
    }
}
