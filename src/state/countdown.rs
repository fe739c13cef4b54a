//! Countdown session structure and its state transitions

use serde::{Deserialize, Serialize};

/// Longest confirmation window, in seconds
pub const MAX_COUNTDOWN_SECONDS: u64 = 120;

/// Observable phase of a checkout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckoutPhase {
    Idle,
    Confirming,
    Placed,
}

/// Countdown session for a pending order cancellation window
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountdownSession {
    pub remaining_seconds: u64,
    pub overlay_visible: bool,
    pub order_placed: bool,
    /// Bumped on every start and cancel so stale ticks can be told apart
    pub generation: u64,
    #[serde(skip)]
    duration_seconds: u64,
}

impl CountdownSession {
    /// Create an idle session with the given window length (clamped to 1..=120)
    pub fn new(duration_seconds: u64) -> Self {
        let duration_seconds = duration_seconds.clamp(1, MAX_COUNTDOWN_SECONDS);
        Self {
            remaining_seconds: duration_seconds,
            overlay_visible: false,
            order_placed: false,
            generation: 0,
            duration_seconds,
        }
    }

    pub fn phase(&self) -> CheckoutPhase {
        match (self.overlay_visible, self.order_placed) {
            (true, _) => CheckoutPhase::Confirming,
            (false, true) => CheckoutPhase::Placed,
            (false, false) => CheckoutPhase::Idle,
        }
    }

    pub fn duration_seconds(&self) -> u64 {
        self.duration_seconds
    }

    /// Idle -> Confirming(duration). Returns false when not idle.
    pub fn start(&mut self) -> bool {
        if self.phase() != CheckoutPhase::Idle {
            return false;
        }
        self.remaining_seconds = self.duration_seconds;
        self.overlay_visible = true;
        self.generation += 1;
        true
    }

    /// Confirming(n) -> Confirming(n-1), or Placed once n-1 hits zero.
    ///
    /// Ticks for any other generation, or outside `Confirming`, are ignored.
    pub fn tick(&mut self, generation: u64) -> TickOutcome {
        if self.phase() != CheckoutPhase::Confirming || generation != self.generation {
            return TickOutcome::Ignored;
        }
        self.remaining_seconds = self.remaining_seconds.saturating_sub(1);
        if self.remaining_seconds == 0 {
            self.overlay_visible = false;
            self.order_placed = true;
            TickOutcome::Placed
        } else {
            TickOutcome::Counting(self.remaining_seconds)
        }
    }

    /// Confirming(n) -> Idle with the window reset. No-op elsewhere.
    pub fn cancel(&mut self) -> bool {
        if self.phase() != CheckoutPhase::Confirming {
            return false;
        }
        self.overlay_visible = false;
        self.remaining_seconds = self.duration_seconds;
        self.generation += 1;
        true
    }

    /// Placed -> Idle so a new checkout can begin. No-op elsewhere.
    pub fn acknowledge(&mut self) -> bool {
        if self.phase() != CheckoutPhase::Placed {
            return false;
        }
        self.order_placed = false;
        self.remaining_seconds = self.duration_seconds;
        true
    }
}

impl Default for CountdownSession {
    fn default() -> Self {
        Self::new(MAX_COUNTDOWN_SECONDS)
    }
}

/// Result of applying one tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    Counting(u64),
    Placed,
    Ignored,
}
