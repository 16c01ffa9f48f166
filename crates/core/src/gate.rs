//! Turn gating - decides what the client does with each snapshot
//!
//! [`TurnGate`] owns the per-session turn bookkeeping. Feeding it snapshots
//! in arrival order through [`TurnGate::step`] yields one [`Step`] per
//! snapshot. The turn-number update and the eligibility check happen in the
//! same call, so callers cannot observe them out of order.

use crate::types::{GameView, FIRST_TURN};

/// What to do with one snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// First snapshot of the session: bind a strategy and declare readiness.
    Initialize,
    /// Ask the strategy for a destination and send a move.
    Move,
    /// The game is over; stop consuming the stream.
    Finish,
    /// Nothing to do for this snapshot.
    Idle,
}

/// Per-session turn state.
///
/// Invariant: `has_acted` is true only while `current_turn` equals the turn
/// number of the last processed snapshot and an action was sent for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TurnGate {
    current_turn: u32,
    has_acted: bool,
    initialized: bool,
}

impl TurnGate {
    pub fn new() -> Self {
        Self {
            current_turn: FIRST_TURN,
            has_acted: false,
            initialized: false,
        }
    }

    /// Process one snapshot and decide the step for it.
    ///
    /// ```
    /// use hide_and_seek_core::{Step, TurnGate};
    /// use hide_and_seek_core::types::{Agent, AgentType, GameStatus, GameView, Turn, TurnType};
    ///
    /// let police = Agent::new(1, AgentType::Police);
    /// let view = |n, t| GameView::new(GameStatus::Ongoing, Turn::new(n, t), police.clone());
    ///
    /// let mut gate = TurnGate::new();
    /// assert_eq!(gate.step(&view(1, TurnType::ThiefTurn)), Step::Initialize);
    /// assert_eq!(gate.step(&view(1, TurnType::ThiefTurn)), Step::Idle);
    /// assert_eq!(gate.step(&view(2, TurnType::PoliceTurn)), Step::Move);
    /// gate.mark_acted();
    /// assert_eq!(gate.step(&view(2, TurnType::PoliceTurn)), Step::Idle);
    /// ```
    pub fn step(&mut self, view: &GameView) -> Step {
        self.observe(view.turn_number());

        if !self.initialized {
            self.initialized = true;
            return Step::Initialize;
        }

        if view.is_ongoing() && self.can_move(view) {
            Step::Move
        } else if view.is_finished() {
            Step::Finish
        } else {
            Step::Idle
        }
    }

    /// Whether the viewer may act on `view` given the current turn state.
    ///
    /// The viewer must be on the side whose turn it is, and may act at most
    /// once per turn number. A turn number not yet observed is always open.
    pub fn can_move(&self, view: &GameView) -> bool {
        let own_turn = view.role().acts_during(view.turn_type());
        let turn_open = view.turn_number() != self.current_turn || !self.has_acted;
        own_turn && turn_open
    }

    /// Record that an action was sent for the current turn.
    pub fn mark_acted(&mut self) {
        self.has_acted = true;
    }

    pub fn current_turn(&self) -> u32 {
        self.current_turn
    }

    pub fn has_acted(&self) -> bool {
        self.has_acted
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    fn observe(&mut self, turn_number: u32) {
        if turn_number != self.current_turn {
            log::debug!("turn {} -> {}", self.current_turn, turn_number);
            self.current_turn = turn_number;
            self.has_acted = false;
        }
    }
}

impl Default for TurnGate {
    fn default() -> Self {
        Self::new()
    }
}
