//! Game phases and their legal transitions.
//!
//! | from           | to                                        |
//! |----------------|-------------------------------------------|
//! | Init           | Planning, AugmentSelect                   |
//! | Planning       | CombatPending                             |
//! | CombatPending  | CombatResolved                            |
//! | CombatResolved | Planning, CarouselSelect, AugmentSelect, GameOver |
//! | CarouselSelect | Planning, AugmentSelect                   |
//! | AugmentSelect  | Planning                                  |
//!
//! Anything else is an engine bug and surfaces as
//! `EngineError::IllegalTransition`.

use serde::{Deserialize, Serialize};

use crate::core::EngineError;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    #[default]
    Init,
    Planning,
    CombatPending,
    CombatResolved,
    CarouselSelect,
    AugmentSelect,
    GameOver,
}

impl Phase {
    /// Whether `self -> to` is a legal transition.
    #[must_use]
    pub fn can_transition_to(self, to: Phase) -> bool {
        use Phase::*;
        matches!(
            (self, to),
            (Init, Planning)
                | (Init, AugmentSelect)
                | (Planning, CombatPending)
                | (CombatPending, CombatResolved)
                | (CombatResolved, Planning)
                | (CombatResolved, CarouselSelect)
                | (CombatResolved, AugmentSelect)
                | (CombatResolved, GameOver)
                | (CarouselSelect, Planning)
                | (CarouselSelect, AugmentSelect)
                | (AugmentSelect, Planning)
        )
    }

    /// Selection phases between rounds, resolved by the engine.
    #[must_use]
    pub fn is_interstitial(self) -> bool {
        matches!(self, Phase::CarouselSelect | Phase::AugmentSelect)
    }

    #[must_use]
    pub fn is_terminal(self) -> bool {
        self == Phase::GameOver
    }
}

/// The single active phase of a game instance.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhaseMachine {
    phase: Phase,
    transitions: u32,
}

impl PhaseMachine {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Number of transitions taken since `Init`.
    #[must_use]
    pub fn transitions(&self) -> u32 {
        self.transitions
    }

    /// Move to `to`, or report the illegal edge without changing phase.
    pub fn transition(&mut self, to: Phase) -> Result<Phase, EngineError> {
        let from = self.phase;
        if !from.can_transition_to(to) {
            return Err(EngineError::IllegalTransition { from, to });
        }
        self.phase = to;
        self.transitions += 1;
        Ok(from)
    }
}
