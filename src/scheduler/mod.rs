//! Event scheduling and the phase state machine.
//!
//! ## Key Types
//!
//! - `Event`, `EventKind`: Typed phase-transition events
//! - `EventScheduler`: Priority queue ordered by (round, insertion sequence)
//! - `Phase`, `PhaseMachine`: The active phase and its legal transitions
//!
//! Timers are ordinary events; nothing here waits on a clock.

pub mod event;
pub mod phase;
pub mod queue;

pub use event::{EndReason, Event, EventKind, EventPayload};
pub use phase::{Phase, PhaseMachine};
pub use queue::EventScheduler;
