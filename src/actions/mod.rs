//! Action space, validity masks and the action entry point.
//!
//! ## Key Types
//!
//! - `ActionSpace`: Flat index encoding of every action
//! - `ActionMask`: Legal actions at one decision point
//! - `check_action` / `apply_action`: Legality check and the single mutation entry
//!
//! The mask and `apply_action` share one legality function, so an action
//! in the mask always applies and an action outside it always comes back
//! as `ActionError::IllegalAction`.

pub mod apply;
pub mod mask;
pub mod space;

pub use apply::{apply_action, check_action};
pub use mask::{get_action_mask, ActionMask};
pub use space::ActionSpace;
