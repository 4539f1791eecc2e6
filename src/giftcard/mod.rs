//! The gift-card aggregate: commands, events, replayed state, and the
//! validator guarding every state change.

mod command;
mod error;
mod event;
mod state;
mod validate;

pub use command::GiftCardCommand;
pub use error::{Rejection, ReplayError};
pub use event::GiftCardEvent;
pub use state::GiftCard;
pub use validate::validate;
