//! Radio widget: a station list with its own player, unrelated to the catalog.

mod player;
mod state;

pub use player::{RadioHandle, RadioPlayer, RadioStatus};
pub use state::{RadioAction, RadioState};

#[cfg(test)]
mod tests;
