//! Track playback on a dedicated thread.
//!
//! The UI talks to the thread through [`AudioCmd`] messages and reads back a
//! shared [`PlaybackInfo`] snapshot for the progress and volume display.

mod error;
mod player;
mod source;
mod thread;
mod types;

pub use error::AudioError;
pub use player::AudioPlayer;
pub use types::*;
