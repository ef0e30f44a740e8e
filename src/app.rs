//! Application module: exposes the app model used by the TUI and runtime.
//!
//! The `App` model lives in `app::model` and holds the catalog, the filter
//! criteria, the derived albums and the selection and playback state.

mod history;
mod model;
mod notice;

pub use history::History;
pub use model::*;
pub use notice::Notice;
