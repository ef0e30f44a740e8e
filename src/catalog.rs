//! Track catalog: loading, filtering and album grouping.
//!
//! Everything here is a pure data transform over a loaded [`Catalog`]; nothing
//! depends on the terminal or the audio device.

mod album;
mod filter;
mod load;
mod model;
mod options;

pub use album::*;
pub use filter::*;
pub use load::*;
pub use model::*;
pub use options::*;

/// Filter the catalog and group the result into albums in one step.
///
/// Album entries are catalog indices.
pub fn view(
    catalog: &Catalog,
    criteria: &FilterCriteria,
    album_size: usize,
    covers: &[String],
) -> Vec<Album<usize>> {
    let visible = filter_indices(catalog, criteria);
    group_albums(&visible, album_size, covers)
}

#[cfg(test)]
mod tests;
