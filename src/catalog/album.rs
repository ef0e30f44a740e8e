//! Fixed-size album grouping.
//!
//! Albums are a presentation unit only: contiguous slices of whatever sequence
//! the filter produced, titled by their 1-based position.

/// Number of tracks per album unless configured otherwise.
pub const DEFAULT_ALBUM_SIZE: usize = 15;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Album<T> {
    pub title: String,
    pub cover: Option<String>,
    pub tracks: Vec<T>,
}

impl<T> Album<T> {
    pub fn len(&self) -> usize {
        self.tracks.len()
    }
}

/// Split `items` into albums of at most `size` entries, in order.
///
/// The input is never modified. A `size` of zero is treated as one.
/// When `covers` is non-empty, album `n` gets `covers[(n - 1) % covers.len()]`.
pub fn group_albums<T: Clone>(items: &[T], size: usize, covers: &[String]) -> Vec<Album<T>> {
    items
        .chunks(size.max(1))
        .enumerate()
        .map(|(i, chunk)| Album {
            title: format!("Album {}", i + 1),
            cover: cover_for(i, covers),
            tracks: chunk.to_vec(),
        })
        .collect()
}

fn cover_for(position: usize, covers: &[String]) -> Option<String> {
    if covers.is_empty() {
        None
    } else {
        Some(covers[position % covers.len()].clone())
    }
}
