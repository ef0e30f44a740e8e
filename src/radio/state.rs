use crate::config::RadioStation;

/// What the radio player has to do after a state change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RadioAction {
    Tune(String),
    Pause,
    Resume,
}

/// Station selection and play/pause flag of the radio widget.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RadioState {
    current: Option<usize>,
    current_url: Option<String>,
    playing: bool,
}

impl RadioState {
    pub fn current(&self) -> Option<usize> {
        self.current
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    /// Select station `index`. Tuning only happens when its url differs from the current one.
    pub fn select(&mut self, index: usize, stations: &[RadioStation]) -> Option<RadioAction> {
        let station = stations.get(index)?;
        if self.current_url.as_deref() == Some(station.url.as_str()) {
            return None;
        }
        self.current = Some(index);
        self.current_url = Some(station.url.clone());
        self.playing = true;
        Some(RadioAction::Tune(station.url.clone()))
    }

    /// Select the station after the current one, wrapping; the first when none is.
    pub fn select_next(&mut self, stations: &[RadioStation]) -> Option<RadioAction> {
        if stations.is_empty() {
            return None;
        }
        let next = match self.current {
            Some(c) => (c + 1) % stations.len(),
            None => 0,
        };
        self.select(next, stations)
    }

    /// Flip pause/resume. Does nothing until a station has been selected.
    pub fn toggle(&mut self) -> Option<RadioAction> {
        self.current?;
        self.playing = !self.playing;
        Some(if self.playing {
            RadioAction::Resume
        } else {
            RadioAction::Pause
        })
    }
}
