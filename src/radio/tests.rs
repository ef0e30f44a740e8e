use super::*;
use crate::config::RadioStation;

fn stations() -> Vec<RadioStation> {
    vec![
        RadioStation {
            name: "FIP".into(),
            url: "https://stream.example/fip.mp3".into(),
        },
        RadioStation {
            name: "Nova".into(),
            url: "https://stream.example/nova.mp3".into(),
        },
    ]
}

#[test]
fn toggle_without_station_does_nothing() {
    let mut radio = RadioState::default();
    assert_eq!(radio.toggle(), None);
    assert!(!radio.is_playing());
}

#[test]
fn selecting_a_station_tunes_and_plays() {
    let st = stations();
    let mut radio = RadioState::default();
    assert_eq!(
        radio.select(1, &st),
        Some(RadioAction::Tune("https://stream.example/nova.mp3".into()))
    );
    assert_eq!(radio.current(), Some(1));
    assert!(radio.is_playing());
}

#[test]
fn reselecting_the_current_station_is_a_no_op() {
    let st = stations();
    let mut radio = RadioState::default();
    radio.select(0, &st);
    assert_eq!(radio.toggle(), Some(RadioAction::Pause));

    assert_eq!(radio.select(0, &st), None);
    assert!(!radio.is_playing());

    assert_eq!(radio.toggle(), Some(RadioAction::Resume));
    assert!(radio.is_playing());
}

#[test]
fn select_next_wraps_and_ignores_out_of_range() {
    let st = stations();
    let mut radio = RadioState::default();
    assert!(matches!(radio.select_next(&st), Some(RadioAction::Tune(_))));
    assert_eq!(radio.current(), Some(0));
    radio.select_next(&st);
    assert_eq!(radio.current(), Some(1));
    radio.select_next(&st);
    assert_eq!(radio.current(), Some(0));

    assert_eq!(radio.select(5, &st), None);
    assert_eq!(radio.current(), Some(0));
    assert_eq!(radio.select_next(&[]), None);
}
