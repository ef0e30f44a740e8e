//! UI rendering helpers for the terminal user interface.
//!
//! This module contains functions to render the TUI using `ratatui`. Rendering
//! only reads the `App` model; every mutation happens in the event loop.

mod banner;

pub use banner::WaveBanner;

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Gauge, List, ListItem, ListState, Padding, Paragraph, Wrap},
};
use std::{collections::BTreeMap, sync::LazyLock, time::Duration};

use crate::app::{App, InputMode, LoadState, Row};
use crate::catalog::FilterCriteria;
use crate::config::{ControlsSettings, RadioStation, Settings};
use crate::radio::RadioStatus;

static CONTROLS_MAP: LazyLock<BTreeMap<String, String>> = LazyLock::new(|| {
    let mut map: BTreeMap<String, String> = BTreeMap::new();
    map.insert("j/k".to_string(), "up/down".to_string());
    map.insert("gg/G".to_string(), "top/bottom".to_string());
    map.insert("enter".to_string(), "play / open album".to_string());
    map.insert("o".to_string(), "fold album".to_string());
    map.insert("space/p".to_string(), "play/pause".to_string());
    map.insert("s".to_string(), "stop".to_string());
    // h/l and -/+ are filled dynamically from config.
    map.insert("0-9".to_string(), "seek to n0%".to_string());
    map.insert("/".to_string(), "search".to_string());
    map.insert("[/]".to_string(), "country".to_string());
    map.insert("{/}".to_string(), "genre".to_string());
    map.insert("x".to_string(), "clear filters".to_string());
    map.insert("f".to_string(), "favorite".to_string());
    map.insert("r/R".to_string(), "radio on-off/next".to_string());
    map.insert("q".to_string(), "quit".to_string());
    map
});

/// Render the controls help text, incorporating seek and volume steps.
fn controls_text(controls: &ControlsSettings) -> String {
    let order = [
        "j/k", "gg/G", "enter", "o", "space/p", "s", "h/l", "0-9", "-/+", "/", "[/]", "{/}", "x",
        "f", "r/R", "q",
    ];
    order
        .iter()
        .filter_map(|k| match *k {
            "h/l" => Some(format!("[h/l] seek -/+{}s", controls.seek_seconds)),
            "-/+" => Some(format!("[-/+] volume -/+{}%", controls.volume_step)),
            _ => CONTROLS_MAP.get(*k).map(|v| format!("[{}] {}", k, v)),
        })
        .collect::<Vec<String>>()
        .join(" | ")
}

/// Format a `Duration` as `MM:SS`.
fn format_mmss(d: Duration) -> String {
    let secs = d.as_secs();
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

/// Rectangle of at most `width` x `height` in the top-right corner of `r`.
fn top_right_rect(width: u16, height: u16, r: Rect) -> Rect {
    let width = width.min(r.width.saturating_sub(2));
    let height = height.min(r.height.saturating_sub(1));
    Rect {
        x: r.x + r.width.saturating_sub(width + 1),
        y: r.y + 1,
        width,
        height,
    }
}

fn padded() -> Padding {
    Padding {
        left: 1,
        right: 0,
        top: 0,
        bottom: 0,
    }
}

/// First row and selected offset of a window of `height` rows centered on `selected`.
fn visible_window(total: usize, selected: usize, height: usize) -> (usize, usize, usize) {
    if total <= height || height == 0 {
        return (0, total, selected);
    }
    let half = height / 2;
    let mut start = selected.saturating_sub(half);
    if start + height > total {
        start = total - height;
    }
    (start, start + height, selected - start)
}

/// Render the entire UI into the provided `frame` using `app` state and settings.
pub fn draw(
    frame: &mut Frame,
    app: &App,
    banner: &WaveBanner,
    settings: &Settings,
    radio_status: Option<&RadioStatus>,
) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(5),
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(3),
            Constraint::Length(4),
        ])
        .split(frame.area());

    draw_header(frame, banner, &settings.ui.header_text, chunks[0]);
    draw_filter_bar(frame, app, chunks[1]);

    let main = if settings.ui.side_panel {
        let cols = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Min(20), Constraint::Length(36)])
            .split(chunks[2]);
        draw_side_panel(frame, app, &settings.radio.stations, radio_status, cols[1]);
        cols[0]
    } else {
        chunks[2]
    };
    draw_albums(frame, app, main);

    draw_now_playing(frame, app, chunks[3]);

    if let Some(ref notice) = app.notice {
        let area = top_right_rect(40, 4, main);
        frame.render_widget(Clear, area);
        let popup = Paragraph::new(vec![
            Line::from(notice.headline.as_str().bold()),
            Line::from(notice.detail.as_str()),
        ])
        .block(
            Block::bordered()
                .title(format!(" {} ", notice.title))
                .padding(padded())
                .border_style(Style::default().fg(Color::Magenta)),
        );
        frame.render_widget(popup, area);
    }

    let footer = Paragraph::new(controls_text(&settings.controls))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" controls ")
                .padding(padded()),
        )
        .wrap(Wrap { trim: true });
    frame.render_widget(footer, chunks[4]);
}

fn draw_header(frame: &mut Frame, banner: &WaveBanner, text: &str, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(" jukebox ")
        .title_alignment(Alignment::Center);
    let inner = block.inner(area);
    frame.render_widget(block, area);
    banner.render(frame, inner);

    if inner.height > 0 {
        let mid = Rect {
            y: inner.y + inner.height / 2,
            height: 1,
            ..inner
        };
        let title = Paragraph::new(text.bold()).alignment(Alignment::Center);
        frame.render_widget(title, mid);
    }
}

/// Selector labels, plus a reset hint while any filter is active.
fn selectors_text(criteria: &FilterCriteria) -> String {
    let mut text = format!(
        " • COUNTRY: {} • GENRE: {}",
        criteria.country.label(),
        criteria.genre.label()
    );
    if !criteria.is_unfiltered() {
        text.push_str(" • [x] clear");
    }
    text
}

fn draw_filter_bar(frame: &mut Frame, app: &App, area: Rect) {
    let searching = app.mode == InputMode::Search;
    let mut parts: Vec<Span> = Vec::new();

    let query = if searching {
        format!("SEARCH: {}_", app.criteria.query)
    } else if app.criteria.query.is_empty() {
        "SEARCH: -".to_string()
    } else {
        format!("SEARCH: {}", app.criteria.query)
    };
    parts.push(if searching {
        Span::styled(query, Style::default().add_modifier(Modifier::REVERSED))
    } else {
        Span::raw(query)
    });
    parts.push(Span::raw(selectors_text(&app.criteria)));

    match app.load_state {
        LoadState::Ready(ref report) => {
            parts.push(Span::raw(format!(
                " • SHOWING: {}/{} • {}",
                app.visible_count(),
                app.catalog.len(),
                report.summary()
            )));
        }
        LoadState::Loading => parts.push(Span::raw(" • loading…")),
        LoadState::Failed(_) => parts.push(" • load failed".red()),
    }

    let bar = Paragraph::new(Line::from(parts))
        .block(Block::bordered().padding(padded()).title(" filter "))
        .wrap(Wrap { trim: true });
    frame.render_widget(bar, area);
}

fn draw_albums(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default().borders(Borders::ALL).title(" albums ");

    let placeholder = match app.load_state {
        LoadState::Loading => Some(Paragraph::new("Loading catalog…")),
        LoadState::Failed(ref msg) => Some(
            Paragraph::new(format!("Could not load the catalog:\n{msg}"))
                .style(Style::default().fg(Color::Red)),
        ),
        LoadState::Ready(_) if app.albums.is_empty() => {
            Some(Paragraph::new("No tracks match the current filters."))
        }
        LoadState::Ready(_) => None,
    };
    if let Some(p) = placeholder {
        frame.render_widget(p.block(block.padding(padded())).wrap(Wrap { trim: true }), area);
        return;
    }

    let playing = app.now_playing().and_then(|info| info.index);
    let rows = app.rows();
    let list_height = area.height.saturating_sub(2) as usize;
    let (start, end, selected_in_window) = visible_window(rows.len(), app.selected, list_height);

    // Only build ListItems for the visible window.
    let items: Vec<ListItem> = rows[start..end]
        .iter()
        .map(|row| match *row {
            Row::Album(a) => {
                let album = &app.albums[a];
                let marker = if app.is_expanded(a) { "▾" } else { "▸" };
                let cover = album
                    .cover
                    .as_deref()
                    .map(|c| format!(" [{c}]"))
                    .unwrap_or_default();
                ListItem::new(Line::from(vec![
                    Span::raw(format!("{marker} ")),
                    Span::raw(album.title.clone()).bold(),
                    Span::raw(format!("{cover} ({})", album.len())),
                ]))
            }
            Row::Track { index, .. } => {
                let Some(track) = app.track(index) else {
                    return ListItem::new("");
                };
                let star = if app.is_favorite(index) { "★" } else { " " };
                let mut line = Line::from(vec![
                    Span::raw(format!("   {star} ")),
                    Span::raw(track.title.clone()),
                    Span::raw(" - ").dim(),
                    Span::raw(track.artist.clone()),
                    Span::raw(format!("  {} / {}", track.country, track.genre)).dim(),
                ]);
                if playing == Some(index) {
                    line = line.fg(Color::Magenta);
                }
                ListItem::new(line)
            }
        })
        .collect();

    let list = List::new(items)
        .block(block)
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
        .highlight_symbol("> ");
    let mut state = ListState::default();
    if !rows.is_empty() {
        state.select(Some(selected_in_window));
    }
    frame.render_stateful_widget(list, area, &mut state);
}

/// Row to highlight in the station list: the tuned station, if it still exists.
fn radio_highlight(current: Option<usize>, stations: usize) -> Option<usize> {
    current.filter(|&i| i < stations)
}

fn draw_side_panel(
    frame: &mut Frame,
    app: &App,
    stations: &[RadioStation],
    radio_status: Option<&RadioStatus>,
    area: Rect,
) {
    let parts = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage(35),
            Constraint::Percentage(35),
            Constraint::Percentage(30),
        ])
        .split(area);

    let title_of = |i: usize| {
        app.track(i)
            .map(|t| format!("{} - {}", t.title, t.artist))
            .unwrap_or_default()
    };

    let recent: Vec<ListItem> = app
        .history
        .ids()
        .iter()
        .rev()
        .filter_map(|id| app.catalog.position(id))
        .map(|i| ListItem::new(title_of(i)))
        .collect();
    frame.render_widget(
        List::new(recent).block(Block::bordered().title(" recently played ")),
        parts[0],
    );

    let recommended: Vec<ListItem> = app
        .recommendations
        .iter()
        .map(|&i| ListItem::new(title_of(i)))
        .collect();
    frame.render_widget(
        List::new(recommended).block(Block::bordered().title(" recommended ")),
        parts[1],
    );

    let radio_title = match radio_status {
        Some(s) if s.connecting => " radio (connecting) ".to_string(),
        Some(s) if s.error.is_some() => " radio (error) ".to_string(),
        _ if app.radio.is_playing() => " radio (on air) ".to_string(),
        _ => " radio ".to_string(),
    };
    let items: Vec<ListItem> = if stations.is_empty() {
        vec![ListItem::new(Span::raw("no stations configured").dim())]
    } else {
        stations
            .iter()
            .enumerate()
            .map(|(i, s)| {
                let mark = match app.radio.current() {
                    Some(c) if c == i && app.radio.is_playing() => "♪ ",
                    Some(c) if c == i => "‖ ",
                    _ => "  ",
                };
                ListItem::new(format!("{mark}{}", s.name))
            })
            .collect()
    };
    let mut state = ListState::default();
    state.select(radio_highlight(app.radio.current(), stations.len()));
    frame.render_stateful_widget(
        List::new(items)
            .block(Block::bordered().title(radio_title))
            .highlight_style(Style::default().add_modifier(Modifier::BOLD)),
        parts[2],
        &mut state,
    );
}

fn draw_now_playing(frame: &mut Frame, app: &App, area: Rect) {
    let info = app.now_playing().unwrap_or_default();
    let volume = format!("vol {}%", app.volume);

    let (label, ratio) = match info.index.and_then(|i| app.track(i)) {
        Some(track) => {
            let state = if info.playing { "▶" } else { "‖" };
            let time = match info.duration {
                Some(total) => format!("{} / {}", format_mmss(info.elapsed), format_mmss(total)),
                None => format_mmss(info.elapsed),
            };
            (
                format!(
                    "{state} {} - {}  [{time}]  {volume}",
                    track.title, track.artist
                ),
                info.progress().unwrap_or(0.0),
            )
        }
        None => match info.error {
            Some(ref e) => (format!("■ {e}  {volume}"), 0.0),
            None => (format!("■ stopped  {volume}"), 0.0),
        },
    };

    let gauge = Gauge::default()
        .block(Block::bordered().title(" playback "))
        .gauge_style(Style::default().fg(Color::Magenta))
        .ratio(ratio)
        .label(label);
    frame.render_widget(gauge, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Choice;
    use crate::radio::RadioState;

    #[test]
    fn controls_text_includes_configured_steps() {
        let text = controls_text(&ControlsSettings {
            seek_seconds: 12,
            volume_step: 7,
        });
        assert!(text.contains("[h/l] seek -/+12s"));
        assert!(text.contains("[-/+] volume -/+7%"));
        assert!(text.starts_with("[j/k] up/down"));
    }

    #[test]
    fn window_centers_on_selection_and_clamps() {
        assert_eq!(visible_window(5, 3, 10), (0, 5, 3));
        assert_eq!(visible_window(100, 50, 10), (45, 55, 5));
        assert_eq!(visible_window(100, 98, 10), (90, 100, 8));
        assert_eq!(visible_window(100, 2, 10), (0, 10, 2));
    }

    #[test]
    fn selectors_text_hints_reset_only_when_filtered() {
        let mut criteria = FilterCriteria::default();
        assert_eq!(selectors_text(&criteria), " • COUNTRY: any • GENRE: any");

        criteria.genre = Choice::Only("Jazz".into());
        assert_eq!(
            selectors_text(&criteria),
            " • COUNTRY: any • GENRE: Jazz • [x] clear"
        );

        criteria.genre = Choice::Any;
        criteria.query = "a".into();
        assert!(selectors_text(&criteria).ends_with("[x] clear"));
    }

    #[test]
    fn radio_highlight_follows_the_tuned_station() {
        let stations = vec![
            RadioStation {
                name: "FIP".into(),
                url: "https://stream.example/fip.mp3".into(),
            },
            RadioStation {
                name: "Nova".into(),
                url: "https://stream.example/nova.mp3".into(),
            },
        ];
        let mut radio = RadioState::default();
        assert_eq!(radio_highlight(radio.current(), stations.len()), None);

        radio.select(1, &stations);
        assert_eq!(radio_highlight(radio.current(), stations.len()), Some(1));
        radio.select_next(&stations);
        assert_eq!(radio_highlight(radio.current(), stations.len()), Some(0));

        assert_eq!(radio_highlight(Some(3), stations.len()), None);
    }

    #[test]
    fn format_mmss_pads() {
        assert_eq!(format_mmss(Duration::from_secs(65)), "01:05");
        assert_eq!(format_mmss(Duration::ZERO), "00:00");
    }
}
