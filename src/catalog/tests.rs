use super::*;

fn track(id: &str, title: &str, artist: &str, country: &str, genre: &str) -> Track {
    Track {
        id: TrackId::from(id),
        title: title.into(),
        artist: artist.into(),
        country: country.into(),
        genre: genre.into(),
        url: format!("/tmp/music/{id}.mp3"),
    }
}

fn flatten<T: Clone>(albums: &[Album<T>]) -> Vec<T> {
    albums
        .iter()
        .flat_map(|a| a.tracks.iter().cloned())
        .collect()
}

fn numbered(n: usize) -> Vec<Track> {
    (0..n)
        .map(|i| {
            let country = ["France", "Spain", "Mali"][i % 3];
            let genre = ["Pop", "Jazz"][i % 2];
            track(&i.to_string(), &format!("Song {i}"), "Artist", country, genre)
        })
        .collect()
}

fn alpha_beta() -> Catalog {
    Catalog::new(vec![
        track("1", "Alpha", "Bob", "France", "Pop"),
        track("2", "Beta", "Ann", "Spain", "Pop"),
    ])
}

#[test]
fn grouping_32_tracks_gives_15_15_2() {
    let items: Vec<usize> = (0..32).collect();
    let albums = group_albums(&items, DEFAULT_ALBUM_SIZE, &[]);
    let sizes: Vec<usize> = albums.iter().map(|a| a.len()).collect();
    assert_eq!(sizes, vec![15, 15, 2]);
    assert_eq!(albums[0].title, "Album 1");
    assert_eq!(albums[2].title, "Album 3");
}

#[test]
fn grouping_sizes_and_concatenation_hold_for_many_lengths() {
    for len in 0..=61usize {
        let items: Vec<usize> = (0..len).collect();
        let albums = group_albums(&items, 15, &[]);

        assert_eq!(albums.len(), len.div_ceil(15), "len {len}");
        if let Some((last, full)) = albums.split_last() {
            assert!(full.iter().all(|a| a.len() == 15));
            let expected_last = if len % 15 == 0 { 15 } else { len % 15 };
            assert_eq!(last.len(), expected_last, "len {len}");
        }
        assert_eq!(flatten(&albums), items);
    }
}

#[test]
fn grouping_leaves_input_untouched_and_is_stable_when_regrouped() {
    let items: Vec<usize> = (0..40).rev().collect();
    let before = items.clone();
    let first = group_albums(&items, 15, &[]);
    assert_eq!(items, before);

    let second = group_albums(&flatten(&first), 15, &[]);
    assert_eq!(first, second);
}

#[test]
fn grouping_assigns_covers_by_position_modulo() {
    let items: Vec<usize> = (0..50).collect();
    let covers = vec!["a.png".to_string(), "b.png".to_string()];
    let albums = group_albums(&items, 15, &covers);
    let got: Vec<Option<&str>> = albums.iter().map(|a| a.cover.as_deref()).collect();
    assert_eq!(
        got,
        vec![Some("a.png"), Some("b.png"), Some("a.png"), Some("b.png")]
    );
}

#[test]
fn grouping_zero_size_does_not_panic() {
    let albums = group_albums(&[1, 2, 3], 0, &[]);
    assert_eq!(albums.len(), 3);
}

#[test]
fn empty_catalog_has_no_groups_and_no_options() {
    let catalog = Catalog::default();
    let albums = view(&catalog, &FilterCriteria::default(), 15, &[]);
    assert!(albums.is_empty());
    assert_eq!(
        FilterOptions::from_tracks(catalog.tracks()),
        FilterOptions::default()
    );
}

#[test]
fn unfiltered_criteria_return_whole_catalog_in_order() {
    let catalog = Catalog::new(numbered(20));
    let criteria = FilterCriteria::default();
    assert_eq!(filter_indices(&catalog, &criteria), (0..20).collect::<Vec<_>>());
}

#[test]
fn country_mismatch_excludes_track() {
    let catalog = alpha_beta();
    let criteria = FilterCriteria {
        query: "a".into(),
        country: Choice::Only("France".into()),
        genre: Choice::Any,
    };
    let got = filter_indices(&catalog, &criteria);
    assert_eq!(got, vec![0]);
    assert_eq!(catalog.get(got[0]).unwrap().title, "Alpha");
}

#[test]
fn query_is_case_insensitive_on_title_and_artist() {
    let catalog = alpha_beta();
    let by_title = FilterCriteria {
        query: "AL".into(),
        ..FilterCriteria::default()
    };
    assert_eq!(filter_indices(&catalog, &by_title), vec![0]);

    let by_artist = FilterCriteria {
        query: "ann".into(),
        ..FilterCriteria::default()
    };
    assert_eq!(filter_indices(&catalog, &by_artist), vec![1]);
}

#[test]
fn query_handles_non_ascii_case() {
    let catalog = Catalog::new(vec![track("1", "Été indien", "Joe Dassin", "France", "Pop")]);
    let criteria = FilterCriteria {
        query: "ÉTÉ".into(),
        ..FilterCriteria::default()
    };
    assert_eq!(filter_indices(&catalog, &criteria), vec![0]);
}

#[test]
fn selectors_match_exactly_and_case_sensitively() {
    let catalog = alpha_beta();
    let criteria = FilterCriteria {
        country: Choice::Only("france".into()),
        ..FilterCriteria::default()
    };
    assert!(filter_indices(&catalog, &criteria).is_empty());

    let criteria = FilterCriteria {
        genre: Choice::Only("Pop".into()),
        ..FilterCriteria::default()
    };
    assert_eq!(filter_indices(&catalog, &criteria), vec![0, 1]);
}

#[test]
fn filter_output_is_exactly_the_matching_tracks_in_order() {
    let catalog = Catalog::new(numbered(45));
    let criteria_set = [
        FilterCriteria {
            query: "1".into(),
            country: Choice::Only("Spain".into()),
            genre: Choice::Any,
        },
        FilterCriteria {
            query: String::new(),
            country: Choice::Any,
            genre: Choice::Only("Jazz".into()),
        },
        FilterCriteria {
            query: "song 2".into(),
            country: Choice::Only("Mali".into()),
            genre: Choice::Only("Pop".into()),
        },
    ];

    for criteria in &criteria_set {
        let got = filter_indices(&catalog, criteria);
        assert!(got.windows(2).all(|w| w[0] < w[1]));
        let query = criteria.query.to_lowercase();
        for (i, t) in catalog.tracks().iter().enumerate() {
            let expected = criteria.country.accepts(&t.country)
                && criteria.genre.accepts(&t.genre)
                && (t.title.to_lowercase().contains(&query)
                    || t.artist.to_lowercase().contains(&query));
            assert_eq!(got.contains(&i), expected, "track {i}");
        }
    }
}

#[test]
fn view_groups_filtered_indices() {
    let catalog = Catalog::new(numbered(45));
    let criteria = FilterCriteria {
        genre: Choice::Only("Pop".into()),
        ..FilterCriteria::default()
    };
    let albums = view(&catalog, &criteria, 15, &[]);
    // 23 even indices in 0..45
    assert_eq!(albums.iter().map(|a| a.len()).collect::<Vec<_>>(), vec![15, 8]);
    assert_eq!(albums[1].tracks[0], 30);
}

#[test]
fn options_are_distinct_in_first_seen_order() {
    let tracks = vec![
        track("1", "a", "x", "Spain", "Rock"),
        track("2", "b", "x", "France", "Pop"),
        track("3", "c", "x", "Spain", "Pop"),
        track("4", "d", "x", "", "Rock"),
        track("5", "e", "x", "Mali", "Jazz"),
    ];
    let opts = FilterOptions::from_tracks(&tracks);
    assert_eq!(opts.countries, vec!["Spain", "France", "Mali"]);
    assert_eq!(opts.genres, vec!["Rock", "Pop", "Jazz"]);
}

#[test]
fn choice_cycles_through_any_and_options() {
    let opts = vec!["A".to_string(), "B".to_string()];
    let mut c = Choice::Any;
    c = c.cycle_next(&opts);
    assert_eq!(c, Choice::Only("A".into()));
    c = c.cycle_next(&opts);
    assert_eq!(c, Choice::Only("B".into()));
    c = c.cycle_next(&opts);
    assert_eq!(c, Choice::Any);

    assert_eq!(Choice::Any.cycle_prev(&opts), Choice::Only("B".into()));
    assert_eq!(Choice::Only("A".into()).cycle_prev(&opts), Choice::Any);
    assert_eq!(Choice::Any.cycle_next(&[]), Choice::Any);
}

#[test]
fn parse_catalog_accepts_numeric_and_string_ids() {
    let json = r#"[
        {"id": 1, "title": "Alpha", "artist": "Bob", "country": "France", "genre": "Pop", "url": "a.mp3"},
        {"id": "b-2", "title": "Beta", "artist": "Ann", "country": "Spain", "genre": "Pop", "url": "https://x/b.mp3"}
    ]"#;
    let (catalog, report) = parse_catalog(json).unwrap();
    assert_eq!(report.accepted, 2);
    assert!(report.rejected.is_empty());
    assert_eq!(catalog.get(0).unwrap().id.as_str(), "1");
    assert_eq!(catalog.get(1).unwrap().id.as_str(), "b-2");
    assert!(!is_remote_locator(&catalog.get(0).unwrap().url));
    assert!(is_remote_locator(&catalog.get(1).unwrap().url));
}

#[test]
fn parse_catalog_rejects_invalid_entries_and_keeps_the_rest() {
    let json = r#"[
        {"title": "Alpha", "artist": "Bob", "url": "a.mp3"},
        {"title": "", "artist": "Bob", "url": "b.mp3"},
        {"title": "Gamma", "url": "c.mp3"},
        42,
        {"id": 9, "title": "Delta", "artist": "Eve", "url": "d.mp3"},
        {"id": "9", "title": "Delta again", "artist": "Eve", "url": "d2.mp3"},
        {"title": 3, "artist": "Eve", "url": "e.mp3"}
    ]"#;
    let (catalog, report) = parse_catalog(json).unwrap();

    assert_eq!(catalog.len(), 2);
    assert_eq!(report.accepted, 2);
    let first = catalog.get(0).unwrap();
    assert_eq!(first.id.as_str(), "#1");
    assert_eq!(first.country, "");
    assert_eq!(first.genre, "");

    let reasons: Vec<(usize, RejectReason)> = report
        .rejected
        .iter()
        .map(|r| (r.position, r.reason.clone()))
        .collect();
    assert_eq!(
        reasons,
        vec![
            (2, RejectReason::MissingField("title")),
            (3, RejectReason::MissingField("artist")),
            (4, RejectReason::Malformed),
            (6, RejectReason::DuplicateId(TrackId::from("9"))),
            (7, RejectReason::Malformed),
        ]
    );
    assert_eq!(report.summary(), "2 tracks (5 invalid entries skipped)");
}

#[test]
fn generated_ids_never_collide_with_document_ids() {
    let json = r##"[
        {"id": "#2", "title": "Alpha", "artist": "Bob", "country": "France", "genre": "Pop", "url": "a.mp3"},
        {"title": "Beta", "artist": "Ann", "country": "Spain", "genre": "Pop", "url": "b.mp3"}
    ]"##;
    let (catalog, report) = parse_catalog(json).unwrap();

    assert_eq!(catalog.len(), 2);
    assert!(report.rejected.is_empty());
    let first = &catalog.get(0).unwrap().id;
    let second = &catalog.get(1).unwrap().id;
    assert_eq!(first.as_str(), "#2");
    assert_ne!(first, second);
    assert_eq!(catalog.position(second), Some(1));
}

#[test]
fn later_document_id_is_not_shadowed_by_a_generated_one() {
    let json = r##"[
        {"title": "Alpha", "artist": "Bob", "url": "a.mp3"},
        {"id": "#1", "title": "Beta", "artist": "Ann", "url": "b.mp3"}
    ]"##;
    let (catalog, report) = parse_catalog(json).unwrap();

    assert_eq!(catalog.len(), 2);
    assert!(report.rejected.is_empty());
    assert_eq!(catalog.get(1).unwrap().id.as_str(), "#1");
    assert_eq!(catalog.get(0).unwrap().id.as_str(), "#1.2");
}

#[test]
fn parse_catalog_requires_an_array() {
    assert!(matches!(
        parse_catalog(r#"{"tracks": []}"#),
        Err(CatalogError::NotAnArray)
    ));
    assert!(matches!(parse_catalog("not json"), Err(CatalogError::Json(_))));

    let (catalog, report) = parse_catalog("[]").unwrap();
    assert_eq!(catalog.len(), 0);
    assert_eq!(report.summary(), "0 tracks");
}

#[test]
fn load_reads_file_source_and_reports_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("music.json");
    std::fs::write(
        &path,
        r#"[{"id": 1, "title": "Alpha", "artist": "Bob", "country": "France", "genre": "Pop", "url": "a.mp3"}]"#,
    )
    .unwrap();

    let (catalog, _) = load(&CatalogSource::File(path.clone())).unwrap();
    assert_eq!(catalog.position(&TrackId::from("1")), Some(0));

    let missing = CatalogSource::File(dir.path().join("nope.json"));
    assert!(matches!(load(&missing), Err(CatalogError::Io { .. })));
}

#[test]
fn catalog_source_parse_detects_urls() {
    assert_eq!(
        CatalogSource::parse("https://example.org/music.json"),
        CatalogSource::Url("https://example.org/music.json".into())
    );
    assert_eq!(
        CatalogSource::parse("music.json"),
        CatalogSource::File("music.json".into())
    );
}
