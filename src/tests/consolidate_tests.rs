// src/tests/consolidate_tests.rs

use crate::domain::{ConsolidatedGame, Consolidator};
use crate::filters::{FilterSpec, Platform};
use crate::tests::utils::*;

fn itch_spec() -> FilterSpec {
    let mut spec = FilterSpec::default();
    spec.platform = Platform::Itch;
    spec
}

/// Parent on Steam plus an absorbed itch child with placeholder reviews.
fn seed_absorption_pair(db: &crate::db::Database) {
    insert_game(
        db,
        &SeedGame {
            id: "steam:parent".into(),
            name: "Depth Crawler".into(),
            review_summary: Some("Very Positive".into()),
            positive_review_percentage: Some(92),
            review_count: Some(1500),
            review_summary_priority: Some(7),
            header_image: Some("parent.jpg".into()),
            itch_url: Some("https://crawler.itch.io".into()),
            price_eur: Some(14.99),
            ..Default::default()
        },
    );
    insert_game(
        db,
        &SeedGame {
            id: "itch:child".into(),
            name: "Depth Crawler (itch)".into(),
            platform: "itch".into(),
            is_absorbed: true,
            absorbed_into: Some("steam:parent".into()),
            review_summary: Some("No user reviews".into()),
            positive_review_percentage: None,
            review_count: None,
            review_summary_priority: None,
            header_image: None,
            steam_url: None,
            itch_url: Some("https://crawler.itch.io".into()),
            price_eur: Some(4.99),
            ..Default::default()
        },
    );
}

#[test]
fn absorbed_child_inherits_review_block_and_header() {
    let db = make_db("absorption");
    seed_absorption_pair(&db);

    let games = run_full(&db, &itch_spec());
    let child = games.iter().find(|g| g.id == "itch:child").unwrap();

    assert_eq!(child.review_summary.as_deref(), Some("Very Positive"));
    assert_eq!(child.positive_review_percentage, Some(92));
    assert_eq!(child.review_count, Some(1500));
    assert_eq!(child.review_summary_priority, Some(7));
    assert_eq!(child.header_image.as_deref(), Some("parent.jpg"));
}

#[test]
fn absorbed_child_keeps_its_own_price_and_urls() {
    let db = make_db("absorption_own");
    seed_absorption_pair(&db);

    let games = run_full(&db, &itch_spec());
    let child = games.iter().find(|g| g.id == "itch:child").unwrap();

    // Inheritance never touches price, storefront URLs or platform.
    assert_eq!(child.price_eur, Some(4.99));
    assert_eq!(child.itch_url.as_deref(), Some("https://crawler.itch.io"));
    assert_eq!(child.steam_url, None);
    assert_eq!(child.platform, "itch");
}

#[test]
fn real_child_reviews_are_never_overwritten() {
    let db = make_db("absorption_real");
    insert_game(
        &db,
        &SeedGame {
            id: "steam:parent".into(),
            review_summary: Some("Overwhelmingly Positive".into()),
            positive_review_percentage: Some(97),
            itch_url: Some("https://own.itch.io".into()),
            ..Default::default()
        },
    );
    insert_game(
        &db,
        &SeedGame {
            id: "itch:child".into(),
            platform: "itch".into(),
            is_absorbed: true,
            absorbed_into: Some("steam:parent".into()),
            review_summary: Some("Mostly Positive".into()),
            positive_review_percentage: Some(78),
            steam_url: None,
            itch_url: Some("https://own.itch.io".into()),
            ..Default::default()
        },
    );

    let games = run_full(&db, &itch_spec());
    let child = games.iter().find(|g| g.id == "itch:child").unwrap();
    assert_eq!(child.review_summary.as_deref(), Some("Mostly Positive"));
    assert_eq!(child.positive_review_percentage, Some(78));
}

#[test]
fn missing_release_date_comes_from_the_parent() {
    let db = make_db("absorption_release");
    insert_game(
        &db,
        &SeedGame {
            id: "steam:parent".into(),
            release_date: Some("2 Feb, 2023".into()),
            release_date_sortable: Some(20230202),
            itch_url: Some("https://x.itch.io".into()),
            ..Default::default()
        },
    );
    insert_game(
        &db,
        &SeedGame {
            id: "itch:child".into(),
            platform: "itch".into(),
            is_absorbed: true,
            absorbed_into: Some("steam:parent".into()),
            release_date: None,
            release_date_sortable: None,
            steam_url: None,
            ..Default::default()
        },
    );

    let games = run_full(&db, &itch_spec());
    let child = games.iter().find(|g| g.id == "itch:child").unwrap();
    assert_eq!(child.release_date.as_deref(), Some("2 Feb, 2023"));
    assert_eq!(child.release_date_sortable, Some(20230202));
}

#[test]
fn dangling_parent_reference_leaves_the_record_untouched() {
    let db = make_db("absorption_dangling");
    insert_game(
        &db,
        &SeedGame {
            id: "itch:orphan".into(),
            platform: "itch".into(),
            is_absorbed: true,
            absorbed_into: Some("steam:gone".into()),
            review_summary: Some("No user reviews".into()),
            steam_url: None,
            itch_url: Some("https://orphan.itch.io".into()),
            ..Default::default()
        },
    );

    let games = run_full(&db, &itch_spec());
    let orphan = games.iter().find(|g| g.id == "itch:orphan").unwrap();
    assert_eq!(orphan.review_summary.as_deref(), Some("No user reviews"));
}

#[test]
fn malformed_json_column_becomes_an_empty_sequence() {
    let db = make_db("bad_json");
    insert_game(
        &db,
        &SeedGame {
            id: "steam:bad".into(),
            tags: Some("Roguelike, Pixel Art".into()), // not JSON
            genres: Some(r#"["Action","Indie"]"#.into()),
            ..Default::default()
        },
    );

    let games = run_full(&db, &FilterSpec::default());
    let game = games.iter().find(|g| g.id == "steam:bad").unwrap();
    assert!(game.tags.is_empty());
    assert_eq!(game.genres, vec!["Action", "Indie"]);
}

#[test]
fn aggregate_counts_free_games_and_caps_price() {
    let consolidator = Consolidator::new();
    let games = vec![
        ConsolidatedGame {
            id: "a".into(),
            is_free: true,
            positive_review_percentage: Some(90),
            unique_channels: vec!["One".into(), "Two".into()],
            tags: vec!["Roguelike".into()],
            ..Default::default()
        },
        ConsolidatedGame {
            id: "b".into(),
            price_eur: Some(24.99),
            positive_review_percentage: Some(70),
            unique_channels: vec!["Two".into(), "Three".into()],
            tags: vec!["Roguelike".into(), "Horror".into()],
            ..Default::default()
        },
        ConsolidatedGame {
            id: "c".into(),
            price_eur: Some(9.99),
            // Zero rating means unrated; must not drag the mean down.
            positive_review_percentage: Some(0),
            tags: vec!["Puzzle".into()],
            ..Default::default()
        },
    ];

    let stats = consolidator.aggregate(&games);
    assert_eq!(stats.total_games, 3);
    assert_eq!(stats.free_games, 1);
    assert_eq!(stats.max_price, 24.99);
    assert_eq!(stats.average_rating, 80.0);
    assert_eq!(stats.channel_count, 3);
    assert_eq!(stats.tag_count, 3);
}

#[test]
fn aggregate_of_nothing_is_all_zeroes() {
    let stats = Consolidator::new().aggregate(&[]);
    assert_eq!(stats.total_games, 0);
    assert_eq!(stats.average_rating, 0.0);
    assert_eq!(stats.max_price, 0.0);
}
