use serde_json::{Value, json};
use sporlexport::export::{DatasetKind, TimeRange, flatten, flatten_all};

fn keys(row: &serde_json::Map<String, Value>) -> Vec<&str> {
    row.keys().map(String::as_str).collect()
}

fn sample_track() -> Value {
    json!({
        "id": "67Hna13dNDkZvBpTXRIaOJ",
        "name": "Teardrop",
        "uri": "spotify:track:67Hna13dNDkZvBpTXRIaOJ",
        "type": "track",
        "popularity": 71,
        "duration_ms": 330773,
        "explicit": false,
        "is_local": false,
        "external_ids": { "isrc": "GBAAA9800156" },
        "artists": [{ "name": "Massive Attack" }, { "name": "Elizabeth Fraser" }],
        "album": {
            "id": "49MNmJhZQewjt06rpwp6QR",
            "name": "Mezzanine",
            "release_date": "1998-04-20"
        }
    })
}

#[test]
fn test_every_kind_yields_its_full_column_set_for_an_empty_record() {
    for kind in DatasetKind::ALL {
        let row = flatten(kind, &json!({}), 0);
        assert_eq!(keys(&row), kind.columns(), "column set of {}", kind);
    }
}

#[test]
fn test_column_set_is_identical_across_heterogeneous_records() {
    let records = vec![
        json!({ "added_at": "2024-01-01T10:00:00Z", "track": sample_track() }),
        json!({ "track": null }),
        json!({ "added_at": "2024-01-02T10:00:00Z", "track": { "name": "Only a name" } }),
        json!("not even an object"),
    ];

    let rows = flatten_all(DatasetKind::LikedSongs, &records);
    assert_eq!(rows.len(), 4);
    for row in &rows {
        assert_eq!(keys(row), DatasetKind::LikedSongs.columns());
    }
}

#[test]
fn test_liked_song_row() {
    let record = json!({ "added_at": "2024-01-01T10:00:00Z", "track": sample_track() });
    let row = flatten(DatasetKind::LikedSongs, &record, 0);

    assert_eq!(row["added_at"], json!("2024-01-01T10:00:00Z"));
    assert_eq!(row["track_name"], json!("Teardrop"));
    assert_eq!(row["artist_names"], json!("Massive Attack, Elizabeth Fraser"));
    assert_eq!(row["album_name"], json!("Mezzanine"));
    assert_eq!(row["album_id"], json!("49MNmJhZQewjt06rpwp6QR"));
    assert_eq!(row["release_date"], json!("1998-04-20"));
    assert_eq!(row["isrc"], json!("GBAAA9800156"));
    assert_eq!(row["popularity"], json!(71));
    assert_eq!(row["is_local"], json!(false));
}

#[test]
fn test_missing_track_yields_empty_values() {
    let row = flatten(DatasetKind::PlaylistTracks, &json!({ "track": null }), 0);

    assert_eq!(row["track_name"], Value::Null);
    assert_eq!(row["artist_names"], Value::Null);
    assert_eq!(row["playlist_id"], Value::Null);
    // absent is_local is treated as a regular (non-local) track
    assert_eq!(row["is_local"], json!(false));
}

#[test]
fn test_playlist_row() {
    let record = json!({
        "id": "37i9dQZF1DXcBWIGoYBM5M",
        "name": "Mixed, \"quoted\" name",
        "owner": { "id": "spotify", "display_name": "Spotify" },
        "public": true,
        "collaborative": false,
        "snapshot_id": "MTY4",
        "tracks": { "href": "https://api.spotify.com/v1/playlists/x/tracks", "total": 50 },
        "description": null
    });
    let row = flatten(DatasetKind::Playlists, &record, 0);

    assert_eq!(row["playlist_id"], json!("37i9dQZF1DXcBWIGoYBM5M"));
    assert_eq!(row["playlist_name"], json!("Mixed, \"quoted\" name"));
    assert_eq!(row["owner_display_name"], json!("Spotify"));
    assert_eq!(row["public"], json!(true));
    assert_eq!(row["tracks_total"], json!(50));
    assert_eq!(row["description"], Value::Null);
}

#[test]
fn test_playlist_track_row_uses_attached_playlist_and_added_by() {
    let record = json!({
        "added_at": "2023-05-01T08:00:00Z",
        "added_by": { "id": "some_user", "type": "user" },
        "track": sample_track(),
        "playlist": { "id": "p1", "name": "Road trip" }
    });
    let row = flatten(DatasetKind::PlaylistTracks, &record, 3);

    assert_eq!(row["playlist_id"], json!("p1"));
    assert_eq!(row["playlist_name"], json!("Road trip"));
    assert_eq!(row["added_by"], json!("some_user"));
    assert_eq!(row["type"], json!("track"));
    assert_eq!(row["track_uri"], json!("spotify:track:67Hna13dNDkZvBpTXRIaOJ"));
}

#[test]
fn test_top_lists_rank_by_position() {
    let artists = vec![
        json!({ "id": "a1", "name": "Portishead", "genres": ["trip hop"], "followers": { "total": 10 } }),
        json!({ "id": "a2", "name": "Tricky", "genres": [], "popularity": 55 }),
    ];
    let rows = flatten_all(DatasetKind::TopArtists(TimeRange::LongTerm), &artists);

    assert_eq!(rows[0]["rank"], json!(1));
    assert_eq!(rows[0]["genres"], json!("trip hop"));
    assert_eq!(rows[0]["followers"], json!(10));
    assert_eq!(rows[1]["rank"], json!(2));
    assert_eq!(rows[1]["genres"], json!(""));
    assert_eq!(rows[1]["followers"], Value::Null);

    let tracks = flatten_all(DatasetKind::TopTracks(TimeRange::ShortTerm), &[sample_track()]);
    assert_eq!(tracks[0]["rank"], json!(1));
    assert_eq!(tracks[0]["track_name"], json!("Teardrop"));
    assert_eq!(tracks[0]["duration_ms"], json!(330773));
}

#[test]
fn test_followed_artist_row() {
    let record = json!({
        "id": "6FXMGgJwohJLUSr5nVlf9X",
        "uri": "spotify:artist:6FXMGgJwohJLUSr5nVlf9X",
        "name": "Massive Attack",
        "genres": ["trip hop", "electronica"],
        "followers": { "href": null, "total": 2500000 },
        "popularity": 68
    });
    let row = flatten(DatasetKind::FollowedArtists, &record, 0);

    assert_eq!(row["artist_id"], json!("6FXMGgJwohJLUSr5nVlf9X"));
    assert_eq!(row["genres"], json!("trip hop, electronica"));
    assert_eq!(row["followers"], json!(2500000));
    assert!(!row.contains_key("rank"));
}

#[test]
fn test_saved_album_show_and_episode_rows() {
    let album = json!({
        "added_at": "2022-02-02T02:02:02Z",
        "album": {
            "id": "al1", "name": "Dummy", "uri": "spotify:album:al1", "album_type": "album",
            "release_date": "1994-08-22", "total_tracks": 11, "label": "Go! Beat",
            "popularity": 60, "artists": [{ "name": "Portishead" }]
        }
    });
    let row = flatten(DatasetKind::SavedAlbums, &album, 0);
    assert_eq!(row["album_name"], json!("Dummy"));
    assert_eq!(row["total_tracks"], json!(11));
    assert_eq!(row["artist_names"], json!("Portishead"));
    assert_eq!(row["label"], json!("Go! Beat"));

    let show = json!({
        "added_at": "2022-02-02T02:02:02Z",
        "show": {
            "id": "sh1", "name": "Song Exploder", "uri": "spotify:show:sh1",
            "publisher": "Hrishikesh Hirway", "total_episodes": 250,
            "languages": ["en", "en-US"], "media_type": "audio"
        }
    });
    let row = flatten(DatasetKind::SavedShows, &show, 0);
    assert_eq!(row["show_name"], json!("Song Exploder"));
    assert_eq!(row["languages"], json!("en, en-US"));
    assert_eq!(row["total_episodes"], json!(250));

    let episode = json!({
        "added_at": "2022-02-02T02:02:02Z",
        "episode": {
            "id": "ep1", "name": "Massive Attack - Teardrop", "uri": "spotify:episode:ep1",
            "release_date": "2016-01-01", "duration_ms": 1200000, "explicit": true,
            "show": { "id": "sh1", "name": "Song Exploder" }
        }
    });
    let row = flatten(DatasetKind::SavedEpisodes, &episode, 0);
    assert_eq!(row["episode_name"], json!("Massive Attack - Teardrop"));
    assert_eq!(row["explicit"], json!(true));
    assert_eq!(row["show_id"], json!("sh1"));
}

#[test]
fn test_recently_played_timestamp_is_normalized() {
    let record = json!({
        "played_at": "2024-03-05T14:07:09.123Z",
        "track": sample_track(),
        "context": null
    });
    let row = flatten(DatasetKind::RecentlyPlayed, &record, 0);

    assert_eq!(row["played_at"], json!("2024-03-05 14:07:09"));
    assert_eq!(row["track_id"], json!("67Hna13dNDkZvBpTXRIaOJ"));
    assert_eq!(row["explicit"], json!(false));

    let row = flatten(DatasetKind::RecentlyPlayed, &json!({ "track": null }), 0);
    assert_eq!(row["played_at"], Value::Null);
}

#[test]
fn test_kind_names_round_trip_in_export_order() {
    let names: Vec<&str> = DatasetKind::ALL.iter().map(DatasetKind::name).collect();
    assert_eq!(names.first(), Some(&"playlists"));
    assert_eq!(names.last(), Some(&"recently_played"));
    assert!(names.contains(&"top_artists_6m"));
    assert!(names.contains(&"top_tracks_all"));

    for kind in DatasetKind::ALL {
        assert_eq!(kind.name().parse::<DatasetKind>(), Ok(kind));
    }
    assert!("errors".parse::<DatasetKind>().is_err());
}
