use serde_json::{Map, Value};

use super::kind::DatasetKind;
use crate::utils::{join_names, join_strings, lookup, normalize_timestamp, scalar};

/// A flattened record: column name to scalar value, in column order.
pub type Row = Map<String, Value>;

/// Flattens every record of a dataset kind; `rank` columns count from 1.
pub fn flatten_all(kind: DatasetKind, records: &[Value]) -> Vec<Row> {
    records
        .iter()
        .enumerate()
        .map(|(position, record)| flatten(kind, record, position))
        .collect()
}

/// Reduces one upstream record to exactly one row carrying every column of
/// `kind`. Fields the record lacks are `null`.
///
/// `position` is the record's zero-based index in the fetched sequence and
/// only feeds the `rank` of the top lists.
pub fn flatten(kind: DatasetKind, record: &Value, position: usize) -> Row {
    let mut row = RowBuilder::new(kind);

    match kind {
        DatasetKind::Playlists => {
            row.set("playlist_id", scalar(record, &["id"]))
                .set("playlist_name", scalar(record, &["name"]))
                .set("owner_id", scalar(record, &["owner", "id"]))
                .set("owner_display_name", scalar(record, &["owner", "display_name"]))
                .set("public", scalar(record, &["public"]))
                .set("collaborative", scalar(record, &["collaborative"]))
                .set("snapshot_id", scalar(record, &["snapshot_id"]))
                .set("tracks_total", scalar(record, &["tracks", "total"]))
                .set("description", scalar(record, &["description"]));
        }
        DatasetKind::PlaylistTracks => {
            row.set("playlist_id", scalar(record, &["playlist", "id"]))
                .set("playlist_name", scalar(record, &["playlist", "name"]))
                .set("added_at", scalar(record, &["added_at"]))
                .set("added_by", scalar(record, &["added_by", "id"]))
                .set("is_local", is_local(record))
                .set("track_name", scalar(record, &["track", "name"]))
                .set("artist_names", join_names(record, &["track", "artists"], "name"))
                .set("album_name", scalar(record, &["track", "album", "name"]))
                .set("album_id", scalar(record, &["track", "album", "id"]))
                .set("release_date", scalar(record, &["track", "album", "release_date"]))
                .set("track_id", scalar(record, &["track", "id"]))
                .set("track_uri", scalar(record, &["track", "uri"]))
                .set("isrc", scalar(record, &["track", "external_ids", "isrc"]))
                .set("popularity", scalar(record, &["track", "popularity"]))
                .set("type", scalar(record, &["track", "type"]));
        }
        DatasetKind::LikedSongs => {
            row.set("added_at", scalar(record, &["added_at"]))
                .set("track_name", scalar(record, &["track", "name"]))
                .set("artist_names", join_names(record, &["track", "artists"], "name"))
                .set("album_name", scalar(record, &["track", "album", "name"]))
                .set("release_date", scalar(record, &["track", "album", "release_date"]))
                .set("track_id", scalar(record, &["track", "id"]))
                .set("track_uri", scalar(record, &["track", "uri"]))
                .set("isrc", scalar(record, &["track", "external_ids", "isrc"]))
                .set("album_id", scalar(record, &["track", "album", "id"]))
                .set("popularity", scalar(record, &["track", "popularity"]))
                .set("is_local", is_local(record));
        }
        DatasetKind::SavedAlbums => {
            row.set("added_at", scalar(record, &["added_at"]))
                .set("album_name", scalar(record, &["album", "name"]))
                .set("album_id", scalar(record, &["album", "id"]))
                .set("album_uri", scalar(record, &["album", "uri"]))
                .set("album_type", scalar(record, &["album", "album_type"]))
                .set("release_date", scalar(record, &["album", "release_date"]))
                .set("total_tracks", scalar(record, &["album", "total_tracks"]))
                .set("artist_names", join_names(record, &["album", "artists"], "name"))
                .set("label", scalar(record, &["album", "label"]))
                .set("popularity", scalar(record, &["album", "popularity"]));
        }
        DatasetKind::SavedShows => {
            row.set("added_at", scalar(record, &["added_at"]))
                .set("show_name", scalar(record, &["show", "name"]))
                .set("show_id", scalar(record, &["show", "id"]))
                .set("show_uri", scalar(record, &["show", "uri"]))
                .set("publisher", scalar(record, &["show", "publisher"]))
                .set("total_episodes", scalar(record, &["show", "total_episodes"]))
                .set("languages", join_strings(record, &["show", "languages"]))
                .set("media_type", scalar(record, &["show", "media_type"]));
        }
        DatasetKind::SavedEpisodes => {
            row.set("added_at", scalar(record, &["added_at"]))
                .set("episode_name", scalar(record, &["episode", "name"]))
                .set("episode_id", scalar(record, &["episode", "id"]))
                .set("episode_uri", scalar(record, &["episode", "uri"]))
                .set("release_date", scalar(record, &["episode", "release_date"]))
                .set("duration_ms", scalar(record, &["episode", "duration_ms"]))
                .set("explicit", scalar(record, &["episode", "explicit"]))
                .set("show_name", scalar(record, &["episode", "show", "name"]))
                .set("show_id", scalar(record, &["episode", "show", "id"]));
        }
        DatasetKind::FollowedArtists => {
            artist_fields(&mut row, record);
        }
        DatasetKind::TopArtists(_) => {
            row.set("rank", Value::from(position + 1));
            artist_fields(&mut row, record);
        }
        DatasetKind::TopTracks(_) => {
            row.set("rank", Value::from(position + 1))
                .set("track_id", scalar(record, &["id"]))
                .set("track_uri", scalar(record, &["uri"]))
                .set("track_name", scalar(record, &["name"]))
                .set("isrc", scalar(record, &["external_ids", "isrc"]))
                .set("artist_names", join_names(record, &["artists"], "name"))
                .set("album_name", scalar(record, &["album", "name"]))
                .set("album_id", scalar(record, &["album", "id"]))
                .set("release_date", scalar(record, &["album", "release_date"]))
                .set("popularity", scalar(record, &["popularity"]))
                .set("duration_ms", scalar(record, &["duration_ms"]))
                .set("explicit", scalar(record, &["explicit"]));
        }
        DatasetKind::RecentlyPlayed => {
            let played_at = match lookup(record, &["played_at"]).and_then(Value::as_str) {
                Some(raw) => Value::String(normalize_timestamp(raw)),
                None => Value::Null,
            };
            row.set("played_at", played_at)
                .set("track_name", scalar(record, &["track", "name"]))
                .set("artist_names", join_names(record, &["track", "artists"], "name"))
                .set("album_name", scalar(record, &["track", "album", "name"]))
                .set("album_id", scalar(record, &["track", "album", "id"]))
                .set("track_id", scalar(record, &["track", "id"]))
                .set("track_uri", scalar(record, &["track", "uri"]))
                .set("popularity", scalar(record, &["track", "popularity"]))
                .set("duration_ms", scalar(record, &["track", "duration_ms"]))
                .set("explicit", scalar(record, &["track", "explicit"]));
        }
    }

    row.finish()
}

fn artist_fields(row: &mut RowBuilder, artist: &Value) {
    row.set("artist_id", scalar(artist, &["id"]))
        .set("artist_uri", scalar(artist, &["uri"]))
        .set("name", scalar(artist, &["name"]))
        .set("genres", join_strings(artist, &["genres"]))
        .set("followers", scalar(artist, &["followers", "total"]))
        .set("popularity", scalar(artist, &["popularity"]));
}

fn is_local(record: &Value) -> Value {
    Value::Bool(
        lookup(record, &["track", "is_local"])
            .and_then(Value::as_bool)
            .unwrap_or(false),
    )
}

/// Starts from a row with every column of the kind set to `null`, so the
/// column set never depends on the record.
struct RowBuilder {
    row: Row,
}

impl RowBuilder {
    fn new(kind: DatasetKind) -> Self {
        let row = kind
            .columns()
            .iter()
            .map(|column| (column.to_string(), Value::Null))
            .collect();
        Self { row }
    }

    fn set(&mut self, column: &str, value: Value) -> &mut Self {
        debug_assert!(self.row.contains_key(column), "unknown column {}", column);
        if let Some(slot) = self.row.get_mut(column) {
            *slot = value;
        }
        self
    }

    fn finish(self) -> Row {
        self.row
    }
}
