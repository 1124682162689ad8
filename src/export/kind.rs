use std::{fmt, str::FromStr};

/// Time window of the personal top lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimeRange {
    ShortTerm,
    MediumTerm,
    LongTerm,
}

impl TimeRange {
    /// Value of the `time_range` query parameter.
    pub fn as_str(&self) -> &'static str {
        match self {
            TimeRange::ShortTerm => "short_term",
            TimeRange::MediumTerm => "medium_term",
            TimeRange::LongTerm => "long_term",
        }
    }
}

const PLAYLIST_COLUMNS: &[&str] = &[
    "playlist_id",
    "playlist_name",
    "owner_id",
    "owner_display_name",
    "public",
    "collaborative",
    "snapshot_id",
    "tracks_total",
    "description",
];

const PLAYLIST_TRACK_COLUMNS: &[&str] = &[
    "playlist_id",
    "playlist_name",
    "added_at",
    "added_by",
    "is_local",
    "track_name",
    "artist_names",
    "album_name",
    "album_id",
    "release_date",
    "track_id",
    "track_uri",
    "isrc",
    "popularity",
    "type",
];

const LIKED_SONG_COLUMNS: &[&str] = &[
    "added_at",
    "track_name",
    "artist_names",
    "album_name",
    "release_date",
    "track_id",
    "track_uri",
    "isrc",
    "album_id",
    "popularity",
    "is_local",
];

const SAVED_ALBUM_COLUMNS: &[&str] = &[
    "added_at",
    "album_name",
    "album_id",
    "album_uri",
    "album_type",
    "release_date",
    "total_tracks",
    "artist_names",
    "label",
    "popularity",
];

const SAVED_SHOW_COLUMNS: &[&str] = &[
    "added_at",
    "show_name",
    "show_id",
    "show_uri",
    "publisher",
    "total_episodes",
    "languages",
    "media_type",
];

const SAVED_EPISODE_COLUMNS: &[&str] = &[
    "added_at",
    "episode_name",
    "episode_id",
    "episode_uri",
    "release_date",
    "duration_ms",
    "explicit",
    "show_name",
    "show_id",
];

const FOLLOWED_ARTIST_COLUMNS: &[&str] = &[
    "artist_id",
    "artist_uri",
    "name",
    "genres",
    "followers",
    "popularity",
];

const TOP_ARTIST_COLUMNS: &[&str] = &[
    "rank",
    "artist_id",
    "artist_uri",
    "name",
    "genres",
    "followers",
    "popularity",
];

const TOP_TRACK_COLUMNS: &[&str] = &[
    "rank",
    "track_id",
    "track_uri",
    "track_name",
    "isrc",
    "artist_names",
    "album_name",
    "album_id",
    "release_date",
    "popularity",
    "duration_ms",
    "explicit",
];

const RECENTLY_PLAYED_COLUMNS: &[&str] = &[
    "played_at",
    "track_name",
    "artist_names",
    "album_name",
    "album_id",
    "track_id",
    "track_uri",
    "popularity",
    "duration_ms",
    "explicit",
];

/// One exported category of library data.
///
/// Every kind maps to one paginated upstream read, one fixed column set and
/// one output basename.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DatasetKind {
    Playlists,
    PlaylistTracks,
    LikedSongs,
    SavedAlbums,
    SavedShows,
    SavedEpisodes,
    FollowedArtists,
    TopArtists(TimeRange),
    TopTracks(TimeRange),
    RecentlyPlayed,
}

impl DatasetKind {
    /// Every kind, in export order.
    pub const ALL: [DatasetKind; 14] = [
        DatasetKind::Playlists,
        DatasetKind::PlaylistTracks,
        DatasetKind::LikedSongs,
        DatasetKind::SavedAlbums,
        DatasetKind::SavedShows,
        DatasetKind::SavedEpisodes,
        DatasetKind::FollowedArtists,
        DatasetKind::TopArtists(TimeRange::ShortTerm),
        DatasetKind::TopArtists(TimeRange::MediumTerm),
        DatasetKind::TopArtists(TimeRange::LongTerm),
        DatasetKind::TopTracks(TimeRange::ShortTerm),
        DatasetKind::TopTracks(TimeRange::MediumTerm),
        DatasetKind::TopTracks(TimeRange::LongTerm),
        DatasetKind::RecentlyPlayed,
    ];

    /// Output basename, also used as the dataset name in `errors.csv`.
    pub fn name(&self) -> &'static str {
        match self {
            DatasetKind::Playlists => "playlists",
            DatasetKind::PlaylistTracks => "playlist_tracks",
            DatasetKind::LikedSongs => "liked_songs",
            DatasetKind::SavedAlbums => "saved_albums",
            DatasetKind::SavedShows => "saved_shows",
            DatasetKind::SavedEpisodes => "saved_episodes",
            DatasetKind::FollowedArtists => "followed_artists",
            DatasetKind::TopArtists(TimeRange::ShortTerm) => "top_artists_4w",
            DatasetKind::TopArtists(TimeRange::MediumTerm) => "top_artists_6m",
            DatasetKind::TopArtists(TimeRange::LongTerm) => "top_artists_all",
            DatasetKind::TopTracks(TimeRange::ShortTerm) => "top_tracks_4w",
            DatasetKind::TopTracks(TimeRange::MediumTerm) => "top_tracks_6m",
            DatasetKind::TopTracks(TimeRange::LongTerm) => "top_tracks_all",
            DatasetKind::RecentlyPlayed => "recently_played",
        }
    }

    pub fn columns(&self) -> &'static [&'static str] {
        match self {
            DatasetKind::Playlists => PLAYLIST_COLUMNS,
            DatasetKind::PlaylistTracks => PLAYLIST_TRACK_COLUMNS,
            DatasetKind::LikedSongs => LIKED_SONG_COLUMNS,
            DatasetKind::SavedAlbums => SAVED_ALBUM_COLUMNS,
            DatasetKind::SavedShows => SAVED_SHOW_COLUMNS,
            DatasetKind::SavedEpisodes => SAVED_EPISODE_COLUMNS,
            DatasetKind::FollowedArtists => FOLLOWED_ARTIST_COLUMNS,
            DatasetKind::TopArtists(_) => TOP_ARTIST_COLUMNS,
            DatasetKind::TopTracks(_) => TOP_TRACK_COLUMNS,
            DatasetKind::RecentlyPlayed => RECENTLY_PLAYED_COLUMNS,
        }
    }
}

impl fmt::Display for DatasetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for DatasetKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DatasetKind::ALL
            .into_iter()
            .find(|kind| kind.name() == s)
            .ok_or_else(|| format!("unknown dataset '{}'", s))
    }
}
