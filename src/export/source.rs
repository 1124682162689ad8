use std::future::Future;

use super::kind::{DatasetKind, TimeRange};
use crate::{
    spotify::ApiError,
    types::{Cursor, Page},
};

/// One upstream paginated read operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Endpoint {
    Playlists,
    PlaylistItems(String),
    SavedTracks,
    SavedAlbums,
    SavedShows,
    SavedEpisodes,
    FollowedArtists,
    TopArtists(TimeRange),
    TopTracks(TimeRange),
    RecentlyPlayed,
}

impl Endpoint {
    /// The endpoint read for a dataset kind. Playlist tracks start from the
    /// playlists and then walk [`Endpoint::PlaylistItems`] per playlist.
    pub fn for_kind(kind: DatasetKind) -> Self {
        match kind {
            DatasetKind::Playlists | DatasetKind::PlaylistTracks => Endpoint::Playlists,
            DatasetKind::LikedSongs => Endpoint::SavedTracks,
            DatasetKind::SavedAlbums => Endpoint::SavedAlbums,
            DatasetKind::SavedShows => Endpoint::SavedShows,
            DatasetKind::SavedEpisodes => Endpoint::SavedEpisodes,
            DatasetKind::FollowedArtists => Endpoint::FollowedArtists,
            DatasetKind::TopArtists(range) => Endpoint::TopArtists(range),
            DatasetKind::TopTracks(range) => Endpoint::TopTracks(range),
            DatasetKind::RecentlyPlayed => Endpoint::RecentlyPlayed,
        }
    }

    /// Largest `limit` the upstream accepts.
    pub fn max_page_size(&self) -> u32 {
        match self {
            Endpoint::PlaylistItems(_) => 100,
            _ => 50,
        }
    }

    /// Configured page size clamped to what the upstream accepts.
    pub fn page_size(&self, configured: Option<u32>) -> u32 {
        let max = self.max_page_size();
        configured.unwrap_or(max).clamp(1, max)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    pub endpoint: Endpoint,
    pub limit: u32,
    /// `None` requests the first page.
    pub cursor: Option<Cursor>,
}

/// Read access to the user's library, one page at a time.
///
/// Implemented by [`SpotifyClient`](crate::spotify::SpotifyClient); the
/// export core depends on nothing else of the upstream API.
pub trait LibrarySource {
    fn fetch_page(&self, request: &PageRequest) -> impl Future<Output = Result<Page, ApiError>>;
}
