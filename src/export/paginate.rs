use indicatif::ProgressBar;
use serde_json::{Value, json};

use super::{
    kind::DatasetKind,
    source::{Endpoint, LibrarySource, PageRequest},
};
use crate::{spotify::ApiError, utils};

/// Walks one endpoint from its first page until the upstream reports no
/// further page or returns an empty one.
///
/// Items are returned in upstream order. Any failing page aborts the walk;
/// items gathered so far are dropped with it.
///
/// # Arguments
///
/// * `source` - Upstream to read from
/// * `endpoint` - Paginated read operation
/// * `page_size` - Configured page size, clamped per endpoint
/// * `progress` - Spinner updated with the running item count
///
/// # Example
///
/// ```
/// let liked = fetch_all(&client, Endpoint::SavedTracks, None, &ProgressBar::hidden()).await?;
/// println!("{} liked songs", liked.len());
/// ```
pub async fn fetch_all<S: LibrarySource>(
    source: &S,
    endpoint: Endpoint,
    page_size: Option<u32>,
    progress: &ProgressBar,
) -> Result<Vec<Value>, ApiError> {
    let limit = endpoint.page_size(page_size);
    let mut items: Vec<Value> = Vec::new();
    let mut request = PageRequest {
        endpoint,
        limit,
        cursor: None,
    };

    loop {
        let page = source.fetch_page(&request).await?;
        if page.items.is_empty() {
            break;
        }

        items.extend(page.items);
        progress.set_message(format!("Fetched {} items...", items.len()));

        match page.next {
            Some(next) => request.cursor = Some(next),
            None => break,
        }
    }

    Ok(items)
}

/// Fetches every record of a dataset kind.
///
/// Playlist tracks are gathered playlist by playlist; each item gets a
/// `playlist` object (`id`, `name`) attached so the flattened row can name
/// the playlist it came from. Playlists without an id are skipped.
pub async fn fetch_dataset<S: LibrarySource>(
    source: &S,
    kind: DatasetKind,
    page_size: Option<u32>,
    progress: &ProgressBar,
) -> Result<Vec<Value>, ApiError> {
    if kind != DatasetKind::PlaylistTracks {
        return fetch_all(source, Endpoint::for_kind(kind), page_size, progress).await;
    }

    let playlists = fetch_all(source, Endpoint::Playlists, page_size, progress).await?;
    let mut records = Vec::new();

    for playlist in &playlists {
        let Some(id) = utils::lookup(playlist, &["id"]).and_then(Value::as_str) else {
            continue;
        };
        let name = utils::scalar(playlist, &["name"]);

        let items = fetch_all(
            source,
            Endpoint::PlaylistItems(id.to_string()),
            page_size,
            progress,
        )
        .await?;

        records.extend(items.into_iter().map(|mut item| {
            if let Some(object) = item.as_object_mut() {
                object.insert("playlist".to_string(), json!({ "id": id, "name": name }));
            }
            item
        }));
    }

    Ok(records)
}
