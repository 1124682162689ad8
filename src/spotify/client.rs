use std::{fmt, time::Duration};

use reqwest::{Client, Response, StatusCode, Url};
use serde_json::Value;
use tokio::{sync::Mutex, time::sleep};

use crate::{
    config::Config,
    export::{Endpoint, LibrarySource, PageRequest},
    management::TokenManager,
    types::{Cursor, Page, UserProfile},
    warning,
};

const MAX_RETRIES: u32 = 3;
const MAX_RETRY_AFTER_SECS: u64 = 120;
const BAD_GATEWAY_DELAY: Duration = Duration::from_secs(10);

#[derive(Debug)]
pub enum ApiError {
    Transport(reqwest::Error),
    /// 401: the access token is invalid or expired.
    Unauthorized(String),
    /// 403: usually a scope the token was not granted.
    Forbidden(String),
    Status { status: u16, message: String },
    Decode(String),
    InvalidRequest(String),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Transport(e) => write!(f, "request failed: {}", e),
            ApiError::Unauthorized(msg) => write!(f, "unauthorized (401): {}", msg),
            ApiError::Forbidden(msg) => {
                write!(f, "permission denied (403), missing scope?: {}", msg)
            }
            ApiError::Status { status, message } => write!(f, "HTTP {}: {}", status, message),
            ApiError::Decode(msg) => write!(f, "malformed response: {}", msg),
            ApiError::InvalidRequest(msg) => write!(f, "invalid request: {}", msg),
        }
    }
}

impl std::error::Error for ApiError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ApiError::Transport(e) => Some(e),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        ApiError::Transport(err)
    }
}

/// Authenticated Spotify Web API client.
///
/// Holds the one HTTP client used for the whole run together with the token
/// manager, so every request carries a current access token.
pub struct SpotifyClient {
    http: Client,
    config: Config,
    tokens: Mutex<TokenManager>,
}

impl SpotifyClient {
    /// Creates the client with the configured request timeout.
    ///
    /// # Errors
    ///
    /// Fails if the TLS backend cannot be initialized.
    pub fn new(config: Config, tokens: TokenManager) -> Result<Self, ApiError> {
        let http = Client::builder().timeout(config.http_timeout).build()?;
        Ok(Self {
            http,
            config,
            tokens: Mutex::new(tokens),
        })
    }

    /// Retrieves the profile of the authenticated user (`GET /me`).
    ///
    /// Called once before exporting; it is the cheapest way to learn whether
    /// the cached credential is usable at all.
    pub async fn current_user(&self) -> Result<UserProfile, ApiError> {
        let url = self.url(&["me"])?;
        let body = self.get_json(url).await?;
        serde_json::from_value(body).map_err(|e| ApiError::Decode(e.to_string()))
    }

    /// Builds the URL for one page request.
    ///
    /// Offset endpoints start at offset 0; cursor endpoints omit the cursor
    /// on the first page.
    pub fn page_url(&self, request: &PageRequest) -> Result<Url, ApiError> {
        let mut url = match &request.endpoint {
            Endpoint::Playlists => self.url(&["me", "playlists"])?,
            Endpoint::PlaylistItems(id) => self.url(&["playlists", id.as_str(), "tracks"])?,
            Endpoint::SavedTracks => self.url(&["me", "tracks"])?,
            Endpoint::SavedAlbums => self.url(&["me", "albums"])?,
            Endpoint::SavedShows => self.url(&["me", "shows"])?,
            Endpoint::SavedEpisodes => self.url(&["me", "episodes"])?,
            Endpoint::FollowedArtists => self.url(&["me", "following"])?,
            Endpoint::TopArtists(_) => self.url(&["me", "top", "artists"])?,
            Endpoint::TopTracks(_) => self.url(&["me", "top", "tracks"])?,
            Endpoint::RecentlyPlayed => self.url(&["me", "player", "recently-played"])?,
        };

        {
            let mut query = url.query_pairs_mut();
            query.append_pair("limit", &request.limit.to_string());

            match &request.endpoint {
                Endpoint::FollowedArtists => {
                    query.append_pair("type", "artist");
                }
                Endpoint::TopArtists(range) | Endpoint::TopTracks(range) => {
                    query.append_pair("time_range", range.as_str());
                }
                Endpoint::PlaylistItems(_) => {
                    query.append_pair("additional_types", "track");
                }
                _ => {}
            }

            match &request.cursor {
                Some(Cursor::Offset(offset)) => {
                    query.append_pair("offset", &offset.to_string());
                }
                Some(Cursor::After(after)) => {
                    query.append_pair("after", after);
                }
                Some(Cursor::Before(before)) => {
                    query.append_pair("before", before);
                }
                None if uses_offset(&request.endpoint) => {
                    query.append_pair("offset", "0");
                }
                None => {}
            }
        }

        Ok(url)
    }

    fn url(&self, segments: &[&str]) -> Result<Url, ApiError> {
        let mut url = Url::parse(&self.config.api_url)
            .map_err(|e| ApiError::InvalidRequest(format!("{}: {}", self.config.api_url, e)))?;
        url.path_segments_mut()
            .map_err(|_| {
                ApiError::InvalidRequest(format!("{} cannot be a base URL", self.config.api_url))
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Sends an authenticated GET and decodes the JSON body.
    ///
    /// # Retry Logic
    ///
    /// - 429 responses wait for `Retry-After` (up to two minutes) and retry
    /// - 502 responses wait ten seconds and retry
    ///
    /// Both are bounded to three retries; everything else is returned to the
    /// caller as-is.
    async fn get_json(&self, url: Url) -> Result<Value, ApiError> {
        let mut attempts = 0;

        loop {
            let token = self
                .tokens
                .lock()
                .await
                .get_valid_token(&self.http, &self.config)
                .await;

            let response = self.http.get(url.clone()).bearer_auth(token).send().await?;
            let status = response.status();

            if status.is_success() {
                return response
                    .json::<Value>()
                    .await
                    .map_err(|e| ApiError::Decode(e.to_string()));
            }

            if attempts < MAX_RETRIES {
                if status == StatusCode::TOO_MANY_REQUESTS {
                    let retry_after = retry_after_secs(&response);
                    if retry_after <= MAX_RETRY_AFTER_SECS {
                        attempts += 1;
                        sleep(Duration::from_secs(retry_after)).await;
                        continue;
                    }
                    warning!(
                        "Retry after has reached an abnormal high of {} seconds. Try again later.",
                        retry_after
                    );
                } else if status == StatusCode::BAD_GATEWAY {
                    attempts += 1;
                    sleep(BAD_GATEWAY_DELAY).await;
                    continue;
                }
            }

            return Err(status_error(status, response).await);
        }
    }
}

impl LibrarySource for SpotifyClient {
    async fn fetch_page(&self, request: &PageRequest) -> Result<Page, ApiError> {
        let url = self.page_url(request)?;
        let body = self.get_json(url).await?;
        parse_page(request, body)
    }
}

fn uses_offset(endpoint: &Endpoint) -> bool {
    !matches!(
        endpoint,
        Endpoint::FollowedArtists | Endpoint::RecentlyPlayed
    )
}

/// Decodes a paging object into a [`Page`].
///
/// Followed artists are wrapped in an `artists` object and page with an
/// `after` cursor, recently played pages backwards with `before`, every other
/// endpoint pages by offset. A non-null `next` link is the only signal that
/// another page exists.
pub fn parse_page(request: &PageRequest, body: Value) -> Result<Page, ApiError> {
    let mut container = match &request.endpoint {
        Endpoint::FollowedArtists => match body {
            Value::Object(mut map) => map
                .remove("artists")
                .ok_or_else(|| ApiError::Decode("missing 'artists' object".to_string()))?,
            _ => return Err(ApiError::Decode("expected a JSON object".to_string())),
        },
        _ => body,
    };

    let items = match container.get_mut("items").map(Value::take) {
        Some(Value::Array(items)) => items,
        Some(Value::Null) => Vec::new(),
        Some(_) => return Err(ApiError::Decode("'items' is not an array".to_string())),
        None => return Err(ApiError::Decode("missing 'items'".to_string())),
    };

    let has_next = container.get("next").is_some_and(|next| !next.is_null());
    let cursor = |key: &str| {
        container
            .get("cursors")
            .and_then(|cursors| cursors.get(key))
            .and_then(Value::as_str)
            .map(str::to_string)
    };

    let next = if !has_next {
        None
    } else {
        match &request.endpoint {
            Endpoint::FollowedArtists => cursor("after").map(Cursor::After),
            Endpoint::RecentlyPlayed => cursor("before").map(Cursor::Before),
            _ => {
                let offset = match &request.cursor {
                    Some(Cursor::Offset(offset)) => *offset,
                    _ => 0,
                };
                Some(Cursor::Offset(offset + request.limit))
            }
        }
    };

    Ok(Page {
        items,
        next,
        total: container.get("total").and_then(Value::as_u64),
    })
}

fn retry_after_secs(response: &Response) -> u64 {
    response
        .headers()
        .get("retry-after")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.trim().parse::<u64>().ok())
        .unwrap_or(1)
}

/// Maps a failed response to an error, using Spotify's
/// `{"error": {"message": ...}}` body when there is one.
async fn status_error(status: StatusCode, response: Response) -> ApiError {
    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<Value>(&body)
        .ok()
        .and_then(|json| {
            json.pointer("/error/message")
                .or_else(|| json.pointer("/error_description"))
                .or_else(|| json.get("error"))
                .and_then(Value::as_str)
                .map(str::to_string)
        })
        .unwrap_or_else(|| {
            status
                .canonical_reason()
                .unwrap_or("unexpected status")
                .to_string()
        });

    match status {
        StatusCode::UNAUTHORIZED => ApiError::Unauthorized(message),
        StatusCode::FORBIDDEN => ApiError::Forbidden(message),
        _ => ApiError::Status {
            status: status.as_u16(),
            message,
        },
    }
}
