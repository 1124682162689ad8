use std::{sync::Arc, time::Duration};

use chrono::Utc;
use reqwest::Client;
use tokio::sync::Mutex;

use crate::{
    config::Config,
    info,
    server::start_api_server,
    types::{PkceToken, Token, TokenResponse},
    utils, warning,
};

/// How long the local callback server waits for the user to grant access.
const AUTH_TIMEOUT: Duration = Duration::from_secs(120);

/// Runs the complete OAuth 2.0 PKCE authentication flow with Spotify.
///
/// This function orchestrates the entire authentication process including:
/// 1. Generating PKCE code verifier and challenge
/// 2. Starting a local callback server
/// 3. Opening the authorization URL in the user's browser
/// 4. Waiting for the OAuth callback
///
/// The obtained token is returned; persisting it is left to the caller's
/// [`TokenManager`](crate::management::TokenManager).
///
/// # Arguments
///
/// * `config` - Client id, redirect URI, scope and callback server address
///
/// # Returns
///
/// - `Ok(Token)` - The freshly exchanged token
/// - `Err(String)` - The HTTP client or callback server could not start, or
///   no token arrived within the timeout
///
/// # Error Handling
///
/// - Browser launch failures result in a warning with manual URL instructions
/// - A callback that never arrives ends the flow after two minutes
///
/// # Example
///
/// ```
/// let token = spotify::auth::authorize(&config).await?;
/// TokenManager::new(token, &config.token_cache_path).persist().await?;
/// ```
pub async fn authorize(config: &Config) -> Result<Token, String> {
    // generate PKCE verifier and challenge
    let code_verifier = utils::generate_code_verifier();
    let code_challenge = utils::generate_code_challenge(&code_verifier);

    let auth_url = authorization_url(config, &code_challenge)?;

    let shared_state: Arc<Mutex<Option<PkceToken>>> = Arc::new(Mutex::new(Some(PkceToken {
        code_verifier,
        token: None,
    })));

    let http = Client::builder()
        .timeout(config.http_timeout)
        .build()
        .map_err(|e| format!("Failed to create HTTP client: {}", e))?;

    let server = start_api_server(
        Arc::clone(&shared_state),
        Arc::new(config.clone()),
        http,
    )
    .await?;

    info!("Waiting for authorization in your browser...");
    if webbrowser::open(&auth_url).is_err() {
        warning!(
            "Failed to open browser. Please navigate to the following URL manually:\n{}",
            auth_url
        )
    }

    let token = wait_for_token(shared_state).await;
    server.abort();

    token.ok_or_else(|| "Authentication failed or timed out.".to_string())
}

/// Builds the Spotify authorization URL for the PKCE flow.
///
/// `show_dialog=true` forces the account chooser so the user can pick which
/// account to export.
pub fn authorization_url(config: &Config, code_challenge: &str) -> Result<String, String> {
    let mut url = reqwest::Url::parse(&config.auth_url)
        .map_err(|e| format!("Invalid authorization URL {}: {}", config.auth_url, e))?;
    url.query_pairs_mut()
        .append_pair("client_id", &config.client_id)
        .append_pair("response_type", "code")
        .append_pair("redirect_uri", &config.redirect_uri)
        .append_pair("code_challenge", code_challenge)
        .append_pair("code_challenge_method", "S256")
        .append_pair("scope", &config.scope)
        .append_pair("show_dialog", "true");
    Ok(url.to_string())
}

/// Polls the shared state once a second until the callback handler stores a
/// token, or [`AUTH_TIMEOUT`] elapses.
async fn wait_for_token(shared_state: Arc<Mutex<Option<PkceToken>>>) -> Option<Token> {
    use std::time::Instant;

    let start = Instant::now();

    while start.elapsed() < AUTH_TIMEOUT {
        let lock = shared_state.lock().await;
        if let Some(pkce_token) = lock.as_ref() {
            if let Some(token) = &pkce_token.token {
                return Some(token.clone());
            }
        }
        drop(lock);
        tokio::time::sleep(Duration::from_secs(1)).await;
    }

    None
}

/// Refreshes an expired access token using a refresh token.
///
/// Exchanges a refresh token for a new access token when the current token
/// has expired. Spotify may or may not rotate the refresh token; when the
/// response omits it the previous refresh token is kept.
///
/// # Arguments
///
/// * `http` - Shared HTTP client
/// * `config` - Token endpoint and client credentials
/// * `refresh_token` - Valid refresh token obtained from previous authentication
///
/// # Returns
///
/// - `Ok(Token)` - New token with fresh access token and updated expiration
/// - `Err(String)` - Network failure, rejected refresh token or malformed body
pub async fn refresh_token(
    http: &Client,
    config: &Config,
    refresh_token: &str,
) -> Result<Token, String> {
    let mut form = vec![
        ("grant_type", "refresh_token"),
        ("refresh_token", refresh_token),
        ("client_id", config.client_id.as_str()),
    ];
    if let Some(secret) = &config.client_secret {
        form.push(("client_secret", secret.as_str()));
    }

    let res = http
        .post(&config.token_url)
        .form(&form)
        .send()
        .await
        .and_then(|r| r.error_for_status())
        .map_err(|e| e.to_string())?;

    let body: TokenResponse = res.json().await.map_err(|e| e.to_string())?;
    Ok(into_token(body, refresh_token))
}

/// Exchanges an authorization code for an access token using PKCE.
///
/// Completes the OAuth 2.0 PKCE flow by exchanging the authorization code
/// received from the callback for an access token. The code verifier proves
/// that the same client that initiated the auth flow is completing it. When a
/// client secret is configured it is sent as well.
///
/// # Arguments
///
/// * `http` - HTTP client used for the token request
/// * `config` - Token endpoint, client id/secret and redirect URI
/// * `code` - Authorization code received from the OAuth callback
/// * `verifier` - PKCE code verifier generated at the start of the flow
///
/// # Errors
///
/// Returns the `reqwest::Error` of a failed request, a non-success status or
/// an undecodable response body.
pub async fn exchange_code_pkce(
    http: &Client,
    config: &Config,
    code: &str,
    verifier: &str,
) -> Result<Token, reqwest::Error> {
    let mut form = vec![
        ("grant_type", "authorization_code"),
        ("client_id", config.client_id.as_str()),
        ("code", code),
        ("code_verifier", verifier),
        ("redirect_uri", config.redirect_uri.as_str()),
    ];
    if let Some(secret) = &config.client_secret {
        form.push(("client_secret", secret.as_str()));
    }

    let res = http
        .post(&config.token_url)
        .form(&form)
        .send()
        .await?
        .error_for_status()?;

    let body: TokenResponse = res.json().await?;
    Ok(into_token(body, ""))
}

fn into_token(body: TokenResponse, previous_refresh_token: &str) -> Token {
    Token {
        access_token: body.access_token,
        refresh_token: body
            .refresh_token
            .unwrap_or_else(|| previous_refresh_token.to_string()),
        scope: body.scope,
        expires_in: body.expires_in,
        obtained_at: Utc::now().timestamp() as u64,
    }
}
