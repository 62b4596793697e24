//! OAuth helpers
//!
//! Builds the hosted authorization URL and exchanges the returned code for an
//! access token, which is then installed on the client.

use serde::Deserialize;
use tracing::info;

use crate::config::nylas::OAUTH_SCOPE;
use crate::error::{AuthError, NylasError, Result};
use crate::nylas::client::NylasClient;
use crate::nylas::utils::generate_state_id;

/// Token response from the OAuth token endpoint
#[derive(Debug, Deserialize)]
struct TokenResponse {
    #[serde(default)]
    access_token: Option<String>,
    #[serde(default)]
    account_id: Option<String>,
}

fn server_root(api_server: &str) -> &str {
    api_server.trim_end_matches('/')
}

impl NylasClient {
    /// Generate the authorization URL the user should be sent to
    pub fn auth_url(&self, redirect_uri: &str, login_hint: Option<&str>) -> String {
        let config = self.config();
        let state = generate_state_id();

        let mut args = vec![
            ("client_id", config.app_id.as_str()),
            ("redirect_uri", redirect_uri),
            ("response_type", "code"),
            ("scope", OAUTH_SCOPE),
        ];
        if let Some(hint) = login_hint {
            args.push(("login_hint", hint));
        }
        args.push(("state", state.as_str()));

        let query = args
            .iter()
            .map(|(k, v)| format!("{}={}", k, urlencoding::encode(v)))
            .collect::<Vec<_>>()
            .join("&");

        format!("{}/oauth/authorize?{}", server_root(&config.api_server), query)
    }

    /// Exchange an authorization code for an access token
    pub async fn exchange_code(&self, code: &str) -> Result<String> {
        let config = self.config();
        let params = [
            ("client_id", config.app_id.as_str()),
            ("client_secret", config.app_secret.as_str()),
            ("grant_type", "authorization_code"),
            ("code", code),
        ];

        let response = self
            .http_client()
            .post(format!("{}/oauth/token", server_root(&config.api_server)))
            .form(&params)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(NylasError::Auth(AuthError::TokenExchangeFailed {
                message: format!("({}): {}", status, text),
            }));
        }

        let token_response: TokenResponse = response.json().await?;
        let token = token_response.access_token.ok_or_else(|| {
            NylasError::Auth(AuthError::TokenExchangeFailed {
                message: "response did not contain an access_token".to_string(),
            })
        })?;

        info!(
            "Nylas: obtained access token for account {}",
            token_response.account_id.as_deref().unwrap_or("<unknown>")
        );
        self.set_access_token(token.clone()).await;

        Ok(token)
    }
}
