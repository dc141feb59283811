use log::info;
use reqwest::{Client, StatusCode, Url};
use serde::Deserialize;
use thiserror::Error;

use crate::config::DiscordConfig;

const DISCORD_API: &str = "https://discord.com/api/v10";
const AUTHORIZE_URL: &str = "https://discord.com/api/oauth2/authorize";
const OAUTH_SCOPES: &str = "identify guilds.members.read";

#[derive(Debug, Error)]
pub enum DiscordError {
    /// OAuth credentials are missing from the environment
    #[error("Discord OAuth is not configured")]
    Unconfigured,
    /// Discord rejected the authorization code grant
    #[error("Token exchange was rejected with status {status}")]
    TokenExchange { status: StatusCode },
    #[error("Discord API request failed: {0}")]
    Api(#[from] reqwest::Error),
}

/// The profile Discord reports for a logged-in user, together with the
/// resolved admin flag.
#[derive(Debug, Clone)]
pub struct DiscordUser {
    pub id: String,
    pub username: String,
    pub discriminator: Option<String>,
    pub avatar: Option<String>,
    pub is_admin: bool,
}

/// Wraps the Discord OAuth2 endpoints used by the login flow. No retries and
/// no token caching; every login talks to Discord directly.
pub struct DiscordAuth {
    http: Client,
    config: DiscordConfig,
}

impl DiscordAuth {
    pub fn new(config: DiscordConfig) -> Self {
        Self {
            http: Client::new(),
            config,
        }
    }

    pub fn is_configured(&self) -> bool {
        self.config.is_configured()
    }

    /// Builds the authorization URL the browser is sent to.
    pub fn authorize_url(&self) -> Result<String, DiscordError> {
        if !self.is_configured() {
            return Err(DiscordError::Unconfigured);
        }

        let url = Url::parse_with_params(
            AUTHORIZE_URL,
            &[
                ("client_id", self.config.client_id.as_str()),
                ("redirect_uri", self.config.redirect_uri.as_str()),
                ("response_type", "code"),
                ("scope", OAUTH_SCOPES),
            ],
        )
        .expect("authorize url is valid");

        Ok(url.into())
    }

    /// Exchanges an authorization code for an access token.
    pub async fn exchange_code(&self, code: &str) -> Result<String, DiscordError> {
        let form = [
            ("client_id", self.config.client_id.as_str()),
            ("client_secret", self.config.client_secret.as_str()),
            ("grant_type", "authorization_code"),
            ("code", code),
            ("redirect_uri", self.config.redirect_uri.as_str()),
        ];

        let response = self
            .http
            .post(format!("{DISCORD_API}/oauth2/token"))
            .form(&form)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(DiscordError::TokenExchange {
                status: response.status(),
            });
        }

        let token: TokenResponse = response.json().await?;

        Ok(token.access_token)
    }

    /// Fetches the caller's profile and resolves the admin flag from their
    /// role membership in the configured community.
    pub async fn fetch_user(&self, access_token: &str) -> Result<DiscordUser, DiscordError> {
        let profile: ProfileResponse = self
            .http
            .get(format!("{DISCORD_API}/users/@me"))
            .bearer_auth(access_token)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        let is_admin = self.has_admin_role(access_token).await;

        Ok(DiscordUser {
            id: profile.id,
            username: profile.username,
            discriminator: profile.discriminator,
            avatar: profile.avatar,
            is_admin,
        })
    }

    /// Best-effort role probe: every failure (caller not in the community,
    /// transient error, malformed body) collapses to `false`. This is policy,
    /// not an accident — a broken role lookup must not fail the login.
    async fn has_admin_role(&self, access_token: &str) -> bool {
        if self.config.guild_id.is_empty() || self.config.admin_role_id.is_empty() {
            return false;
        }

        match self.member_roles(access_token).await {
            Ok(roles) => roles.contains(&self.config.admin_role_id),
            Err(e) => {
                info!("role lookup failed, treating user as non-admin: {e}");
                false
            }
        }
    }

    async fn member_roles(&self, access_token: &str) -> Result<Vec<String>, DiscordError> {
        let member: MemberResponse = self
            .http
            .get(format!(
                "{DISCORD_API}/users/@me/guilds/{}/member",
                self.config.guild_id
            ))
            .bearer_auth(access_token)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        Ok(member.roles)
    }
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

#[derive(Debug, Deserialize)]
struct ProfileResponse {
    id: String,
    username: String,
    discriminator: Option<String>,
    avatar: Option<String>,
}

#[derive(Debug, Deserialize)]
struct MemberResponse {
    #[serde(default)]
    roles: Vec<String>,
}

#[cfg(test)]
mod test {
    use super::*;

    fn configured() -> DiscordConfig {
        DiscordConfig {
            client_id: "1234".to_string(),
            client_secret: "secret".to_string(),
            redirect_uri: "http://localhost:3001/api/auth/discord/callback".to_string(),
            guild_id: String::new(),
            admin_role_id: String::new(),
        }
    }

    #[test]
    fn authorize_url_carries_credentials_and_scopes() {
        let auth = DiscordAuth::new(configured());

        let url = auth.authorize_url().unwrap();

        assert!(url.starts_with(AUTHORIZE_URL));
        assert!(url.contains("client_id=1234"));
        assert!(url.contains("response_type=code"));
        assert!(url.contains("scope=identify+guilds.members.read"));
    }

    #[test]
    fn authorize_url_requires_credentials() {
        let auth = DiscordAuth::new(DiscordConfig::default());

        let result = auth.authorize_url();

        assert!(matches!(result, Err(DiscordError::Unconfigured)));
    }

    #[tokio::test]
    async fn role_probe_defaults_to_non_admin_without_targets() {
        let auth = DiscordAuth::new(configured());

        assert!(!auth.has_admin_role("token").await);
    }
}
