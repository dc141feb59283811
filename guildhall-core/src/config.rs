use std::env;

/// The default port the server will listen on.
pub const DEFAULT_PORT: u16 = 3001;

/// Runtime configuration, read once from the environment at startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    /// Directory holding the JSON collections, created on first use.
    pub data_dir: String,
    /// Origin the browser frontend is served from. Used for CORS and for
    /// the redirects at the end of the OAuth flow.
    pub frontend_url: String,
    /// Marks the session cookie as secure.
    pub production: bool,
    pub discord: DiscordConfig,
}

impl Config {
    pub fn from_env() -> Self {
        let port = env::var("GUILDHALL_SERVER_PORT")
            .map(|x| x.parse::<u16>().expect("Port must be a number"))
            .unwrap_or(DEFAULT_PORT);

        Self {
            port,
            data_dir: env::var("GUILDHALL_DATA_DIR").unwrap_or_else(|_| "data".to_string()),
            frontend_url: env::var("GUILDHALL_FRONTEND_URL")
                .unwrap_or_else(|_| "http://localhost:3000".to_string()),
            production: env::var("GUILDHALL_ENV").is_ok_and(|x| x == "production"),
            discord: DiscordConfig::from_env(),
        }
    }
}

/// Discord OAuth credentials. Missing values are not fatal at startup; the
/// identity adapter reports itself unconfigured instead.
#[derive(Debug, Clone, Default)]
pub struct DiscordConfig {
    pub client_id: String,
    pub client_secret: String,
    pub redirect_uri: String,
    /// The community whose roles decide the admin flag. Optional.
    pub guild_id: String,
    /// The role granting admin access. Optional.
    pub admin_role_id: String,
}

impl DiscordConfig {
    pub fn from_env() -> Self {
        Self {
            client_id: env::var("DISCORD_CLIENT_ID").unwrap_or_default(),
            client_secret: env::var("DISCORD_CLIENT_SECRET").unwrap_or_default(),
            redirect_uri: env::var("DISCORD_REDIRECT_URI").unwrap_or_default(),
            guild_id: env::var("DISCORD_GUILD_ID").unwrap_or_default(),
            admin_role_id: env::var("DISCORD_ADMIN_ROLE_ID").unwrap_or_default(),
        }
    }

    /// Whether the credentials needed for the login flow are all present.
    pub fn is_configured(&self) -> bool {
        !self.client_id.is_empty() && !self.client_secret.is_empty() && !self.redirect_uri.is_empty()
    }
}
