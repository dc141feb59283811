pub mod audit;
pub mod config;
pub mod discord;
pub mod models;
pub mod sessions;
pub mod store;
pub mod util;

pub use audit::*;
pub use config::*;
pub use discord::*;
pub use models::*;
pub use sessions::*;
pub use store::*;
pub use util::*;

/// The guildhall system: persisted collections, Discord login, the session
/// table, and the audit trail, shared by every request handler.
pub struct Guildhall {
    pub config: Config,
    pub collections: Collections,
    pub sessions: Sessions,
    pub discord: DiscordAuth,
    pub audit: Audit,
}

impl Guildhall {
    pub fn new(config: Config) -> Self {
        let collections = Collections::new(FsStore::new(&config.data_dir));
        let audit = Audit::new(&collections);

        Self {
            collections,
            audit,
            sessions: Sessions::new(),
            discord: DiscordAuth::new(config.discord.clone()),
            config,
        }
    }
}
