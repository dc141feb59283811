use guildhall_core::{Config, Guildhall};
use guildhall_server::{init_logger, run_server};
use log::warn;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    init_logger();

    let config = Config::from_env();

    if !config.discord.is_configured() {
        warn!("Discord OAuth is not configured, logins are disabled until the DISCORD_* variables are set");
    }

    run_server(Guildhall::new(config)).await
}
