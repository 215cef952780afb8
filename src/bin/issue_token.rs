//! Print a bearer token for local calls against the gated routes.
//!
//! Usage: `issue_token [subject] [ttl-minutes]`

use chrono::TimeDelta;
use order_desk_api::{
    config::AppConfig,
    middleware::auth::{Claims, issue_token},
};

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = AppConfig::from_env()?;

    let mut args = std::env::args().skip(1);
    let subject = args.next().unwrap_or_else(|| "local-dev".to_string());
    let minutes = match args.next() {
        Some(raw) => raw.parse::<i64>()?,
        None => 60,
    };

    let token = issue_token(&config.jwt_secret, &Claims::new(subject, TimeDelta::minutes(minutes)))?;
    println!("{token}");
    Ok(())
}
