use anyhow::Result;
use chrono::Utc;
use log::info;
use std::fs;

use orgpulse::config::Config;
use orgpulse::github::GithubClient;
use orgpulse::leaderboard;

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = Config::from_env()?;
    let client = GithubClient::new(&config);

    info!("fetching repositories for {}", config.org);
    let repos = client.list_repos().await?;
    info!("found {} repositories", repos.len());

    let report = client.collect_line_stats(&repos).await?;
    let svg = leaderboard::render_lines_leaderboard(&report, &config.org, Utc::now());

    fs::write("lines-of-code.svg", svg)?;
    println!("Generated lines-of-code.svg");

    Ok(())
}
