use anyhow::Result;
use chrono::Utc;
use log::info;
use std::fs;

use orgpulse::chart;
use orgpulse::config::Config;
use orgpulse::github::GithubClient;
use orgpulse::stats::{activity_window, bucket_daily};

const WINDOW_DAYS: usize = 90;

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = Config::from_env()?;
    let client = GithubClient::new(&config);

    info!("fetching repositories for {}", config.org);
    let repos = client.list_repos().await?;
    info!("found {} repositories", repos.len());

    let daily = client
        .collect_daily_activity(&repos, WINDOW_DAYS as i64)
        .await?;
    info!("{} days with commits", daily.len());

    let window = activity_window(Utc::now().date_naive(), WINDOW_DAYS);
    let values = bucket_daily(&daily, &window);
    let svg = chart::render_activity_chart(&values);

    fs::write("commit-activity.svg", svg)?;
    println!("Generated commit-activity.svg");

    Ok(())
}
