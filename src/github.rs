use anyhow::{Context, Result};
use chrono::{DateTime, Duration, NaiveDate, Utc};
use log::{debug, info, warn};
use reqwest::header::RETRY_AFTER;
use reqwest::{Client, Response, StatusCode};
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration as StdDuration;
use tokio::time::sleep;

use crate::config::Config;
use crate::stats::{LinesReport, sum_week_deltas};

const API_ROOT: &str = "https://api.github.com";
const PAGE_SIZE: usize = 100;

/// Interval between polls of the statistics endpoints and the ceiling on
/// accumulated wait per repository.
const POLL_INTERVAL: StdDuration = StdDuration::from_secs(5);
const POLL_CEILING_SECS: u64 = 60;

/// Line-stat collection re-attempts repositories without data for this many
/// rounds, pausing between repositories to keep API pressure down.
const COLLECT_ROUNDS: usize = 3;
const REPO_PAUSE: StdDuration = StdDuration::from_millis(500);

#[derive(Debug, Clone, Deserialize)]
pub struct Repo {
    pub name: String,
}

#[derive(Deserialize)]
struct CommitItem {
    commit: CommitDetail,
}

#[derive(Deserialize)]
struct CommitDetail {
    author: Option<CommitSignature>,
}

#[derive(Deserialize)]
struct CommitSignature {
    date: Option<DateTime<Utc>>,
}

/// Terminal outcome of polling the code-frequency endpoint. GitHub computes
/// the series asynchronously, so "no data yet" is not the same thing as "no
/// data": a caller seeing `TimedOut` knows the series may still exist.
#[derive(Debug)]
pub enum CodeFrequency {
    /// Non-empty 200 payload of `[week, additions, deletions]` rows.
    Ready(Vec<[i64; 3]>),
    /// Definitive non-200/non-202 status; polling again will not help.
    Failed(StatusCode),
    /// Still computing (or persistently empty) when the wait ceiling hit.
    TimedOut,
}

#[derive(Clone)]
pub struct GithubClient {
    org: Arc<String>,
    token: Arc<String>,
    http: Arc<Client>,
}

impl GithubClient {
    pub fn new(config: &Config) -> Self {
        Self {
            org: Arc::new(config.org.clone()),
            token: Arc::new(config.token.clone()),
            http: Arc::new(Client::new()),
        }
    }

    /// Low-level GET with auth headers; honors Retry-After on 429 with a
    /// small bounded retry before surfacing the status to the caller.
    async fn get(&self, url: &str) -> Result<Response> {
        const MAX_RETRIES: usize = 3;
        let mut attempt = 0usize;

        loop {
            attempt += 1;

            let resp = self
                .http
                .get(url)
                .bearer_auth(&*self.token)
                .header("Accept", "application/vnd.github.v3+json")
                .header("User-Agent", "orgpulse-stats")
                .send()
                .await
                .map_err(|e| anyhow::anyhow!("network error requesting {url}: {e}"))?;

            if resp.status() == StatusCode::TOO_MANY_REQUESTS && attempt < MAX_RETRIES {
                let wait_secs = resp
                    .headers()
                    .get(RETRY_AFTER)
                    .and_then(|v| v.to_str().ok())
                    .and_then(|s| s.parse::<u64>().ok())
                    .unwrap_or(2);
                debug!("rate limited, retrying in {wait_secs}s");
                sleep(StdDuration::from_secs(wait_secs)).await;
                continue;
            }

            return Ok(resp);
        }
    }

    /// Every repository in the organization visible to the token, public and
    /// private. Listing stops at the first non-success status and returns
    /// whatever was accumulated; partial results are acceptable.
    pub async fn list_repos(&self) -> Result<Vec<Repo>> {
        let mut repos = Vec::new();
        let mut page = 1u32;

        loop {
            let url = format!(
                "{API_ROOT}/orgs/{}/repos?type=all&per_page={PAGE_SIZE}&page={page}",
                self.org
            );
            let resp = self.get(&url).await?;
            let status = resp.status();
            if !status.is_success() {
                warn!("repository listing returned HTTP {}", status.as_u16());
                break;
            }

            let batch: Vec<Repo> = resp
                .json()
                .await
                .context("failed to decode repository listing")?;
            if batch.is_empty() {
                break;
            }
            repos.extend(batch);
            page += 1;
        }

        Ok(repos)
    }

    /// Per-date commit counts for one repository over the trailing `days`
    /// window, keyed by UTC calendar date. A non-success page ends the scan
    /// silently with whatever accumulated so far.
    pub async fn daily_commits(&self, repo: &str, days: i64) -> Result<HashMap<NaiveDate, u64>> {
        let since = (Utc::now() - Duration::days(days))
            .format("%Y-%m-%dT%H:%M:%SZ")
            .to_string();

        let mut counts: HashMap<NaiveDate, u64> = HashMap::new();
        let mut page = 1u32;

        loop {
            let url = format!(
                "{API_ROOT}/repos/{}/{repo}/commits?since={since}&per_page={PAGE_SIZE}&page={page}",
                self.org
            );
            let resp = self.get(&url).await?;
            let status = resp.status();
            if !status.is_success() {
                debug!("{repo}: commit listing returned HTTP {}", status.as_u16());
                break;
            }

            let batch: Vec<CommitItem> = resp
                .json()
                .await
                .with_context(|| format!("failed to decode commit listing for {repo}"))?;
            if batch.is_empty() {
                break;
            }

            let batch_len = batch.len();
            for item in batch {
                if let Some(date) = item.commit.author.and_then(|a| a.date) {
                    *counts.entry(date.date_naive()).or_insert(0) += 1;
                }
            }

            if batch_len < PAGE_SIZE {
                break;
            }
            page += 1;
        }

        Ok(counts)
    }

    /// Poll the code-frequency endpoint until it yields data or a terminal
    /// condition. 202 means the computation is still running server-side; an
    /// empty 200 payload means the same thing while the cache warms up.
    pub async fn code_frequency(&self, repo: &str) -> Result<CodeFrequency> {
        let url = format!("{API_ROOT}/repos/{}/{repo}/stats/code_frequency", self.org);
        let mut waited = 0u64;

        while waited < POLL_CEILING_SECS {
            let resp = self.get(&url).await?;
            let status = resp.status();

            if status == StatusCode::OK {
                let rows: Vec<[i64; 3]> = resp
                    .json()
                    .await
                    .with_context(|| format!("failed to decode code frequency for {repo}"))?;
                if !rows.is_empty() {
                    return Ok(CodeFrequency::Ready(rows));
                }
            } else if status != StatusCode::ACCEPTED {
                return Ok(CodeFrequency::Failed(status));
            }

            waited += POLL_INTERVAL.as_secs();
            debug!("{repo}: statistics still computing ({waited}s)");
            sleep(POLL_INTERVAL).await;
        }

        Ok(CodeFrequency::TimedOut)
    }

    /// Merge per-repository daily commit counts across the organization.
    /// Processing order does not affect the result; counts for the same
    /// date simply add up.
    pub async fn collect_daily_activity(
        &self,
        repos: &[Repo],
        days: i64,
    ) -> Result<HashMap<NaiveDate, u64>> {
        let mut merged: HashMap<NaiveDate, u64> = HashMap::new();

        for repo in repos {
            info!("processing {}", repo.name);
            let daily = self.daily_commits(&repo.name, days).await?;
            for (date, count) in daily {
                *merged.entry(date).or_insert(0) += count;
            }
        }

        Ok(merged)
    }

    /// Gather per-repository line totals, re-attempting repositories still
    /// missing data for up to three rounds. Repositories whose series never
    /// turns up non-trivial are left out of the report entirely.
    pub async fn collect_line_stats(&self, repos: &[Repo]) -> Result<LinesReport> {
        let mut report = LinesReport::new();

        for round in 1..=COLLECT_ROUNDS {
            let pending: Vec<&Repo> = repos
                .iter()
                .filter(|r| !report.contains(&r.name))
                .collect();
            if pending.is_empty() {
                break;
            }
            info!("round {round}: {} repositories remaining", pending.len());

            for repo in pending {
                info!("processing {}", repo.name);
                match self.code_frequency(&repo.name).await? {
                    CodeFrequency::Ready(rows) => {
                        let delta = sum_week_deltas(&rows);
                        if delta.is_nontrivial() {
                            info!("  +{} / {}", delta.additions, delta.deletions);
                            report.insert(repo.name.clone(), delta);
                        }
                    }
                    CodeFrequency::Failed(status) => {
                        warn!(
                            "{}: code frequency returned HTTP {}",
                            repo.name,
                            status.as_u16()
                        );
                    }
                    CodeFrequency::TimedOut => {
                        warn!("{}: timed out waiting for statistics", repo.name);
                    }
                }
                sleep(REPO_PAUSE).await;
            }
        }

        info!(
            "repositories with data: {}/{}",
            report.len(),
            repos.len()
        );
        let missing: Vec<&str> = repos
            .iter()
            .filter(|r| !report.contains(&r.name))
            .map(|r| r.name.as_str())
            .collect();
        if !missing.is_empty() {
            warn!("no data for: {}", missing.join(", "));
        }

        Ok(report)
    }
}
