//! Resource discovery and deletion polling.

use crate::cf::CfCli;
use crate::config::Config;
use crate::error::{PerfError, Result};
use crate::user::UserContext;
use rand::seq::SliceRandom;
use serde::Deserialize;
use std::time::Instant;

#[derive(Debug, Deserialize)]
struct Listing {
    #[serde(default)]
    resources: Vec<Resource>,
}

#[derive(Debug, Deserialize)]
struct Resource {
    guid: String,
}

/// Extracts `resources[*].guid` from a v3 listing body.
pub fn parse_guids(path: &str, body: &str) -> Result<Vec<String>> {
    let listing: Listing = serde_json::from_str(body).map_err(|source| PerfError::Json {
        path: path.to_string(),
        source,
    })?;
    Ok(listing.resources.into_iter().map(|r| r.guid).collect())
}

/// Lists `path` as `ctx` and returns the GUIDs of the first page.
///
/// An empty listing is an error: every caller needs something to target.
pub async fn get_guids(
    cli: &CfCli,
    ctx: &UserContext,
    config: &Config,
    path: &str,
) -> Result<Vec<String>> {
    let output = cli.curl(ctx, &[path], config.basic_timeout).await?;
    let guids = parse_guids(path, &output.stdout)?;
    if guids.is_empty() {
        return Err(PerfError::EmptyListing {
            path: path.to_string(),
        });
    }
    tracing::debug!("{} returned {} guids", path, guids.len());
    Ok(guids)
}

/// Picks one GUID uniformly at random.
pub fn pick_random(guids: &[String]) -> Option<&str> {
    guids.choose(&mut rand::thread_rng()).map(String::as_str)
}

/// Lists `path` and returns one random GUID from it.
pub async fn random_guid(
    cli: &CfCli,
    ctx: &UserContext,
    config: &Config,
    path: &str,
) -> Result<String> {
    let guids = get_guids(cli, ctx, config, path).await?;
    pick_random(&guids)
        .map(str::to_string)
        .ok_or_else(|| PerfError::EmptyListing {
            path: path.to_string(),
        })
}

/// Polls `cf curl --fail <path>` until it fails, for at most `long_timeout`.
pub async fn wait_to_fail(
    cli: &CfCli,
    ctx: &UserContext,
    config: &Config,
    path: &str,
) -> Result<()> {
    let start = Instant::now();
    loop {
        if !cli.curl_succeeds(ctx, path, config.basic_timeout).await? {
            tracing::debug!("{} gone after {:?}", path, start.elapsed());
            return Ok(());
        }
        if start.elapsed() >= config.long_timeout {
            return Err(PerfError::StillPresent {
                path: path.to_string(),
                timeout: config.long_timeout,
            });
        }
        tokio::time::sleep(config.poll_interval).await;
    }
}
