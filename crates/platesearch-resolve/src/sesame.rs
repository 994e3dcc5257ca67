//! Object-name resolution through the CDS Sesame service.
//!
//! Sesame answers `GET <base>?<name>` with a plain-text report. The line
//! starting with `%J` carries the J2000 position in decimal degrees:
//!
//! ```text
//! %J 83.63308333 +22.01450000 = 05:34:31.94 +22:00:52.2
//! ```

use anyhow::Context;
use reqwest::blocking::Client;
use reqwest::Url;
use std::time::Duration;
use tracing::{debug, info};

use platesearch_core::error::CoordinateError;
use platesearch_core::traits::NameResolver;
use platesearch_core::types::SkyPosition;

pub struct SesameResolver {
    client: Client,
    base_url: Url,
}

impl SesameResolver {
    /// Must not be called from inside an async runtime; the blocking client
    /// owns its own.
    pub fn new(base_url: &str, timeout: Duration) -> anyhow::Result<Self> {
        let base_url = Url::parse(base_url).with_context(|| format!("invalid Sesame url '{base_url}'"))?;
        let client = Client::builder().timeout(timeout).build().context("failed to build Sesame client")?;
        Ok(Self { client, base_url })
    }

    fn fetch(&self, name: &str) -> anyhow::Result<String> {
        let mut url = self.base_url.clone();
        url.set_query(Some(name));
        debug!(%url, "querying Sesame");
        let response = self.client.get(url).send()?;
        let status = response.status();
        let body = response.text()?;
        if status.is_client_error() || status.is_server_error() {
            anyhow::bail!("Error: {}: {}", status, body);
        }
        Ok(body)
    }
}

/// First `%J` position in a Sesame report.
pub fn parse_sesame(body: &str) -> Option<SkyPosition> {
    body.lines().find_map(|line| {
        let mut parts = line.strip_prefix("%J")?.split_whitespace();
        let ra_deg = parts.next()?.parse::<f64>().ok()?;
        let dec_deg = parts.next()?.parse::<f64>().ok()?;
        Some(SkyPosition { ra_deg, dec_deg })
    })
}

impl NameResolver for SesameResolver {
    fn resolve(&self, name: &str) -> Result<SkyPosition, CoordinateError> {
        let unresolved = |reason: String| CoordinateError::Unresolved { name: name.to_string(), reason };
        let body = self.fetch(name).map_err(|e| unresolved(format!("{e:#}")))?;
        let position = parse_sesame(&body).ok_or_else(|| unresolved("no position in Sesame response".to_string()))?;
        info!(object = name, ra = position.ra_deg, dec = position.dec_deg, "Sesame resolved object");
        Ok(position)
    }
}
