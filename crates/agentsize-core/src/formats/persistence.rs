//! Versioned binary snapshots.
//!
//! Layout:
//!
//! ```text
//! +----------------+---------+---------------------+
//! | magic (8 B)    | version | postcard payload    |
//! +----------------+---------+---------------------+
//! ```
//!
//! Configs use magic `AGSZCFG1`, score sets `AGSZSCR1`. A decoded config is
//! validated before it is returned, so a snapshot can never smuggle in a rule
//! set that an interactive edit would have rejected.

use crate::config::RulesConfig;
use crate::dimension::ScoreSet;
use crate::error::{AgentSizeError, Result};

/// Magic bytes of a config snapshot.
pub const CONFIG_MAGIC: [u8; 8] = *b"AGSZCFG1";

/// Magic bytes of a score set snapshot.
pub const SCORES_MAGIC: [u8; 8] = *b"AGSZSCR1";

/// Current payload version for both snapshot kinds.
pub const FORMAT_VERSION: u8 = 1;

const HEADER_LEN: usize = CONFIG_MAGIC.len() + 1;

fn with_header(magic: [u8; 8], payload: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(HEADER_LEN + payload.len());
    out.extend_from_slice(&magic);
    out.push(FORMAT_VERSION);
    out.extend_from_slice(payload);
    out
}

fn strip_header<'a>(magic: [u8; 8], bytes: &'a [u8], what: &str) -> Result<&'a [u8]> {
    let Some((header, payload)) = bytes.split_at_checked(HEADER_LEN) else {
        return Err(AgentSizeError::Format(format!(
            "{what} snapshot truncated: {} bytes",
            bytes.len()
        )));
    };

    if header[..magic.len()] != magic {
        return Err(AgentSizeError::Format(format!("not a {what} snapshot")));
    }

    let version = header[magic.len()];
    if version != FORMAT_VERSION {
        return Err(AgentSizeError::Format(format!(
            "unsupported {what} snapshot version {version} (expected {FORMAT_VERSION})"
        )));
    }

    Ok(payload)
}

/// Serialize a config to a binary snapshot.
pub fn encode_config(config: &RulesConfig) -> Result<Vec<u8>> {
    let payload = postcard::to_allocvec(config)?;
    Ok(with_header(CONFIG_MAGIC, &payload))
}

/// Parse and validate a config snapshot.
pub fn decode_config(bytes: &[u8]) -> Result<RulesConfig> {
    let payload = strip_header(CONFIG_MAGIC, bytes, "config")?;
    let config: RulesConfig = postcard::from_bytes(payload)?;
    config.validate()?;
    Ok(config)
}

/// Serialize a score set to a binary snapshot.
pub fn encode_scores(scores: &ScoreSet) -> Result<Vec<u8>> {
    let payload = postcard::to_allocvec(scores)?;
    Ok(with_header(SCORES_MAGIC, &payload))
}

/// Parse a score set snapshot. Out-of-range entries are dropped on load.
pub fn decode_scores(bytes: &[u8]) -> Result<ScoreSet> {
    let payload = strip_header(SCORES_MAGIC, bytes, "scores")?;
    Ok(postcard::from_bytes(payload)?)
}
