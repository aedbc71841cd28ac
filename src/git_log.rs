//! Pure parsing of `git log` output into structured commits.
//!
//! The `git log` invocation itself lives outside this crate; this module only
//! transforms the captured text. [`parse_log`] recovers one [`GitCommit`] per
//! header block, and [`log_range`] computes the revision-range argument the
//! caller passes to git for a since/until selection.

use chrono::{DateTime, FixedOffset};
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{ReleaseToolsError, Result};

/// Git's default author date format, e.g. `Thu Aug 27 10:15:02 2026 +0200`.
const DATE_FORMAT: &str = "%a %b %e %H:%M:%S %Y %z";

/// One commit recovered from `git log` output.
///
/// The message is the raw indented block between this commit's header and the
/// next one; consumers that care about individual lines trim them themselves.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GitCommit {
    pub hash: String,
    pub author_name: String,
    pub author_email: String,
    pub date: DateTime<FixedOffset>,
    pub message: String,
}

/// Parse the stdout of a plain `git log` run.
///
/// Recognizes the default header block (`commit`, optional `Merge:`, `Author:`
/// and `Date:` lines); everything up to the next header is the commit message.
/// An author date that does not parse fails the whole run.
pub fn parse_log(log: &str) -> Result<Vec<GitCommit>> {
    let header = Regex::new(
        r"(?m)^commit (?P<hash>[0-9a-f]{40})$\n(?:^Merge: [0-9a-f]+ [0-9a-f]+$\n)?^Author: (?P<name>[^<]+?) <(?P<email>[^>]+?)>$\n^Date:\s+(?P<date>.+?)$\n",
    )
    .unwrap();

    let matches: Vec<regex::Captures> = header.captures_iter(log).collect();

    let mut result = Vec::new();
    for (i, caps) in matches.iter().enumerate() {
        let whole = match caps.get(0) {
            Some(whole) => whole,
            None => continue,
        };

        let message_end = match matches.get(i + 1).and_then(|next| next.get(0)) {
            Some(next) => next.start(),
            None => log.len(),
        };

        let date_text = group(caps, "date");
        let date = DateTime::parse_from_str(date_text, DATE_FORMAT).map_err(|e| {
            ReleaseToolsError::git_log(format!("Cannot parse commit date '{}': {}", date_text, e))
        })?;

        result.push(GitCommit {
            hash: group(caps, "hash").to_string(),
            author_name: group(caps, "name").trim().to_string(),
            author_email: group(caps, "email").to_string(),
            date,
            message: log[whole.end()..message_end].to_string(),
        });
    }

    debug!(commits = result.len(), "git log parsed");
    Ok(result)
}

/// Revision-range argument for `git log` given optional since/until refs.
///
/// Both absent yields the empty string (full history). An until-only
/// selection yields `<until>^`, since-only `<since>..HEAD`, and both
/// `<since>..<until>`.
pub fn log_range(since: Option<&str>, until: Option<&str>) -> String {
    match (since, until) {
        (None, None) => String::new(),
        (None, Some(until)) => format!("{}^", until),
        (Some(since), None) => format!("{}..HEAD", since),
        (Some(since), Some(until)) => format!("{}..{}", since, until),
    }
}

fn group<'t>(caps: &regex::Captures<'t>, name: &str) -> &'t str {
    caps.name(name).map(|m| m.as_str()).unwrap_or_default()
}
