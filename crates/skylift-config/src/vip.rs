//! VIP declaration expansion.
//!
//! A VIP declaration is a comma-separated list of hosts, each optionally
//! carrying a numeric range:
//!
//! ```text
//! vip-backend[001-016]
//! 10.19.199.[250-252]
//! vip1,vip2,vip3
//! ```
//!
//! Expansion yields an ordered label map `VIP_0 → host, VIP_1 → host, ...`
//! with zero-padding preserved. Name resolution of the expanded hosts is
//! the upstream validator's concern.

use std::collections::BTreeMap;

use regex::Regex;

use crate::error::{ConfigError, ConfigResult};

/// Expand a VIP declaration into its `VIP_n` label map.
pub fn expand_vips(decl: &str) -> ConfigResult<BTreeMap<String, String>> {
    let invalid = |reason: &str| ConfigError::InvalidVip {
        decl: decl.to_string(),
        reason: reason.to_string(),
    };

    if decl.trim().is_empty() {
        return Err(invalid("declaration is empty"));
    }

    let range_re = Regex::new(r"^([^\[\]]*)\[(\d+)-(\d+)\]([^\[\]]*)$")
        .map_err(|e| invalid(&e.to_string()))?;

    let mut hosts = Vec::new();
    for entry in decl.split(',') {
        let entry = entry.trim();
        if entry.is_empty() {
            return Err(invalid("empty entry"));
        }
        if !entry.contains('[') && !entry.contains(']') {
            hosts.push(entry.to_string());
            continue;
        }
        let caps = range_re
            .captures(entry)
            .ok_or_else(|| invalid("malformed range"))?;
        let (prefix, start_str, end_str, suffix) = (&caps[1], &caps[2], &caps[3], &caps[4]);
        let start: u64 = start_str.parse().map_err(|_| invalid("range start"))?;
        let end: u64 = end_str.parse().map_err(|_| invalid("range end"))?;
        if start > end {
            return Err(invalid("range start exceeds range end"));
        }
        let width = start_str.len();
        for n in start..=end {
            hosts.push(format!("{prefix}{n:0width$}{suffix}"));
        }
    }

    Ok(hosts
        .into_iter()
        .enumerate()
        .map(|(n, host)| (format!("VIP_{n}"), host))
        .collect())
}
