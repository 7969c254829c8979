use semver::Version;
use std::cmp::Ordering;

/// Order two release tags by semantic version.
///
/// Tags that do not parse as versions sort below every version tag and
/// compare lexically among themselves.
pub fn compare_versions(a: &str, b: &str) -> Ordering {
    match (parse_version(a), parse_version(b)) {
        (Some(va), Some(vb)) => va.cmp(&vb),
        (Some(_), None) => Ordering::Greater,
        (None, Some(_)) => Ordering::Less,
        (None, None) => a.cmp(b),
    }
}

pub fn is_version_like(input: &str) -> bool {
    parse_version(input).is_some()
}

/// Lenient semver parse: accepts a `v` prefix and pads missing minor/patch
/// segments, so `v2`, `1.4` and `1.4.0-beta.1` are all versions.
pub(crate) fn parse_version(input: &str) -> Option<Version> {
    let core = input.trim();
    let core = core
        .strip_prefix('v')
        .or_else(|| core.strip_prefix('V'))
        .unwrap_or(core);

    if let Ok(version) = Version::parse(core) {
        return Some(version);
    }

    let split_at = core.find(['-', '+']).unwrap_or(core.len());
    let (numbers, suffix) = core.split_at(split_at);
    let segments: Vec<&str> = numbers.split('.').collect();
    if segments.is_empty()
        || segments.len() > 3
        || segments
            .iter()
            .any(|s| s.is_empty() || !s.chars().all(|c| c.is_ascii_digit()))
    {
        return None;
    }

    let mut padded: Vec<String> = segments
        .iter()
        .map(|s| s.parse::<u64>().map(|n| n.to_string()))
        .collect::<Result<_, _>>()
        .ok()?;
    while padded.len() < 3 {
        padded.push("0".to_string());
    }

    Version::parse(&format!("{}{}", padded.join("."), suffix)).ok()
}
