//! Time zone resolution.
//!
//! Every timestamp in a timesheet is a naive wall-clock value, so the zone
//! has to be known before a single line can be parsed. The host decides where
//! it comes from; [`resolve_time_zone`] implements the usual lookup chain and
//! [`resolve_time_zone_with`] exposes each input for callers and tests that
//! need to inject them.

use std::fs;
use std::path::Path;

use chrono_tz::Tz;

use crate::error::{Result, TiredError};

/// File holding the system zone name on Debian-style systems.
pub const SYSTEM_TIMEZONE_FILE: &str = "/etc/timezone";

/// Parse an IANA timezone string into `Tz`.
pub fn parse_timezone(s: &str) -> Result<Tz> {
    s.trim()
        .parse::<Tz>()
        .map_err(|_| TiredError::Config(format!("unrecognized time zone '{}'", s.trim())))
}

/// Resolve the zone from the process environment.
///
/// Looks at the `TZ` variable first and falls back to [`SYSTEM_TIMEZONE_FILE`].
///
/// # Errors
///
/// Returns [`TiredError::Config`] if no source yields a zone name or the name
/// is not a valid IANA zone.
pub fn resolve_time_zone() -> Result<Tz> {
    let env = std::env::var("TZ").ok();
    resolve_time_zone_with(None, env.as_deref(), Path::new(SYSTEM_TIMEZONE_FILE))
}

/// Resolve the zone from explicit sources, in priority order.
///
/// * `explicit`: a zone name given by the caller (e.g. a command-line flag)
/// * `env`: the value of `TZ`; a leading `:` is ignored, as libc does
/// * `file`: a file whose trimmed content is a zone name
///
/// Empty values are treated as absent. An `explicit` name that is not a
/// valid zone is an error. A `TZ` value that is not an IANA name (POSIX rules
/// such as `UTC0`, or a path) is logged and skipped, and the file decides.
pub fn resolve_time_zone_with(
    explicit: Option<&str>,
    env: Option<&str>,
    file: &Path,
) -> Result<Tz> {
    if let Some(name) = explicit.map(str::trim).filter(|s| !s.is_empty()) {
        tracing::debug!(timezone = name, "Detected timezone.");
        return parse_timezone(name);
    }

    let env = env
        .map(|s| s.trim().trim_start_matches(':'))
        .filter(|s| !s.is_empty());
    if let Some(name) = env {
        match parse_timezone(name) {
            Ok(tz) => {
                tracing::debug!(timezone = name, "Detected timezone from TZ.");
                return Ok(tz);
            }
            Err(e) => {
                tracing::warn!(tz = name, error = %e, "Ignoring TZ, not an IANA zone name.");
            }
        }
    }

    let raw = fs::read_to_string(file).map_err(|e| {
        TiredError::Config(format!("failed to read '{}': {}", file.display(), e))
    })?;
    let name = raw.trim();
    if name.is_empty() {
        return Err(TiredError::Config(format!(
            "'{}' does not name a time zone",
            file.display()
        )));
    }

    tracing::debug!(timezone = name, path = %file.display(), "Detected timezone.");
    parse_timezone(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn zone_file(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_parse_valid_timezone() {
        assert_eq!(parse_timezone("Europe/Berlin").unwrap(), Tz::Europe__Berlin);
    }

    #[test]
    fn test_parse_invalid_timezone_returns_config_error() {
        let err = parse_timezone("Mars/Olympus_Mons").unwrap_err();
        assert!(matches!(err, TiredError::Config(_)));
        assert!(err.to_string().contains("Mars/Olympus_Mons"));
    }

    #[test]
    fn test_explicit_wins_over_env_and_file() {
        let file = zone_file("Asia/Tokyo\n");
        let tz = resolve_time_zone_with(Some("UTC"), Some("Europe/Paris"), file.path()).unwrap();
        assert_eq!(tz, Tz::UTC);
    }

    #[test]
    fn test_env_with_leading_colon() {
        let file = zone_file("Asia/Tokyo\n");
        let tz = resolve_time_zone_with(None, Some(":Europe/Paris"), file.path()).unwrap();
        assert_eq!(tz, Tz::Europe__Paris);
    }

    #[test]
    fn test_empty_env_falls_back_to_file() {
        let file = zone_file("Asia/Tokyo\n");
        let tz = resolve_time_zone_with(Some("  "), Some(""), file.path()).unwrap();
        assert_eq!(tz, Tz::Asia__Tokyo);
    }

    #[test]
    fn test_missing_file_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = resolve_time_zone_with(None, None, &dir.path().join("timezone")).unwrap_err();
        assert!(matches!(err, TiredError::Config(_)));
    }

    #[test]
    fn test_blank_file_is_config_error() {
        let file = zone_file("\n\n");
        let err = resolve_time_zone_with(None, None, file.path()).unwrap_err();
        assert!(err.to_string().contains("does not name a time zone"));
    }

    #[test]
    fn test_unknown_name_in_file_is_config_error() {
        let file = zone_file("Nowhere/Land\n");
        assert!(resolve_time_zone_with(None, None, file.path()).is_err());
    }

    #[test]
    fn test_posix_tz_falls_back_to_file() {
        let file = zone_file("Europe/Berlin\n");
        let tz = resolve_time_zone_with(None, Some("UTC0"), file.path()).unwrap();
        assert_eq!(tz, Tz::Europe__Berlin);

        let path_tz = Some("/usr/share/zoneinfo/Foo");
        let tz = resolve_time_zone_with(None, path_tz, file.path()).unwrap();
        assert_eq!(tz, Tz::Europe__Berlin);
    }

    #[test]
    fn test_bad_tz_and_missing_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("timezone");
        assert!(resolve_time_zone_with(None, Some("UTC0"), &missing).is_err());
    }

    #[test]
    fn test_bad_explicit_name_does_not_fall_back() {
        let file = zone_file("Europe/Berlin\n");
        let err = resolve_time_zone_with(Some("Mars/Base"), None, file.path()).unwrap_err();
        assert!(err.to_string().contains("Mars/Base"));
    }
}
