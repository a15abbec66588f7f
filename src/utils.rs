//! Helpers for date ranges, paths and logging.
//!
//! - Parsing the `--date` flag into a list of calendar days
//! - Walking a date range while collecting per-date failures
//! - Date-partitioned directory names (`YYYYMMDD`)
//! - `~` expansion and output directory validation
//! - String truncation for log fields

use crate::errors::{BatchFailure, NewsError, Result};
use chrono::{DateTime, FixedOffset, Local, NaiveDate, NaiveTime, TimeZone};
use std::fs as stdfs;
use std::future::Future;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{error, info, instrument};

/// Format of `--date` values and of date directory names.
pub const DATE_FLAG_FORMAT: &str = "%Y%m%d";

/// Expand the values of a `--date` flag into the days to process.
///
/// One value selects a single day. Two values select an inclusive daily
/// range; a reversed pair is swapped.
///
/// # Errors
///
/// Returns [`NewsError::Configuration`] when no value or more than two values
/// are given, or when a value is not a `YYYYmmdd` date.
pub fn expand_dates(values: &[String]) -> Result<Vec<NaiveDate>> {
    match values {
        [] => Err(NewsError::Configuration(
            "one or two date values must be specified".to_string(),
        )),
        [day] => Ok(vec![parse_date(day)?]),
        [since, until] => {
            let mut since = parse_date(since)?;
            let mut until = parse_date(until)?;
            if since > until {
                std::mem::swap(&mut since, &mut until);
            }
            Ok(since.iter_days().take_while(|d| *d <= until).collect())
        }
        _ => Err(NewsError::Configuration(
            "more than 2 values cannot be specified for date".to_string(),
        )),
    }
}

fn parse_date(value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), DATE_FLAG_FORMAT).map_err(|e| {
        NewsError::Configuration(format!("cannot parse '{value}' as YYYYmmdd: {e}"))
    })
}

/// Directory name of a date partition, e.g. `20240102`.
pub fn date_key(date: NaiveDate) -> String {
    date.format(DATE_FLAG_FORMAT).to_string()
}

/// Midnight of `date` in the local time zone.
///
/// On days where local midnight does not exist, the UTC reading of the same
/// wall-clock time is used.
pub fn start_of_day(date: NaiveDate) -> DateTime<FixedOffset> {
    let naive = date.and_time(NaiveTime::MIN);
    Local
        .from_local_datetime(&naive)
        .earliest()
        .unwrap_or_else(|| Local.from_utc_datetime(&naive))
        .fixed_offset()
}

/// Run `job` for every date, continuing past failures.
///
/// Fatal errors (see [`NewsError::is_fatal`]) stop the walk immediately.
/// Other failures are logged, collected and returned together as
/// [`NewsError::Batch`] once every date has been attempted.
///
/// # Returns
///
/// The number of dates processed when all of them succeeded.
#[instrument(level = "info", skip_all, fields(dates = dates.len()))]
pub async fn for_each_date<F, Fut>(dates: &[NaiveDate], mut job: F) -> Result<usize>
where
    F: FnMut(NaiveDate) -> Fut,
    Fut: Future<Output = Result<()>>,
{
    let mut batch = BatchFailure {
        attempted: dates.len(),
        failures: Vec::new(),
    };

    for &date in dates {
        match job(date).await {
            Ok(()) => info!(date = %date_key(date), "Date processed"),
            Err(e) if e.is_fatal() => return Err(e),
            Err(e) => {
                error!(date = %date_key(date), error = %e, "Date failed");
                batch.failures.push((date, e));
            }
        }
    }

    info!(
        attempted = batch.attempted,
        succeeded = batch.succeeded(),
        "Finished date range"
    );
    if batch.failures.is_empty() {
        Ok(batch.attempted)
    } else {
        Err(batch.into())
    }
}

/// Replace a leading `~` with the current user's home directory.
pub fn expand_home(path: &Path) -> PathBuf {
    let Ok(rest) = path.strip_prefix("~") else {
        return path.to_path_buf();
    };
    match std::env::var_os("HOME") {
        Some(home) => PathBuf::from(home).join(rest),
        None => path.to_path_buf(),
    }
}

/// Truncate a string for logging purposes.
///
/// Long strings are cut at the last character boundary within `max` bytes
/// and `"…(+N bytes)"` is appended.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(truncate_for_log("short", 100), "short");
/// assert_eq!(truncate_for_log(&"a".repeat(500), 10), "aaaaaaaaaa…(+490 bytes)");
/// ```
pub fn truncate_for_log(s: &str, max: usize) -> String {
    if s.len() <= max {
        return s.to_string();
    }
    let mut cut = max;
    while !s.is_char_boundary(cut) {
        cut -= 1;
    }
    format!("{}…(+{} bytes)", &s[..cut], s.len() - cut)
}

/// Ensure a directory exists and is writable.
///
/// Creates the directory if needed, then creates and removes a probe file.
///
/// # Errors
///
/// Returns [`NewsError::Output`] if the directory cannot be created or is
/// not writable.
#[instrument(level = "info", skip_all, fields(path = %path.display()))]
pub async fn ensure_writable_dir(path: &Path) -> Result<()> {
    fs::create_dir_all(path)
        .await
        .map_err(|e| NewsError::output(path, e))?;
    let probe_path = path.join("..__probe_write__");
    match stdfs::File::create(&probe_path) {
        Ok(_) => {
            let _ = stdfs::remove_file(&probe_path);
            info!("Output directory is writable");
            Ok(())
        }
        Err(e) => Err(NewsError::output(path, e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_expand_single_date() {
        let dates = expand_dates(&["20240102".to_string()]).unwrap();
        assert_eq!(dates, vec![ymd(2024, 1, 2)]);
    }

    #[test]
    fn test_expand_range_is_inclusive_and_swapped() {
        let forward = expand_dates(&["20240130".to_string(), "20240202".to_string()]).unwrap();
        let reversed = expand_dates(&["20240202".to_string(), "20240130".to_string()]).unwrap();
        assert_eq!(forward, reversed);
        assert_eq!(
            forward,
            vec![ymd(2024, 1, 30), ymd(2024, 1, 31), ymd(2024, 2, 1), ymd(2024, 2, 2)]
        );
    }

    #[test]
    fn test_expand_rejects_bad_input() {
        assert!(expand_dates(&[]).is_err());
        assert!(expand_dates(&["2024-01-02".to_string()]).is_err());
        let three = vec!["20240101".to_string(); 3];
        assert!(matches!(
            expand_dates(&three),
            Err(NewsError::Configuration(_))
        ));
    }

    #[test]
    fn test_date_key_and_start_of_day() {
        let date = ymd(2024, 3, 9);
        assert_eq!(date_key(date), "20240309");
        let start = start_of_day(date);
        assert_eq!(start.with_timezone(&Local).date_naive(), date);
        assert_eq!(start.format("%Y/%m/%d").to_string(), "2024/03/09");
    }

    #[test]
    fn test_truncate_for_log_short_string() {
        assert_eq!(truncate_for_log("Hello, world!", 100), "Hello, world!");
    }

    #[test]
    fn test_truncate_for_log_long_string() {
        let s = "a".repeat(500);
        let result = truncate_for_log(&s, 100);
        assert!(result.starts_with(&"a".repeat(100)));
        assert!(result.contains("…(+400 bytes)"));
    }

    #[test]
    fn test_truncate_for_log_respects_char_boundaries() {
        // Each kana is three bytes.
        let result = truncate_for_log("あいうえお", 4);
        assert_eq!(result, "あ…(+12 bytes)");
    }

    #[test]
    fn test_expand_home_leaves_absolute_paths() {
        assert_eq!(expand_home(Path::new("/var/news")), PathBuf::from("/var/news"));
        if let Some(home) = std::env::var_os("HOME") {
            assert_eq!(
                expand_home(Path::new("~/Desktop")),
                PathBuf::from(home).join("Desktop")
            );
        }
    }

    #[tokio::test]
    async fn test_for_each_date_collects_failures() {
        let dates = vec![ymd(2024, 1, 1), ymd(2024, 1, 2), ymd(2024, 1, 3)];
        let err = for_each_date(&dates, |date| async move {
            if date == ymd(2024, 1, 2) {
                Err(NewsError::EmptyContent("topic.json".to_string()))
            } else {
                Ok(())
            }
        })
        .await
        .unwrap_err();

        match err {
            NewsError::Batch(batch) => {
                assert_eq!(batch.attempted, 3);
                assert_eq!(batch.succeeded(), 2);
                assert_eq!(batch.failures[0].0, ymd(2024, 1, 2));
            }
            other => panic!("expected batch failure, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_for_each_date_stops_on_fatal_error() {
        let dates = vec![ymd(2024, 1, 1), ymd(2024, 1, 2)];
        let mut seen = Vec::new();
        let err = for_each_date(&dates, |date| {
            seen.push(date);
            async { Err(NewsError::TokenizerUnavailable("no dictionary".to_string())) }
        })
        .await
        .unwrap_err();

        assert!(matches!(err, NewsError::TokenizerUnavailable(_)));
        assert_eq!(seen, vec![ymd(2024, 1, 1)]);
    }

    #[tokio::test]
    async fn test_ensure_writable_dir_creates_directory() {
        let tmp = tempfile::tempdir().unwrap();
        let nested = tmp.path().join("a/b");
        ensure_writable_dir(&nested).await.unwrap();
        assert!(nested.is_dir());
    }
}
