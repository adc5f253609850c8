/// Startup configuration read from environment variables
///
/// The backend endpoints are deployment details, so they arrive from the
/// environment rather than a config file:
/// - `API_HOSTNAME` / `API_PORT` - the feed API
/// - `S3_HOSTNAME` / `S3_PORT` / `S3_BUCKET_NAME` - the object storage
///   serving image binaries
/// - `COLUMN_COUNT` / `PAGE_SIZE` - grid shape
///
/// Missing variables fall back to defaults; values that are present but
/// unparseable are startup errors.

use std::fmt::Display;
use std::str::FromStr;

const DEFAULT_API_HOSTNAME: &str = "localhost";
const DEFAULT_API_PORT: u16 = 5001;
const DEFAULT_S3_HOSTNAME: &str = "localhost";
const DEFAULT_S3_PORT: u16 = 9000;
const DEFAULT_S3_BUCKET_NAME: &str = "images";
const DEFAULT_COLUMN_COUNT: usize = 4;
const DEFAULT_PAGE_SIZE: u64 = 12;

/// Everything the application needs to know at startup
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub api_hostname: String,
    pub api_port: u16,
    pub s3_hostname: String,
    pub s3_port: u16,
    pub s3_bucket_name: String,
    /// Number of grid columns per row
    pub column_count: usize,
    /// Number of records requested per page
    pub page_size: u64,
}

impl Config {
    /// Read the configuration from the process environment
    pub fn from_env() -> Result<Self, String> {
        let config = Config {
            api_hostname: string_var("API_HOSTNAME", DEFAULT_API_HOSTNAME),
            api_port: parsed_var("API_PORT", DEFAULT_API_PORT)?,
            s3_hostname: string_var("S3_HOSTNAME", DEFAULT_S3_HOSTNAME),
            s3_port: parsed_var("S3_PORT", DEFAULT_S3_PORT)?,
            s3_bucket_name: string_var("S3_BUCKET_NAME", DEFAULT_S3_BUCKET_NAME),
            column_count: parsed_var("COLUMN_COUNT", DEFAULT_COLUMN_COUNT)?,
            page_size: parsed_var("PAGE_SIZE", DEFAULT_PAGE_SIZE)?,
        };
        config.validate()
    }

    /// The grid math divides by these, so zero is rejected up front
    fn validate(self) -> Result<Self, String> {
        if self.column_count == 0 {
            return Err("COLUMN_COUNT must be at least 1".to_string());
        }
        if self.page_size == 0 {
            return Err("PAGE_SIZE must be at least 1".to_string());
        }
        Ok(self)
    }
}

/// Read a variable, treating empty values as unset
fn raw_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|value| !value.trim().is_empty())
}

fn string_var(name: &str, default: &str) -> String {
    raw_var(name).unwrap_or_else(|| default.to_string())
}

fn parsed_var<T>(name: &str, default: T) -> Result<T, String>
where
    T: FromStr,
    T::Err: Display,
{
    parse_value(name, raw_var(name), default)
}

/// Parsing core, separated from the environment for testability
fn parse_value<T>(name: &str, raw: Option<String>, default: T) -> Result<T, String>
where
    T: FromStr,
    T::Err: Display,
{
    match raw {
        Some(value) => value
            .trim()
            .parse()
            .map_err(|e| format!("Invalid {}={}: {}", name, value, e)),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_value_falls_back_to_default() {
        let port: u16 = parse_value("API_PORT", None, 5001).unwrap();
        assert_eq!(port, 5001);
    }

    #[test]
    fn test_present_value_overrides_default() {
        let port: u16 = parse_value("API_PORT", Some("8080".to_string()), 5001).unwrap();
        assert_eq!(port, 8080);
    }

    #[test]
    fn test_surrounding_whitespace_is_tolerated() {
        let count: usize = parse_value("COLUMN_COUNT", Some(" 3 \n".to_string()), 4).unwrap();
        assert_eq!(count, 3);
    }

    #[test]
    fn test_unparseable_value_is_an_error() {
        let result: Result<u16, String> =
            parse_value("API_PORT", Some("not-a-port".to_string()), 5001);
        let message = result.unwrap_err();
        assert!(message.contains("API_PORT"));
        assert!(message.contains("not-a-port"));
    }

    #[test]
    fn test_zero_columns_rejected() {
        let config = Config {
            api_hostname: "localhost".to_string(),
            api_port: 5001,
            s3_hostname: "localhost".to_string(),
            s3_port: 9000,
            s3_bucket_name: "images".to_string(),
            column_count: 0,
            page_size: 12,
        };
        assert!(config.validate().is_err());
    }
}
