use crate::config::types::{Config, CrawlerConfig, OutputConfig, UserAgentConfig};
use crate::ConfigError;
use std::fmt::Display;
use std::ops::RangeInclusive;
use url::Url;

const CONCURRENCY_RANGE: RangeInclusive<u32> = 1..=64;
const TIMEOUT_RANGE: RangeInclusive<u64> = 1..=300;

/// Checks every section of a parsed configuration
///
/// Search parameters are not checked here; they are resolved against the
/// region and property-type tables when the seed URLs are built.
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    http_url("base-url", &config.site.base_url)?;
    validate_crawler(&config.crawler)?;
    validate_user_agent(&config.user_agent)?;
    validate_output(&config.output)
}

fn invalid(message: impl Into<String>) -> ConfigError {
    ConfigError::Validation(message.into())
}

fn in_range<T>(key: &str, value: T, range: RangeInclusive<T>) -> Result<(), ConfigError>
where
    T: PartialOrd + Display,
{
    if range.contains(&value) {
        Ok(())
    } else {
        Err(invalid(format!(
            "{} must be between {} and {}, got {}",
            key,
            range.start(),
            range.end(),
            value
        )))
    }
}

/// Parses `value` as an absolute http(s) URL with a host
fn http_url(key: &str, value: &str) -> Result<Url, ConfigError> {
    let url =
        Url::parse(value).map_err(|e| ConfigError::InvalidUrl(format!("{} '{}': {}", key, value, e)))?;
    if !matches!(url.scheme(), "http" | "https") || url.host_str().is_none() {
        return Err(ConfigError::InvalidUrl(format!(
            "{} '{}' must be an http(s) URL with a host",
            key, value
        )));
    }
    Ok(url)
}

fn validate_crawler(config: &CrawlerConfig) -> Result<(), ConfigError> {
    in_range(
        "max-concurrent-requests",
        config.max_concurrent_requests,
        CONCURRENCY_RANGE,
    )?;
    in_range("request-timeout-secs", config.request_timeout_secs, TIMEOUT_RANGE)
}

/// The name goes verbatim into the User-Agent product token
fn validate_user_agent(config: &UserAgentConfig) -> Result<(), ConfigError> {
    let name = &config.crawler_name;
    if name.is_empty() || !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
        return Err(invalid(format!(
            "crawler-name must be non-empty ASCII letters, digits or hyphens, got '{}'",
            name
        )));
    }

    http_url("contact-url", &config.contact_url)?;
    check_email(&config.contact_email)
}

fn validate_output(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.csv_path.trim().is_empty() {
        return Err(invalid("csv-path cannot be empty"));
    }
    if config.database_path.as_deref().is_some_and(|p| p.trim().is_empty()) {
        return Err(invalid("database-path cannot be empty when set"));
    }
    Ok(())
}

/// Shape check only: one `@`, both halves present, a dotted domain
fn check_email(email: &str) -> Result<(), ConfigError> {
    let well_formed = match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.contains('@')
                && domain.split('.').count() > 1
                && domain.split('.').all(|label| !label.is_empty())
        }
        None => false,
    };

    if well_formed {
        Ok(())
    } else {
        Err(invalid(format!("contact-email '{}' is not an address", email)))
    }
}
