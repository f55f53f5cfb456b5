use crate::core::language::ActiveLocale;
use crate::core::shell::{Notice, Shell};
use crate::models::error::SError;
use crate::models::update::UpdateCheckResult;
use regex::Regex;
use semver::Version;
use std::future::Future;
use std::time::Duration;
use tracing::{debug, error, info, instrument, warn};

/// Total fetch attempts before the endpoint is considered unreachable.
pub const MAX_ATTEMPTS: u32 = 4;

const FETCH_TIMEOUT: Duration = Duration::from_secs(10);

/// Compares `current` with the remote version. Attempts run strictly one after
/// another with no delay; a `None` from `fetch` is a transient failure.
#[instrument(skip(fetch))]
pub async fn check_for_update<F, Fut>(current: &Version, mut fetch: F) -> UpdateCheckResult
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Option<Version>>,
{
    for attempt in 0..MAX_ATTEMPTS {
        if attempt > 0 {
            warn!("Update check failed, retrying ({attempt})");
        }

        let Some(remote) = fetch().await else {
            debug!("Update check attempt {} returned nothing", attempt + 1);
            continue;
        };

        if *current >= remote {
            info!("Already on the latest version {current}");
            return UpdateCheckResult::Current;
        }
        info!("New version {remote} available (running {current})");
        return UpdateCheckResult::OutdatedWithVersion(remote);
    }

    error!("Update check failed after {MAX_ATTEMPTS} attempts");
    UpdateCheckResult::Unreachable
}

/// Pulls the first `major.minor.patch` out of an arbitrary response body.
pub fn extract_version(text: &str) -> Result<Version, SError> {
    let re = Regex::new(r"(\d+)\.(\d+)\.(\d+)")
        .map_err(|e| SError::ParseError(format!("Failed to create regex: {}", e)))?;

    let caps = re
        .captures(text)
        .ok_or_else(|| SError::ParseError(format!("Could not extract version number from: {}", text.trim())))?;

    let part = |i: usize| {
        caps[i]
            .parse::<u64>()
            .map_err(|e| SError::ParseError(e.to_string()))
    };
    Ok(Version::new(part(1)?, part(2)?, part(3)?))
}

/// Remote version endpoint over HTTP.
pub struct HttpVersionSource {
    client: reqwest::Client,
    url: String,
}

impl HttpVersionSource {
    pub fn new(url: impl Into<String>) -> Result<Self, SError> {
        let client = reqwest::Client::builder().timeout(FETCH_TIMEOUT).build()?;
        Ok(Self {
            client,
            url: url.into(),
        })
    }

    /// Any failure maps to `None`.
    pub async fn fetch(&self) -> Option<Version> {
        match self.try_fetch().await {
            Ok(v) => Some(v),
            Err(e) => {
                warn!("Fetching remote version from {} failed: {e}", self.url);
                None
            }
        }
    }

    async fn try_fetch(&self) -> Result<Version, SError> {
        let body = self
            .client
            .get(&self.url)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;
        extract_version(&body)
    }
}

/// Fetches from `url` with the retry policy. A client that cannot even be built
/// counts as an unreachable endpoint.
pub async fn run_check(url: String, current: &Version) -> UpdateCheckResult {
    match HttpVersionSource::new(url) {
        Ok(source) => check_for_update(current, || source.fetch()).await,
        Err(e) => {
            error!("Update client could not be created: {e}");
            UpdateCheckResult::Unreachable
        }
    }
}

/// Pushes the outcome to the shell. Never blocks the user.
pub fn surface(result: &UpdateCheckResult, current: &Version, shell: &dyn Shell, locale: &ActiveLocale) {
    match result {
        UpdateCheckResult::Current => {
            shell.notify(Notice::Info(locale.format("Update.Current", &[current])));
        }
        UpdateCheckResult::OutdatedWithVersion(remote) => {
            let text = locale.format("Update.Available", &[remote]);
            shell.show_update_badge(&text);
            shell.notify(Notice::Warning(text));
        }
        UpdateCheckResult::Unreachable => {
            shell.notify(Notice::Error(locale.text("Update.Error")));
        }
    }
}
