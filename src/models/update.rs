use semver::Version;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateCheckResult {
    Current,
    OutdatedWithVersion(Version),
    Unreachable,
}
