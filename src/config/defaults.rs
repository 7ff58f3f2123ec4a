/// Configuration default values
///
/// This module contains all the default values for configuration options,
/// making them easily changeable in one central location.
// Probe defaults (check command)
pub const DEFAULT_PROBE_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_PROBE_CONCURRENCY: usize = 10;
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";
pub const DEFAULT_MAX_REDIRECTS: usize = 10;

// Probe defaults used by the convert command's follow-up check
pub const DEFAULT_CONVERT_TIMEOUT_SECS: u64 = 8;
pub const DEFAULT_CONVERT_CONCURRENCY: usize = 15;

// Ingestion defaults
pub const DEFAULT_FEED_FOLDER: &str = "json";
pub const DEFAULT_CONVERT_OUTPUT: &str = "from_json.m3u";

// Output naming defaults
pub const DEFAULT_BACKUP_SUFFIX: &str = ".backup";
pub const DEFAULT_WORKING_SUFFIX: &str = "_working";
pub const DEFAULT_NOT_WORKING_SUFFIX: &str = "_notworking";

// Error details are clipped to this many characters
pub const MAX_ERROR_DETAIL_CHARS: usize = 100;
