/// Configuration default values
///
/// This module contains all the default values for configuration options,
/// making them easily changeable in one central location.
// Files
pub const DEFAULT_CONFIG_FILE: &str = "emoji-sync.toml";
pub const DEFAULT_IMAGE_DIRECTORY: &str = "./images";
pub const DEFAULT_CACHE_FILE: &str = "emoji_cache.json";
pub const DEFAULT_ERROR_LOG_FILE: &str = "emoji_errors.log";

// Remote service
pub const DEFAULT_API_BASE_URL: &str = "https://discord.com/api/v10";
pub const DEFAULT_ABORT_ON_LIST_FAILURE: bool = false;
