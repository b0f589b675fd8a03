//! Writer configuration
//!
//! All settings are fixed for the lifetime of a writer. The configuration can
//! be built in code or loaded from TOML:
//!
//! ```toml
//! index_prefix = "prod"
//! span_date_layout = "%Y-%m-%d"
//! use_read_write_aliases = false
//! all_tags_as_fields = false
//! tag_keys_as_fields = ["http.method", "error"]
//! tag_dot_replacement = "@"
//! service_cache_ttl_secs = 43200
//! ```
//!
//! Missing keys take their defaults. A cache TTL of zero or an absent TTL means
//! "use the default"; the two TTLs are resolved independently.

use crate::index::{IndexingMode, DEFAULT_DATE_LAYOUT};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tracestore_core::{Error, FromDomain, Result};

/// Default retention of service metadata cache entries
pub const SERVICE_CACHE_TTL_DEFAULT: Duration = Duration::from_secs(12 * 60 * 60);
/// Default retention of index bookkeeping cache entries
pub const INDEX_CACHE_TTL_DEFAULT: Duration = Duration::from_secs(48 * 60 * 60);
/// Default number of service/operation fingerprints kept
pub const SERVICE_CACHE_CAPACITY_DEFAULT: usize = 100_000;
/// Number of span indices tracked by the bookkeeping cache
pub const INDEX_CACHE_CAPACITY: usize = 5;
/// Longest accepted cache TTL
pub const CACHE_TTL_MAX: Duration = Duration::from_secs(10 * 365 * 24 * 60 * 60);
/// Default replacement for `.` in flattened tag keys
pub const TAG_DOT_REPLACEMENT_DEFAULT: &str = "@";

/// Construction-time settings of a span writer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WriterConfig {
    /// Prefix for every index, alias and template name
    pub index_prefix: String,
    /// strftime layout of dated span indices
    pub span_date_layout: String,
    /// strftime layout of dated service indices
    pub service_date_layout: String,
    /// Flatten every non-binary tag into the `tag` object
    pub all_tags_as_fields: bool,
    /// Tag keys flattened when `all_tags_as_fields` is off
    pub tag_keys_as_fields: Vec<String>,
    /// Replacement for `.` in flattened keys
    pub tag_dot_replacement: String,
    /// Write to the archive indices
    pub archive: bool,
    /// Write through rollover aliases instead of dated indices
    pub use_read_write_aliases: bool,
    /// Service metadata cache TTL in seconds
    pub service_cache_ttl_secs: Option<u64>,
    /// Index bookkeeping cache TTL in seconds
    pub index_cache_ttl_secs: Option<u64>,
    /// Maximum service/operation fingerprints kept
    pub service_cache_capacity: usize,
}

impl Default for WriterConfig {
    fn default() -> Self {
        Self {
            index_prefix: String::new(),
            span_date_layout: DEFAULT_DATE_LAYOUT.to_string(),
            service_date_layout: DEFAULT_DATE_LAYOUT.to_string(),
            all_tags_as_fields: false,
            tag_keys_as_fields: Vec::new(),
            tag_dot_replacement: TAG_DOT_REPLACEMENT_DEFAULT.to_string(),
            archive: false,
            use_read_write_aliases: false,
            service_cache_ttl_secs: None,
            index_cache_ttl_secs: None,
            service_cache_capacity: SERVICE_CACHE_CAPACITY_DEFAULT,
        }
    }
}

impl WriterConfig {
    /// Parse and validate a TOML document
    pub fn from_toml_str(s: &str) -> Result<Self> {
        let config: WriterConfig =
            toml::from_str(s).map_err(|e| Error::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))?;
        Self::from_toml_str(&text)
    }

    /// Check settings that would make the writer unusable
    ///
    /// Date layouts are deliberately not checked here.
    pub fn validate(&self) -> Result<()> {
        if self.service_cache_capacity == 0 {
            return Err(Error::Config(
                "service_cache_capacity must be greater than zero".to_string(),
            ));
        }
        for (name, ttl) in [
            ("service_cache_ttl_secs", self.service_cache_ttl()),
            ("index_cache_ttl_secs", self.index_cache_ttl()),
        ] {
            if ttl > CACHE_TTL_MAX {
                return Err(Error::Config(format!(
                    "{} exceeds {} seconds",
                    name,
                    CACHE_TTL_MAX.as_secs()
                )));
            }
        }
        Ok(())
    }

    /// Indexing policy selected by the archive and alias flags
    pub fn indexing_mode(&self) -> IndexingMode {
        IndexingMode::from_flags(self.archive, self.use_read_write_aliases)
    }

    /// Effective service metadata cache TTL
    pub fn service_cache_ttl(&self) -> Duration {
        ttl_or_default(self.service_cache_ttl_secs, SERVICE_CACHE_TTL_DEFAULT)
    }

    /// Effective index bookkeeping cache TTL
    pub fn index_cache_ttl(&self) -> Duration {
        ttl_or_default(self.index_cache_ttl_secs, INDEX_CACHE_TTL_DEFAULT)
    }

    /// Converter implementing the configured tag flattening
    pub fn converter(&self) -> FromDomain {
        FromDomain::new(
            self.all_tags_as_fields,
            self.tag_keys_as_fields.iter().cloned(),
            self.tag_dot_replacement.clone(),
        )
    }
}

fn ttl_or_default(secs: Option<u64>, default: Duration) -> Duration {
    match secs {
        Some(s) if s > 0 => Duration::from_secs(s),
        _ => default,
    }
}
