//! Index name resolution
//!
//! Every span is routed to a span index and, outside archive mode, a service
//! index. Which names are produced depends on the [`IndexingMode`] chosen at
//! construction:
//!
//! | Mode | Span index | Service index |
//! |------|------------|---------------|
//! | DirectDated | `<p>jaeger-span-<date>` | `<p>jaeger-service-<date>` |
//! | AliasRollover | `<p>jaeger-span-write` | `<p>jaeger-service-write` |
//! | ArchiveDated | `<p>jaeger-span-archive` | (none) |
//! | ArchiveAlias | `<p>jaeger-span-archive-write` | (none) |
//!
//! Only DirectDated looks at the span's start time. With aliases, moving to a
//! new physical index is done by repointing the alias in the store.
//!
//! Date layouts are strftime strings and are not validated. A layout the
//! formatter cannot render yields a malformed name containing the raw layout.

use chrono::{DateTime, Utc};
use std::fmt::Write;

/// Separator between an index prefix and the index base name
pub const INDEX_PREFIX_SEPARATOR: char = '-';
/// Base name of span indices
pub const SPAN_INDEX: &str = "jaeger-span-";
/// Base name of service indices
pub const SERVICE_INDEX: &str = "jaeger-service-";
/// Suffix of rollover write aliases
pub const WRITE_ALIAS_SUFFIX: &str = "write";
/// Suffix of the archive index
pub const ARCHIVE_INDEX_SUFFIX: &str = "archive";
/// Suffix of the archive rollover write alias
pub const ARCHIVE_WRITE_INDEX_SUFFIX: &str = "archive-write";
/// Default layout for dated indices (one index per UTC day)
pub const DEFAULT_DATE_LAYOUT: &str = "%Y-%m-%d";

/// Terminate a non-empty prefix with the separator, exactly once
pub fn normalize_prefix(prefix: &str) -> String {
    let mut prefix = prefix.to_owned();
    if !prefix.is_empty() && !prefix.ends_with(INDEX_PREFIX_SEPARATOR) {
        prefix.push(INDEX_PREFIX_SEPARATOR);
    }
    prefix
}

/// Indexing policy of a writer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IndexingMode {
    /// One index per date partition
    DirectDated,
    /// Fixed write aliases, rollover managed by the store
    AliasRollover,
    /// Single archive index
    ArchiveDated,
    /// Archive write alias
    ArchiveAlias,
}

impl IndexingMode {
    /// Select the mode from the archive and alias flags
    pub fn from_flags(archive: bool, use_aliases: bool) -> Self {
        match (archive, use_aliases) {
            (false, false) => IndexingMode::DirectDated,
            (false, true) => IndexingMode::AliasRollover,
            (true, false) => IndexingMode::ArchiveDated,
            (true, true) => IndexingMode::ArchiveAlias,
        }
    }

    /// Whether the mode writes archive spans (and no service metadata)
    pub fn is_archive(&self) -> bool {
        matches!(self, IndexingMode::ArchiveDated | IndexingMode::ArchiveAlias)
    }

    /// Whether index names are independent of span time
    pub fn uses_aliases(&self) -> bool {
        matches!(self, IndexingMode::AliasRollover | IndexingMode::ArchiveAlias)
    }
}

/// Target indices for one span
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct IndexNames {
    /// Span index or alias, never empty
    pub span: String,
    /// Service index or alias, empty in archive mode
    pub service: String,
}

impl IndexNames {
    /// Whether service metadata should be written
    pub fn has_service_index(&self) -> bool {
        !self.service.is_empty()
    }
}

/// Maps a span start time to its target indices
///
/// Each variant holds exactly what it needs, already prefixed, so
/// [`resolve`](Self::resolve) does no allocation beyond the returned names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IndexNameResolver {
    /// `<span_prefix><date>` / `<service_prefix><date>`
    DirectDated {
        /// Prefixed span index base
        span_prefix: String,
        /// Prefixed service index base
        service_prefix: String,
        /// strftime layout for span indices
        span_layout: String,
        /// strftime layout for service indices
        service_layout: String,
    },
    /// Fixed rollover write aliases
    AliasRollover {
        /// Span write alias
        span_alias: String,
        /// Service write alias
        service_alias: String,
    },
    /// Fixed archive index
    ArchiveDated {
        /// Archive index name
        span_index: String,
    },
    /// Archive rollover write alias
    ArchiveAlias {
        /// Archive write alias
        span_alias: String,
    },
}

impl IndexNameResolver {
    /// Build the resolver for `mode`
    ///
    /// # Arguments
    ///
    /// * `mode` - indexing policy
    /// * `prefix` - index prefix, normalized with [`normalize_prefix`]
    /// * `span_layout` / `service_layout` - date layouts, used by DirectDated only
    pub fn new(mode: IndexingMode, prefix: &str, span_layout: &str, service_layout: &str) -> Self {
        let prefix = normalize_prefix(prefix);
        let span_prefix = format!("{}{}", prefix, SPAN_INDEX);
        let service_prefix = format!("{}{}", prefix, SERVICE_INDEX);
        match mode {
            IndexingMode::DirectDated => IndexNameResolver::DirectDated {
                span_prefix,
                service_prefix,
                span_layout: span_layout.to_owned(),
                service_layout: service_layout.to_owned(),
            },
            IndexingMode::AliasRollover => IndexNameResolver::AliasRollover {
                span_alias: span_prefix + WRITE_ALIAS_SUFFIX,
                service_alias: service_prefix + WRITE_ALIAS_SUFFIX,
            },
            IndexingMode::ArchiveDated => IndexNameResolver::ArchiveDated {
                span_index: span_prefix + ARCHIVE_INDEX_SUFFIX,
            },
            IndexingMode::ArchiveAlias => IndexNameResolver::ArchiveAlias {
                span_alias: span_prefix + ARCHIVE_WRITE_INDEX_SUFFIX,
            },
        }
    }

    /// The policy this resolver implements
    pub fn mode(&self) -> IndexingMode {
        match self {
            IndexNameResolver::DirectDated { .. } => IndexingMode::DirectDated,
            IndexNameResolver::AliasRollover { .. } => IndexingMode::AliasRollover,
            IndexNameResolver::ArchiveDated { .. } => IndexingMode::ArchiveDated,
            IndexNameResolver::ArchiveAlias { .. } => IndexingMode::ArchiveAlias,
        }
    }

    /// Target indices for a span starting at `time`
    ///
    /// Deterministic and infallible.
    pub fn resolve(&self, time: DateTime<Utc>) -> IndexNames {
        match self {
            IndexNameResolver::DirectDated {
                span_prefix,
                service_prefix,
                span_layout,
                service_layout,
            } => IndexNames {
                span: index_with_date(span_prefix, span_layout, &time),
                service: index_with_date(service_prefix, service_layout, &time),
            },
            IndexNameResolver::AliasRollover {
                span_alias,
                service_alias,
            } => IndexNames {
                span: span_alias.clone(),
                service: service_alias.clone(),
            },
            IndexNameResolver::ArchiveDated { span_index } => IndexNames {
                span: span_index.clone(),
                service: String::new(),
            },
            IndexNameResolver::ArchiveAlias { span_alias } => IndexNames {
                span: span_alias.clone(),
                service: String::new(),
            },
        }
    }
}

fn index_with_date(prefix: &str, layout: &str, time: &DateTime<Utc>) -> String {
    let mut name = String::with_capacity(prefix.len() + layout.len() + 4);
    name.push_str(prefix);
    if write!(name, "{}", time.format(layout)).is_err() {
        name.truncate(prefix.len());
        name.push_str(layout);
    }
    name
}
