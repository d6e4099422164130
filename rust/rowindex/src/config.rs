//! Index configuration.
//!
//! An index is configured through the string options attached to its
//! definition:
//!
//! | Option               | Type   | Default                                    |
//! |----------------------|--------|--------------------------------------------|
//! | `schema`             | JSON   | required                                   |
//! | `refresh_seconds`    | float  | 60                                         |
//! | `num_cached_filters` | int    | number of tokens + 1, `<= 0` disables      |
//! | `ram_buffer_mb`      | int    | 64                                         |
//! | `max_merge_mb`       | int    | 5                                          |
//! | `max_cached_mb`      | int    | 30                                         |
//! | `path`               | path   | `<data dir>/<keyspace>/<table>/lucene_idx` |

use std::{
    collections::HashMap,
    num::NonZeroUsize,
    path::{Path, PathBuf},
    str::FromStr,
};

use rowindex_common::{error::Error, result::Result};
use rowindex_core::metadata::TableMetadata;
use rowindex_schema::Schema;

pub const SCHEMA_OPTION: &str = "schema";
pub const REFRESH_SECONDS_OPTION: &str = "refresh_seconds";
pub const NUM_CACHED_FILTERS_OPTION: &str = "num_cached_filters";
pub const RAM_BUFFER_MB_OPTION: &str = "ram_buffer_mb";
pub const MAX_MERGE_MB_OPTION: &str = "max_merge_mb";
pub const MAX_CACHED_MB_OPTION: &str = "max_cached_mb";
pub const PATH_OPTION: &str = "path";

pub const DEFAULT_REFRESH_SECONDS: f64 = 60.0;
pub const DEFAULT_RAM_BUFFER_MB: u32 = 64;
pub const DEFAULT_MAX_MERGE_MB: u32 = 5;
pub const DEFAULT_MAX_CACHED_MB: u32 = 30;
pub const DEFAULT_PATH_SUFFIX: &str = "lucene_idx";

/// Settings of the hosting storage engine that index defaults derive from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineSettings {
    pub data_file_locations: Vec<PathBuf>,
    pub num_tokens: usize,
}

impl EngineSettings {
    /// Settings with a single data directory and one token per node.
    pub fn new(data_dir: impl Into<PathBuf>) -> EngineSettings {
        EngineSettings {
            data_file_locations: vec![data_dir.into()],
            num_tokens: 1,
        }
    }

    pub fn with_num_tokens(mut self, num_tokens: usize) -> EngineSettings {
        self.num_tokens = num_tokens;
        self
    }
}

#[derive(Debug, Clone)]
pub struct RowIndexConfig {
    name: String,
    schema: Schema,
    refresh_seconds: f64,
    filter_cache_size: Option<NonZeroUsize>,
    ram_buffer_mb: u32,
    max_merge_mb: u32,
    max_cached_mb: u32,
    path: PathBuf,
}

impl RowIndexConfig {
    /// Resolves the options of index `name` on `table`.
    ///
    /// The schema is validated against the table, and the table's clustering
    /// order, if any, is attached to it.
    ///
    /// # Errors
    /// An invalid argument error naming the offending option.
    pub fn new(
        table: &TableMetadata,
        name: &str,
        options: &HashMap<String, String>,
        engine: &EngineSettings,
    ) -> Result<RowIndexConfig> {
        let refresh_seconds = match options.get(REFRESH_SECONDS_OPTION) {
            Some(value) => {
                let seconds: f64 = parse(REFRESH_SECONDS_OPTION, value, "a strictly positive number")?;
                if !(seconds > 0.0 && seconds.is_finite()) {
                    return Err(Error::invalid_arg(
                        REFRESH_SECONDS_OPTION,
                        "must be strictly positive",
                    ));
                }
                seconds
            }
            None => DEFAULT_REFRESH_SECONDS,
        };

        let filter_cache_size = match options.get(NUM_CACHED_FILTERS_OPTION) {
            Some(value) => parse::<i64>(NUM_CACHED_FILTERS_OPTION, value, "an integer")?,
            None => engine.num_tokens as i64 + 1,
        };
        let filter_cache_size = usize::try_from(filter_cache_size)
            .ok()
            .and_then(NonZeroUsize::new);

        let ram_buffer_mb = positive(options, RAM_BUFFER_MB_OPTION, DEFAULT_RAM_BUFFER_MB)?;
        let max_merge_mb = positive(options, MAX_MERGE_MB_OPTION, DEFAULT_MAX_MERGE_MB)?;
        let max_cached_mb = positive(options, MAX_CACHED_MB_OPTION, DEFAULT_MAX_CACHED_MB)?;

        let schema = match options.get(SCHEMA_OPTION) {
            Some(json) if !json.trim().is_empty() => {
                let schema = Schema::from_json(json)
                    .and_then(|schema| schema.validate(table).map(|_| schema))
                    .map_err(|e| Error::invalid_arg(SCHEMA_OPTION, format!("is invalid: {e}")))?;
                match table.clustering_comparator() {
                    Some(comparator) => schema.with_clustering_key(comparator),
                    None => schema,
                }
            }
            _ => return Err(Error::invalid_arg(SCHEMA_OPTION, "required")),
        };

        let path = match options.get(PATH_OPTION) {
            Some(path) => PathBuf::from(path),
            None => {
                let Some(data_dir) = engine.data_file_locations.first() else {
                    return Err(Error::invalid_arg(
                        PATH_OPTION,
                        "required when the engine has no data file locations",
                    ));
                };
                data_dir
                    .join(table.keyspace())
                    .join(table.table())
                    .join(DEFAULT_PATH_SUFFIX)
            }
        };

        let config = RowIndexConfig {
            name: name.to_string(),
            schema,
            refresh_seconds,
            filter_cache_size,
            ram_buffer_mb,
            max_merge_mb,
            max_cached_mb,
            path,
        };
        log::info!(
            "index {}.{}.{}: path={}, refresh_seconds={}, num_cached_filters={}, ram_buffer_mb={}, max_merge_mb={}, max_cached_mb={}",
            table.keyspace(),
            table.table(),
            config.name,
            config.path.display(),
            config.refresh_seconds,
            config.filter_cache_size.map_or(0, NonZeroUsize::get),
            config.ram_buffer_mb,
            config.max_merge_mb,
            config.max_cached_mb,
        );
        Ok(config)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn refresh_seconds(&self) -> f64 {
        self.refresh_seconds
    }

    /// Capacity of the filter cache, or `None` when caching is disabled.
    pub fn filter_cache_size(&self) -> Option<NonZeroUsize> {
        self.filter_cache_size
    }

    pub fn ram_buffer_mb(&self) -> u32 {
        self.ram_buffer_mb
    }

    pub fn max_merge_mb(&self) -> u32 {
        self.max_merge_mb
    }

    pub fn max_cached_mb(&self) -> u32 {
        self.max_cached_mb
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn parse<T: FromStr>(option: &str, value: &str, expected: &str) -> Result<T> {
    value
        .trim()
        .parse()
        .map_err(|_| Error::invalid_arg(option, format!("must be {expected}, found '{value}'")))
}

fn positive(options: &HashMap<String, String>, option: &str, default: u32) -> Result<u32> {
    let Some(value) = options.get(option) else {
        return Ok(default);
    };
    let parsed: i64 = parse(option, value, "a strictly positive integer")?;
    u32::try_from(parsed)
        .ok()
        .filter(|v| *v > 0)
        .ok_or_else(|| Error::invalid_arg(option, "must be strictly positive"))
}
