use serde::Deserialize;
use std::collections::HashMap;
use std::io::Read;
use std::path::PathBuf;
use tracing::warn;

use crate::error::ConfigError;

// Path served in static command mode
pub const STATIC_PATH: &str = "/do";

// Where the route table comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteSource {
    Static(String),
    Csv(PathBuf),
}

impl std::fmt::Display for RouteSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RouteSource::Static(_) => write!(f, "static command on {STATIC_PATH}"),
            RouteSource::Csv(path) => write!(f, "{}", path.display()),
        }
    }
}

// One CSV record, matched by position
#[derive(Debug, Deserialize)]
struct RouteRow {
    path: String,
    #[serde(default)]
    command: String,
}

/// URL path -> command template. Built once at startup, read-only afterwards.
#[derive(Debug, Clone, Default)]
pub struct RouteTable {
    routes: HashMap<String, String>,
}

impl RouteTable {
    pub fn load(source: &RouteSource) -> Result<Self, ConfigError> {
        match source {
            RouteSource::Static(cmd) => Ok([(STATIC_PATH, cmd.as_str())].into_iter().collect()),
            RouteSource::Csv(path) => {
                let file = std::fs::File::open(path).map_err(|source| ConfigError::RoutesFile {
                    path: path.clone(),
                    source,
                })?;
                Self::from_csv(file)
            }
        }
    }

    // Rows are "path,command" without a header, rows missing either are skipped
    pub fn from_csv<R: Read>(input: R) -> Result<Self, ConfigError> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .from_reader(input);

        let mut routes = HashMap::new();
        for (i, record) in reader.deserialize::<RouteRow>().enumerate() {
            let RouteRow { path, command } = record?;
            let row = i + 1;
            if path.is_empty() {
                warn!(row, "Skipping row because of missing URL");
                continue;
            }
            if command.is_empty() {
                warn!(row, "Skipping row because of missing command");
                continue;
            }
            routes.insert(path, command);
        }
        Ok(Self { routes })
    }

    pub fn get(&self, path: &str) -> Option<&str> {
        self.routes.get(path).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

impl<P: Into<String>, C: Into<String>> FromIterator<(P, C)> for RouteTable {
    fn from_iter<I: IntoIterator<Item = (P, C)>>(iter: I) -> Self {
        Self {
            routes: iter.into_iter().map(|(p, c)| (p.into(), c.into())).collect(),
        }
    }
}
