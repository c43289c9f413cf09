//! Runtime setup shared by every command: paths, logging, database.

use crate::args::GlobalOpts;
use miette::{miette, IntoDiagnostic, Result};
use staffdb_core::db::Connection;
use staffdb_core::{default_log_level, init_logging, LoggingConfig};
use std::path::{Path, PathBuf};

const DB_FILE_NAME: &str = "staffdb.sqlite3";
const LOG_DIR_NAME: &str = "logs";

/// Resolved locations for one invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Paths {
    pub db: PathBuf,
    pub log_dir: PathBuf,
}

impl Paths {
    pub fn resolve(global: &GlobalOpts) -> Result<Self> {
        let cwd = std::env::current_dir().into_diagnostic()?;
        let data_dir = match (&global.db, &global.log_dir) {
            (Some(_), Some(_)) => None,
            _ => Some(default_data_dir()?),
        };
        Ok(Self::from_parts(
            global.db.as_deref(),
            global.log_dir.as_deref(),
            data_dir.as_deref(),
            &cwd,
        ))
    }

    fn from_parts(
        db: Option<&Path>,
        log_dir: Option<&Path>,
        data_dir: Option<&Path>,
        cwd: &Path,
    ) -> Self {
        let data_dir = data_dir.unwrap_or(cwd);
        Self {
            db: db
                .map(|path| absolutize(path, cwd))
                .unwrap_or_else(|| data_dir.join(DB_FILE_NAME)),
            log_dir: log_dir
                .map(|path| absolutize(path, cwd))
                .unwrap_or_else(|| data_dir.join(LOG_DIR_NAME)),
        }
    }
}

/// Initializes logging and opens the migrated database.
pub fn open(global: &GlobalOpts) -> Result<Connection> {
    let paths = Paths::resolve(global)?;

    let level = global
        .log_level
        .as_deref()
        .unwrap_or_else(|| default_log_level());
    let config = LoggingConfig::new(level, &paths.log_dir)
        .into_diagnostic()?
        .with_echo_warnings(global.verbose);
    init_logging(&config).into_diagnostic()?;

    if let Some(parent) = paths.db.parent() {
        std::fs::create_dir_all(parent)
            .map_err(|err| miette!("cannot create {}: {err}", parent.display()))?;
    }
    staffdb_core::db::open_db(&paths.db).into_diagnostic()
}

fn default_data_dir() -> Result<PathBuf> {
    directories::ProjectDirs::from("", "", "staffdb")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .ok_or_else(|| miette!("Could not determine data directory; pass --db and --log-dir"))
}

fn absolutize(path: &Path, cwd: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        cwd.join(path)
    }
}
