use log::debug;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const MAIN_FILE_NAME: &str = "main.lua";

#[derive(Debug, Error)]
pub enum ProjectSaveError {
    #[error("generated code is empty")]
    EmptyPayload,
    #[error("failed to create directory {path}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to write code to {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Clone, Copy)]
pub struct SaveProjectOptions<'a> {
    pub output_dir: &'a Path,
    /// Asset directory, resolved relative to `output_dir`.
    pub assets_dir: &'a Path,
    /// Defaults to [`MAIN_FILE_NAME`].
    pub file_name: Option<&'a str>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedProject {
    pub main_file: PathBuf,
    pub assets_dir: PathBuf,
}

/// Write generated Lua source into a Love2D project directory.
///
/// The output and asset directories are created when missing; an existing
/// source file is overwritten.
pub fn save_main_lua(
    code: &str,
    options: SaveProjectOptions<'_>,
) -> Result<SavedProject, ProjectSaveError> {
    if code.trim().is_empty() {
        return Err(ProjectSaveError::EmptyPayload);
    }

    let assets_dir = options.output_dir.join(options.assets_dir);
    ensure_dir_exists(options.output_dir)?;
    ensure_dir_exists(&assets_dir)?;

    let main_file = options
        .output_dir
        .join(options.file_name.unwrap_or(MAIN_FILE_NAME));
    fs::write(&main_file, code).map_err(|source| ProjectSaveError::Io {
        path: main_file.clone(),
        source,
    })?;
    debug!("Wrote {} bytes to {main_file:?}", code.len());

    Ok(SavedProject {
        main_file,
        assets_dir,
    })
}

pub fn ensure_dir_exists(path: &Path) -> Result<(), ProjectSaveError> {
    fs::create_dir_all(path).map_err(|source| ProjectSaveError::CreateDir {
        path: path.to_path_buf(),
        source,
    })?;
    debug!("Directory ready: {path:?}");
    Ok(())
}
