// SPDX-License-Identifier: MIT
use std::fmt;
use std::path::{Path, PathBuf};

use anyhow::{Result, bail};

/// An application-info file paired with the directory of raw sample files
/// captured for one profiling run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DataSource {
    app_info_path: PathBuf,
    samples_path: PathBuf,
}

impl DataSource {
    /// # Errors
    ///
    /// Returns an error if the app-info file does not exist or the samples
    /// path is not a directory.
    pub fn new(app_info_path: impl Into<PathBuf>, samples_path: impl Into<PathBuf>) -> Result<Self> {
        let app_info_path = app_info_path.into();
        let samples_path = samples_path.into();

        if !app_info_path.exists() {
            bail!("app info file not found: {}", app_info_path.display());
        }
        if !samples_path.is_dir() {
            bail!("samples directory not found: {}", samples_path.display());
        }

        Ok(Self {
            app_info_path,
            samples_path,
        })
    }

    #[must_use]
    pub fn app_info_path(&self) -> &Path {
        &self.app_info_path
    }

    #[must_use]
    pub fn samples_path(&self) -> &Path {
        &self.samples_path
    }
}

impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "DataSource({}, {})",
            self.app_info_path.display(),
            self.samples_path.display()
        )
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use super::DataSource;

    #[test]
    fn accepts_existing_paths() {
        let dir = TempDir::new().unwrap();
        let app_info = dir.path().join("appinfo.txt");
        let run = dir.path().join("run-1");
        fs::write(&app_info, "pid: 42\n").unwrap();
        fs::create_dir(&run).unwrap();

        let source = DataSource::new(&app_info, &run).unwrap();
        assert_eq!(source.app_info_path(), app_info);
        assert_eq!(source.samples_path(), run);
    }

    #[test]
    fn rejects_missing_app_info() {
        let dir = TempDir::new().unwrap();
        let run = dir.path().join("run-1");
        fs::create_dir(&run).unwrap();

        let err = DataSource::new(dir.path().join("appinfo.txt"), &run).unwrap_err();
        assert!(err.to_string().contains("app info file not found"));
    }

    #[test]
    fn rejects_samples_file() {
        let dir = TempDir::new().unwrap();
        let app_info = dir.path().join("appinfo.txt");
        let not_a_dir = dir.path().join("samples.data");
        fs::write(&app_info, "").unwrap();
        fs::write(&not_a_dir, "").unwrap();

        let err = DataSource::new(&app_info, &not_a_dir).unwrap_err();
        assert!(err.to_string().contains("samples directory not found"));
    }
}
