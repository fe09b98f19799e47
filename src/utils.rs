use std::{
    path::Path,
    process::{Command, Output},
};

use anyhow::{Context, Result};

pub(crate) trait ExecuteCommand {
    fn successful_output(&mut self) -> Result<Output>;
}

impl ExecuteCommand for Command {
    fn successful_output(&mut self) -> Result<Output> {
        let output = self
            .output()
            .with_context(|| format!("Command failed to start: $ {:?}", self))?;
        if output.status.success() {
            Ok(output)
        } else {
            anyhow::bail!(
                "Command failed with exit code: {}; stdout: {:?}; stderr: {:?}; $ {:?}",
                output.status,
                String::from_utf8_lossy(&output.stdout).trim(),
                String::from_utf8_lossy(&output.stderr).trim(),
                self
            )
        }
    }
}

pub mod fs {

    use std::fmt::Display;
    use std::fs::{DirBuilder, Permissions};
    use std::path::PathBuf;

    use walkdir::WalkDir;

    use super::*;

    pub fn move_file(src: &Path, dst: &Path) -> Result<()> {
        if !src.is_file() {
            anyhow::bail!("Source is not a file: {}", src.display())
        }

        std::fs::rename(src, dst).with_context(|| {
            format!("Failed to move {} to {}", src.display(), dst.display())
        })
    }

    /// An entry [`copy_dir`] could not mirror.
    #[derive(Debug)]
    pub struct CopyFailure {
        pub path: PathBuf,
        pub error: anyhow::Error,
    }

    impl Display for CopyFailure {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            write!(f, "Failed to copy {}: {:#}", self.path.display(), self.error)
        }
    }

    #[derive(Debug, Default)]
    pub struct CopyReport {
        pub files: usize,
        pub directories: usize,
        pub failures: Vec<CopyFailure>,
    }

    impl CopyReport {
        pub fn is_complete(&self) -> bool {
            self.failures.is_empty()
        }
    }

    /// Recursively mirrors `src` into `dst`, preserving permission bits.
    ///
    /// Failing to stat `src`, create `dst` or list `src` is an error. Below the
    /// root, every entry that can't be copied is recorded in the returned
    /// report and the walk moves on to its siblings. A directory that can't
    /// be created is skipped together with its contents.
    pub fn copy_dir(src: &Path, dst: &Path) -> Result<CopyReport> {
        let metadata = std::fs::metadata(src)
            .with_context(|| format!("Failed to stat {}", src.display()))?;
        if !metadata.is_dir() {
            anyhow::bail!("{} is not a directory", src.display())
        }
        create_dir(dst, &metadata.permissions())?;
        std::fs::read_dir(src)
            .with_context(|| format!("Failed to read directory {}", src.display()))?;

        let mut report = CopyReport::default();
        let mut entries = WalkDir::new(src).min_depth(1).sort_by_file_name().into_iter();
        while let Some(entry) = entries.next() {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    let path = err.path().unwrap_or(src).to_path_buf();
                    report.failures.push(CopyFailure {
                        path,
                        error: err.into(),
                    });
                    continue;
                }
            };

            let dest = dst.join(entry.path().strip_prefix(src)?);
            let is_dir = entry.file_type().is_dir();
            let result = if is_dir {
                entry
                    .metadata()
                    .map_err(anyhow::Error::from)
                    .and_then(|m| create_dir(&dest, &m.permissions()))
            } else {
                copy_file(entry.path(), &dest)
            };

            match result {
                Ok(()) if is_dir => report.directories += 1,
                Ok(()) => {
                    log::debug!("Copied {}", dest.display());
                    report.files += 1
                }
                Err(error) => {
                    if is_dir {
                        entries.skip_current_dir();
                    }
                    report.failures.push(CopyFailure {
                        path: entry.path().to_path_buf(),
                        error,
                    });
                }
            }
        }

        Ok(report)
    }

    /// Copies the bytes of `src` (following symlinks) and then its permission bits.
    pub fn copy_file(src: &Path, dst: &Path) -> Result<()> {
        std::fs::copy(src, dst).with_context(|| {
            format!("Failed to copy {} to {}", src.display(), dst.display())
        })?;
        let permissions = std::fs::metadata(src)
            .with_context(|| format!("Failed to stat {}", src.display()))?
            .permissions();
        std::fs::set_permissions(dst, permissions)
            .with_context(|| format!("Failed to set permissions of {}", dst.display()))
    }

    fn create_dir(dir: &Path, permissions: &Permissions) -> Result<()> {
        let mut builder = DirBuilder::new();
        builder.recursive(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::{DirBuilderExt, PermissionsExt};
            builder.mode(permissions.mode());
        }
        #[cfg(not(unix))]
        let _ = permissions;

        builder
            .create(dir)
            .with_context(|| format!("Failed to create directory: {}", dir.display()))
    }
}
