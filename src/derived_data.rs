use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::apple_platform::IosSdk;

pub const DEFAULT_BUILD_CONFIG: &str = "Release";

/// Xcode's per-user build cache, holding one `<Project>-<hash>` directory per project.
#[derive(Debug, Clone)]
pub struct DerivedData {
    root: PathBuf,
}

impl DerivedData {
    pub fn for_user(user: &str) -> Self {
        Self::at(
            Path::new("/Users")
                .join(user)
                .join("Library/Developer/Xcode/DerivedData"),
        )
    }

    pub fn at<P: Into<PathBuf>>(root: P) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Returns the first project directory, in name order, whose name starts with `prefix`.
    pub fn find_project(&self, prefix: &str) -> Result<ProjectBuild> {
        match std::fs::metadata(&self.root) {
            Ok(_) => {}
            Err(err) if err.kind() == ErrorKind::NotFound => anyhow::bail!(
                "Can't find Xcode derived data folder at {}",
                self.root.display()
            ),
            Err(err) => {
                return Err(err).with_context(|| {
                    format!(
                        "Failed to stat derived data folder {}",
                        self.root.display()
                    )
                })
            }
        }

        let mut names = std::fs::read_dir(&self.root)
            .with_context(|| {
                format!(
                    "Failed to read contents of derived data folder {}",
                    self.root.display()
                )
            })?
            .map(|entry| entry.context("Can't read directory entry"))
            .collect::<Result<Vec<_>>>()?
            .into_iter()
            .filter(|entry| entry.path().is_dir())
            .filter_map(|entry| entry.file_name().into_string().ok())
            .collect::<Vec<_>>();
        names.sort();

        let name = names
            .into_iter()
            .find(|name| name.starts_with(prefix))
            .with_context(|| {
                format!(
                    "No project matching {:?} found in {}",
                    prefix,
                    self.root.display()
                )
            })?;

        Ok(ProjectBuild {
            dir: self.root.join(name),
        })
    }
}

/// A project's directory inside DerivedData.
#[derive(Debug, Clone)]
pub struct ProjectBuild {
    dir: PathBuf,
}

impl ProjectBuild {
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn location(&self, build_config: &str, sdk: IosSdk) -> BuildLocation {
        BuildLocation {
            project_dir: self.dir.clone(),
            build_config: build_config.to_string(),
            sdk,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildLocation {
    pub project_dir: PathBuf,
    pub build_config: String,
    pub sdk: IosSdk,
}

impl BuildLocation {
    /// `Build/Products/<config>-<sdk>` under the project directory.
    pub fn products_dir(&self) -> PathBuf {
        self.project_dir
            .join("Build/Products")
            .join(format!("{}-{}", self.build_config, self.sdk))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn for_user_points_at_xcode_cache() {
        let derived_data = DerivedData::for_user("alice");
        assert_eq!(
            derived_data.root(),
            Path::new("/Users/alice/Library/Developer/Xcode/DerivedData")
        );
    }

    #[test]
    fn missing_root_is_an_error() {
        let dir = tempdir().unwrap();
        let err = DerivedData::at(dir.path().join("nope"))
            .find_project("MyLib")
            .unwrap_err();
        assert!(err.to_string().contains("Can't find Xcode derived data folder"));
    }

    #[test]
    fn unreachable_root_is_a_stat_error() {
        let dir = tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, b"").unwrap();

        let err = DerivedData::at(blocker.join("DerivedData"))
            .find_project("MyLib")
            .unwrap_err();
        assert!(
            err.to_string().contains("Failed to stat derived data folder"),
            "{}",
            err
        );
    }

    #[test]
    fn picks_first_matching_directory_in_name_order() {
        let dir = tempdir().unwrap();
        for name in ["Other-aaaa", "MyLib-zzzz", "MyLib-bbbb"] {
            std::fs::create_dir(dir.path().join(name)).unwrap();
        }
        // Files never match, even with the right prefix.
        std::fs::write(dir.path().join("MyLib-0000"), b"").unwrap();

        let project = DerivedData::at(dir.path()).find_project("MyLib").unwrap();
        assert_eq!(project.dir(), dir.path().join("MyLib-bbbb"));
    }

    #[test]
    fn no_matching_project_is_an_error() {
        let dir = tempdir().unwrap();
        std::fs::create_dir(dir.path().join("Other-aaaa")).unwrap();

        let err = DerivedData::at(dir.path())
            .find_project("MyLib")
            .unwrap_err();
        assert!(err.to_string().contains("No project matching \"MyLib\""));
    }

    #[test]
    fn products_dirs_follow_xcode_layout() {
        let dir = tempdir().unwrap();
        std::fs::create_dir(dir.path().join("MyLib-abcd")).unwrap();
        let project = DerivedData::at(dir.path()).find_project("MyLib").unwrap();

        let simulator = project.location("Debug", IosSdk::Simulator);
        let device = project.location("Debug", IosSdk::Device);
        assert_eq!(
            simulator.products_dir(),
            dir.path()
                .join("MyLib-abcd/Build/Products/Debug-iphonesimulator")
        );
        assert_eq!(
            device.products_dir(),
            dir.path().join("MyLib-abcd/Build/Products/Debug-iphoneos")
        );
        assert_eq!(device.project_dir, dir.path().join("MyLib-abcd"));
    }
}
