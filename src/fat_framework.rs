use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

use crate::apple_platform::IosSdk;
use crate::derived_data::{DerivedData, ProjectBuild};
use crate::framework::FrameworkBundle;
use crate::info_plist;
use crate::lipo::Lipo;
use crate::utils::fs::{self, CopyReport};

/// Inputs of a single merge run.
#[derive(Debug, Clone)]
pub struct Options {
    pub project: String,
    pub build_config: String,
    pub framework: String,
    pub output: PathBuf,
}

/// Result of a successful run.
#[derive(Debug)]
pub struct Outcome {
    pub framework: PathBuf,
    pub copy: CopyReport,
}

/// Finds the project's build products in `derived_data` and turns its device
/// framework into a fat one, copied to `options.output`.
pub fn create_fat_framework(
    derived_data: &DerivedData,
    options: &Options,
    lipo: &Lipo,
) -> Result<Outcome> {
    let project = derived_data.find_project(&options.project)?;
    log::info!("Using derived data of {}", project.dir().display());

    FatFramework::from_project(&project, &options.build_config, &options.framework)
        .create(lipo, &options.output)
}

// The same framework built once for the simulator and once for devices. The
// device bundle is patched in place and becomes the fat framework.
pub struct FatFramework {
    simulator: FrameworkBundle,
    device: FrameworkBundle,
}

impl FatFramework {
    pub fn new(name: &str, simulator_products: &Path, device_products: &Path) -> Self {
        Self {
            simulator: FrameworkBundle::new(name, simulator_products),
            device: FrameworkBundle::new(name, device_products),
        }
    }

    pub fn from_project(project: &ProjectBuild, build_config: &str, name: &str) -> Self {
        Self::new(
            name,
            &project
                .location(build_config, IosSdk::Simulator)
                .products_dir(),
            &project.location(build_config, IosSdk::Device).products_dir(),
        )
    }

    pub fn create(&self, lipo: &Lipo, output_dir: &Path) -> Result<Outcome> {
        self.preview();

        self.merge_binaries(lipo)?;
        info_plist::declare_supported_platforms(&self.device.info_plist(), &IosSdk::all())?;

        let dest = output_dir.join(self.device.dir_name());
        let copy = fs::copy_dir(&self.device.dir(), &dest).with_context(|| {
            format!(
                "Failed to copy {} to {}",
                self.device.dir().display(),
                dest.display()
            )
        })?;
        for failure in &copy.failures {
            log::warn!("{}", failure);
        }
        log::info!(
            "Copied {} files and {} directories to {}",
            copy.files,
            copy.directories,
            dest.display()
        );

        Ok(Outcome {
            framework: dest,
            copy,
        })
    }

    fn preview(&self) {
        log::info!("Creating fat framework {}:", self.device.dir_name());
        for bundle in [&self.simulator, &self.device] {
            log::info!("  - {}", bundle.binary().display());
        }
    }

    // The merged binary is written next to the device bundle, then moved over
    // the thin one inside it.
    fn merge_binaries(&self, lipo: &Lipo) -> Result<()> {
        let simulator = self.simulator.binary();
        let device = self.device.binary();
        for binary in [&simulator, &device] {
            if !binary.is_file() {
                anyhow::bail!("Library not found: {}", binary.display())
            }
        }

        let merged = self.device.products_dir().join(self.device.name());
        lipo.create(&[simulator.as_path(), device.as_path()], &merged)?;

        fs::move_file(&merged, &device).context("Failed to move combined static library")
    }
}
