use std::ffi::OsString;
use std::path::Path;
use std::process::Command;

use anyhow::{Context, Result};

use crate::utils::*;

/// The `lipo` tool that combines thin binaries into a fat one.
#[derive(Debug, Clone)]
pub struct Lipo {
    program: OsString,
}

impl Default for Lipo {
    fn default() -> Self {
        Self::new("lipo")
    }
}

impl Lipo {
    pub fn new<S: Into<OsString>>(program: S) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// `lipo -create <inputs>... -output <output>`
    pub fn create(&self, inputs: &[&Path], output: &Path) -> Result<()> {
        let mut cmd = Command::new(&self.program);
        cmd.arg("-create").args(inputs).arg("-output").arg(output);

        log::info!("$ {:?}", cmd);
        cmd.successful_output()
            .context("Failed to run lipo to combine static libraries")?;

        Ok(())
    }
}
