use std::env;
use std::ffi::OsString;
use std::path::PathBuf;

use anyhow::Result;
use clap::builder::NonEmptyStringValueParser;
use clap::Parser;

use crate::derived_data::{DerivedData, DEFAULT_BUILD_CONFIG};
use crate::fat_framework::{create_fat_framework, Options};
use crate::lipo::Lipo;

/// Merges the simulator and device builds of an Xcode framework into one fat framework.
#[derive(Parser, Debug)]
#[command(name = "fat-framework", version)]
pub(crate) struct Cli {
    /// The macOS user whose Xcode derived data holds the builds
    #[arg(long, value_parser = NonEmptyStringValueParser::new(), allow_hyphen_values = true)]
    user: String,
    /// Prefix of the project's directory in derived data
    #[arg(long, value_parser = NonEmptyStringValueParser::new(), allow_hyphen_values = true)]
    project: String,
    /// The scheme build configuration of the framework
    #[arg(long = "buildconfig", default_value = DEFAULT_BUILD_CONFIG, value_parser = NonEmptyStringValueParser::new(), allow_hyphen_values = true)]
    build_config: String,
    /// Name of the static library framework
    #[arg(long, value_parser = NonEmptyStringValueParser::new(), allow_hyphen_values = true)]
    framework: String,
    /// Folder the fat framework is copied to
    #[arg(long, value_parser = NonEmptyStringValueParser::new(), allow_hyphen_values = true)]
    output: String,
}

// Long flags that may also be spelled with a single dash, e.g. `-user alice`.
const LONG_FLAGS: &[&str] = &[
    "user",
    "project",
    "buildconfig",
    "framework",
    "output",
    "help",
    "version",
];

const SWITCHES: &[&str] = &["help", "version"];

impl Cli {
    pub fn execute() -> Result<()> {
        let args = Cli::parse_from(normalize_args(env::args_os()));
        args.run()
    }

    fn run(self) -> Result<()> {
        let options = Options {
            project: self.project,
            build_config: self.build_config,
            framework: self.framework,
            output: PathBuf::from(self.output),
        };

        let outcome = create_fat_framework(
            &DerivedData::for_user(&self.user),
            &options,
            &Lipo::default(),
        )?;

        println!(
            "created fat library with simulator support at {}",
            outcome.framework.display()
        );
        Ok(())
    }
}

// Rewrites `-flag` to `--flag`, leaving flag values and everything after `--` untouched.
fn normalize_args<I>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = OsString>,
{
    let mut normalized = Vec::new();
    let mut expects_value = false;
    let mut args = args.into_iter();
    while let Some(arg) = args.next() {
        let Some(s) = arg.to_str() else {
            expects_value = false;
            normalized.push(arg);
            continue;
        };

        if expects_value {
            expects_value = false;
            normalized.push(arg);
        } else if s == "--" {
            normalized.push(arg);
            normalized.extend(args.by_ref());
        } else if let Some(flag) = long_flag(s) {
            expects_value = !flag.contains('=') && !SWITCHES.contains(&flag);
            if s.starts_with("--") {
                normalized.push(arg);
            } else {
                normalized.push(OsString::from(format!("-{}", s)));
            }
        } else {
            normalized.push(arg);
        }
    }
    normalized
}

// `user` for `-user`, `--user` or `-user=alice`; `None` for anything that isn't a known flag.
fn long_flag(arg: &str) -> Option<&str> {
    let flag = arg
        .strip_prefix("--")
        .or_else(|| arg.strip_prefix('-'))
        .filter(|flag| !flag.starts_with('-'))?;
    let name = flag.split('=').next().unwrap_or(flag);
    LONG_FLAGS.contains(&name).then_some(flag)
}
