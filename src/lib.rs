pub mod apple_platform;
mod cli;
pub mod derived_data;
pub mod fat_framework;
pub mod framework;
pub mod info_plist;
pub mod lipo;
pub mod utils;

pub fn cli_main() -> anyhow::Result<()> {
    cli::Cli::execute()
}
