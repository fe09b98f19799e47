use std::process;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    if let Err(e) = fat_framework::cli_main() {
        eprintln!("error: {:#}", e);
        process::exit(1);
    }
}
