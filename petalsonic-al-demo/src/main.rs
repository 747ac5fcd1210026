use clap::Parser;

mod cli;

fn main() -> anyhow::Result<()> {
    let options = cli::Options::parse();

    env_logger::Builder::from_default_env()
        .filter_level(if options.verbose {
            log::LevelFilter::Debug
        } else {
            log::LevelFilter::Info
        })
        .init();

    cli::run(&options).inspect_err(|err| {
        if cli::is_usage_failure(err) {
            log::error!("Audio API called incorrectly: {:#}", err);
        }
    })
}
