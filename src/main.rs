use std::process::ExitCode;

use clap::Parser;
use log::debug;

use tunematch::app::App;
use tunematch::cli::Cli;
use tunematch::config::Config;
use tunematch::error::RecommendError;

fn main() -> ExitCode {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            // Domain failures get their own exit code; anything else is 1.
            let code = match err.downcast_ref::<RecommendError>() {
                Some(domain) => {
                    debug!("request failed with {}", domain.kind());
                    domain.kind().exit_code()
                }
                None => 1,
            };
            eprintln!("error: {err:#}");
            ExitCode::from(code)
        }
    }
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    let config = Config::resolve(cli)?;
    let app = App::new(config);
    let stdout = std::io::stdout();
    app.run(&cli.command, &mut stdout.lock())
}
