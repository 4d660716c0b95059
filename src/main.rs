use clap::Parser;
use docvec::cli::Cli;
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = Cli::parse();

    let level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false);

    // keep stdout parseable when it carries JSON
    if cli.json_output() {
        subscriber.with_writer(std::io::stderr).init();
    } else {
        subscriber.init();
    }

    match cli.run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {:#}", err);
            ExitCode::from(Cli::exit_status(&err))
        }
    }
}
