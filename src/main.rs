//! AVV tracker CLI entry point.

use avv::cli::{commands, Cli, Commands};
use avv::error::Error;
use clap::Parser;
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = Cli::parse();

    if cli.quiet {
        avv::QUIET.store(true, std::sync::atomic::Ordering::Relaxed);
    }
    if cli.no_color {
        colored::control::set_override(false);
    }

    // Set up tracing based on verbosity
    init_tracing(cli.verbose, cli.quiet);

    // Resolve effective JSON mode: --json OR non-TTY stdout
    let json = cli.json || !std::io::IsTerminal::is_terminal(&std::io::stdout());

    // Run the command and handle errors
    match run(&cli, json) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            if json {
                eprintln!("{}", e.to_structured_json());
            } else if !cli.quiet {
                if let Some(hint) = e.hint() {
                    eprintln!("Error: {e}\n  Hint: {hint}");
                } else {
                    eprintln!("Error: {e}");
                }
            }
            ExitCode::from(e.exit_code())
        }
    }
}

fn init_tracing(verbose: u8, quiet: bool) {
    use tracing_subscriber::EnvFilter;

    if quiet {
        return;
    }

    // Honor RUST_LOG if set, otherwise use verbosity flag
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else {
        match verbose {
            0 => EnvFilter::new("warn"),
            1 => EnvFilter::new("info"),
            2 => EnvFilter::new("debug,rusqlite=info"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .without_time()
        .init();
}

fn run(cli: &Cli, json: bool) -> Result<(), Error> {
    match &cli.command {
        Commands::Init { force } => commands::init::execute(cli.db.as_ref(), *force, json),
        Commands::Version => commands::version::execute(json),

        Commands::Add(args) => commands::opportunity::execute_add(args, cli.db.as_ref(), json),
        Commands::List(args) => commands::opportunity::execute_list(args, cli.db.as_ref(), json),
        Commands::Show { id } => commands::opportunity::execute_show(id, cli.db.as_ref(), json),
        Commands::Update(args) => {
            commands::opportunity::execute_update(args, cli.db.as_ref(), json)
        }
        Commands::Move { id, status } => {
            commands::opportunity::execute_move(id, status, cli.db.as_ref(), json)
        }
        Commands::Delete { id } => {
            commands::opportunity::execute_delete(id, cli.db.as_ref(), json)
        }

        Commands::Comment { command } => commands::comment::execute(command, cli.db.as_ref(), json),
        Commands::Attach { command } => {
            commands::attachment::execute(command, cli.db.as_ref(), json)
        }
        Commands::History { id, limit } => {
            commands::history::execute(id, *limit, cli.db.as_ref(), json)
        }
        Commands::Notify { command } => commands::notify::execute(command, cli.db.as_ref(), json),

        Commands::Board => commands::board::execute_board(cli.db.as_ref(), json),
        Commands::Stats => commands::board::execute_stats(cli.db.as_ref(), json),
        Commands::Snapshot { output } => {
            commands::snapshot::execute(output, cli.db.as_ref(), json)
        }

        Commands::Completions { shell } => commands::completions::execute(shell),
    }
}
