use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "focusplan-cli", version, about = "Focusplan CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Schedule a task onto the calendar
    Schedule(commands::schedule::ScheduleArgs),
    /// Preview the chunk plan and candidate slots without creating events
    Plan(commands::plan::PlanArgs),
}

fn main() {
    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Schedule(args) => commands::schedule::run(args),
        Commands::Plan(args) => commands::plan::run(args),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
