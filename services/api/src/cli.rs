use crate::commands::{run_report, run_set_status, run_submit, ReportArgs, SetStatusArgs, SubmitArgs};
use crate::demo::{run_demo, DemoArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use complaint_desk::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Complaint Desk",
    about = "Run the complaint desk service or work with the complaint store from the command line",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Print complaint statistics and the most recent complaints
    Report(ReportArgs),
    /// File a new complaint with the store
    Submit(SubmitArgs),
    /// Move a complaint to another status
    SetStatus(SetStatusArgs),
    /// Walk through a seeded in-memory complaint desk
    Demo(DemoArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
    /// Override the configured complaint store base URL
    #[arg(long)]
    pub(crate) store_url: Option<String>,
    /// Serve from a process-local store instead of the remote one
    #[arg(long)]
    pub(crate) in_memory: bool,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Report(args) => run_report(args).await,
        Command::Submit(args) => run_submit(args).await,
        Command::SetStatus(args) => run_set_status(args).await,
        Command::Demo(args) => run_demo(args).await,
    }
}
