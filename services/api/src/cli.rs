use crate::demo::{run_demo, run_plan_report, DemoArgs, PlanReportArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use perf_eval::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Performance Evaluation Service",
    about = "Run and demonstrate KPI-driven performance evaluations from the command line",
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
    /// Score KPI work plans without starting the service
    Plans {
        #[command(subcommand)]
        command: PlansCommand,
    },
    /// Run an end-to-end demo: assign a KPI sheet, record progress, auto-evaluate
    Demo(DemoArgs),
}

#[derive(Subcommand, Debug)]
enum PlansCommand {
    /// Print efficiency and status for every KPI in a sheet
    Report(PlanReportArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Plans {
            command: PlansCommand::Report(args),
        } => run_plan_report(args),
        Command::Demo(args) => run_demo(args),
    }
}
