use crate::play::{run_play, run_score, PlayArgs, ScoreArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use pathway_quiz::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Pathway Quiz",
    about = "Serve or play the career pathway quiz from the command line",
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
    /// Play the quiz interactively in the terminal
    Play(PlayArgs),
    /// Score a fixed list of answers and print the results page
    Score(ScoreArgs),
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
        Command::Play(args) => run_play(args),
        Command::Score(args) => run_score(args),
    }
}
