use std::{path::PathBuf, sync::Arc};

use clap::{
    CommandFactory, Parser, Subcommand,
    builder::{
        Styles,
        styling::{AnsiColor, Effects},
    },
};
use clap_complete::{Shell, generate};
use tokio::sync::Mutex;

use vibelist::{cli, config, error, types::PkceToken, vibe::PopularityPolicy};

fn styles() -> Styles {
    Styles::styled()
        .header(AnsiColor::White.on_default() | Effects::BOLD)
        .usage(AnsiColor::White.on_default() | Effects::BOLD)
        .literal(AnsiColor::BrightBlue.on_default())
        .placeholder(AnsiColor::BrightGreen.on_default())
}

#[derive(Parser, Debug, Clone)]
#[clap(
  version = env!("CARGO_PKG_VERSION"),
  name=env!("CARGO_PKG_NAME"),
  bin_name=env!("CARGO_PKG_NAME"),
  author=env!("CARGO_PKG_AUTHORS"),
  about=env!("CARGO_PKG_DESCRIPTION"),
  styles=styles(),
)]
struct Cli {
    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    #[clap(about = "Authorize vibelist with your Spotify account")]
    Auth,

    #[clap(about = "Show the catalog queries planned for a vibe file")]
    Plan(PlanOptions),

    #[clap(about = "Select candidate tracks for a vibe file")]
    Candidates(CandidatesOptions),

    #[clap(about = "Select tracks for a vibe file and save them as a playlist")]
    Playlist(PlaylistOptions),

    #[clap(about = "Run the HTTP API and OAuth callback server")]
    Serve,

    Completions(CompletionsOption),
}

#[derive(Parser, Debug, Clone)]
pub struct PlanOptions {
    /// JSON vibe descriptor
    #[clap(long)]
    vibe: PathBuf,
}

#[derive(Parser, Debug, Clone)]
pub struct CandidatesOptions {
    /// JSON vibe descriptor
    #[clap(long)]
    vibe: PathBuf,

    /// mainstream, indie or mixed
    #[clap(long, default_value_t = PopularityPolicy::Mixed)]
    policy: PopularityPolicy,

    /// Fixed random seed for a repeatable selection
    #[clap(long)]
    seed: Option<u64>,
}

#[derive(Parser, Debug, Clone)]
pub struct PlaylistOptions {
    /// JSON vibe descriptor
    #[clap(long)]
    vibe: PathBuf,

    /// mainstream, indie or mixed
    #[clap(long, default_value_t = PopularityPolicy::Mixed)]
    policy: PopularityPolicy,

    /// Playlist name, derived from the vibe when omitted
    #[clap(long)]
    name: Option<String>,

    /// JPEG cover image
    #[clap(long)]
    cover: Option<PathBuf>,

    #[clap(long)]
    public: bool,
}

#[derive(Parser, Debug, Clone)]
pub struct CompletionsOption {
    shell: Shell,
}

#[tokio::main]
async fn main() {
    if let Err(e) = config::load_env().await {
        error!("Cannot load environment. Err: {}", e);
    }

    let cli = Cli::parse();

    match cli.command {
        Command::Auth => {
            let oauth_result: Arc<Mutex<Option<PkceToken>>> = Arc::new(Mutex::new(None));
            cli::auth(Arc::clone(&oauth_result)).await;
        }
        Command::Plan(opt) => cli::plan(&opt.vibe).await,
        Command::Candidates(opt) => cli::candidates(&opt.vibe, opt.policy, opt.seed).await,
        Command::Playlist(opt) => {
            cli::playlist(&opt.vibe, opt.policy, opt.name, opt.cover, opt.public).await
        }
        Command::Serve => cli::serve().await,
        Command::Completions(opt) => {
            let mut cmd = Cli::command_for_update();
            let name = cmd.get_name().to_string();
            generate(opt.shell, &mut cmd, name, &mut std::io::stdout())
        }
    }
}
