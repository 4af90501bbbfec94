//! repotree CLI
//!
//! Usage: repotree [REPO] [OPTIONS]

use clap::Parser;
use repotree::api::{ parse_tree_listing, GitHubClient };
use repotree::browse::{ BrowseOutcome, Browser };
use repotree::config::{ default_path, load_config, Config };
use repotree::export::{ export, write_export, ExportFormat };
use repotree::repo_url::{ self, RepoRef };
use repotree::sequence::RequestSequence;
use repotree::state::StateStore;
use repotree::{ build, filter, Directory, Error, Result };
use std::fs;
use std::path::{ Path, PathBuf };
use tracing::{ debug, info, warn };

/// Render a GitHub repository's file tree as an ASCII outline
#[derive(Parser, Debug)]
#[command(name = "repotree")]
#[command(version, about, long_about = None)]
struct Cli {
    /// owner/repo, owner/repo@ref or a github.com URL. Defaults to the last one used
    repo: Option<String>,

    /// Branch, tag or commit to list (defaults to the repository's default branch)
    #[arg(long = "ref", conflicts_with = "input")]
    reference: Option<String>,

    /// Output format (defaults to the output file's extension, then the config)
    #[arg(short, long, value_enum)]
    format: Option<ExportFormat>,

    /// Write the export to this file, or into this directory, instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Only keep names containing this text (case-insensitive)
    #[arg(long)]
    filter: Option<String>,

    /// Browse the tree in the terminal
    #[arg(short, long)]
    interactive: bool,

    /// Read a saved trees API response instead of fetching
    #[arg(long)]
    input: Option<PathBuf>,

    #[arg(long)]
    config: Option<PathBuf>,

    #[arg(long)]
    state_file: Option<PathBuf>,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

/// Fetches listings, dropping any response that a newer request has superseded.
struct Loader {
    client: GitHubClient,
    sequence: RequestSequence,
}

impl Loader {
    fn new(config: &Config) -> Self {
        Loader {
            client: GitHubClient::new(&config.api_base_url, &config.user_agent),
            sequence: RequestSequence::new(),
        }
    }

    async fn load(&self, repo: &RepoRef) -> Result<Option<Directory>> {
        let ticket = self.sequence.issue();
        let listing = self.client.fetch_tree(repo).await?;
        info!(repo = %repo, entries = listing.entries.len(), "fetched tree");
        Ok(self.sequence.accept(ticket, listing).map(|listing| build(listing.entries)))
    }
}

fn resolve_repo(cli: &Cli, store: &StateStore) -> Result<RepoRef> {
    let input = match (&cli.repo, &store.state().last_repository) {
        (Some(repo), _) => repo.clone(),
        (None, Some(last)) => {
            info!(repo = %last, "using last repository");
            last.clone()
        }
        (None, None) => {
            return Err(Error::NoRepository);
        }
    };
    Ok(repo_url::parse(&input)?.with_reference(cli.reference.clone()))
}

fn output_target(output: &Path, label: &str, format: ExportFormat) -> PathBuf {
    if output.is_dir() {
        let name = label.replace(['/', '@'], "_");
        output.join(format!("{}.{}", name, format.extension()))
    } else {
        output.to_path_buf()
    }
}

async fn browse(
    loader: &Loader,
    store: &mut StateStore,
    label: &str,
    root: Directory,
    cli: &Cli,
    config: &Config
) -> Result<()> {
    let mut browser = Browser::new(label, root, config.render_style());
    if let Some(term) = &cli.filter {
        browser.apply_filter(term);
    }
    loop {
        match browser.listen_terminal()? {
            BrowseOutcome::Exit => {
                return Ok(());
            }
            BrowseOutcome::Open(input) => {
                let repo = match repo_url::parse(&input) {
                    Ok(repo) => repo,
                    Err(err) => {
                        browser.show_error(err.to_string());
                        continue;
                    }
                };
                match loader.load(&repo).await {
                    Ok(Some(root)) => {
                        browser.replace_tree(&repo.to_string(), root);
                        store.set_last_repository(&repo.to_string());
                        store.save()?;
                    }
                    Ok(None) => debug!(repo = %repo, "newer request pending, keeping view"),
                    Err(err) => {
                        warn!(error = %err, "open failed");
                        browser.show_error(err.to_string());
                    }
                }
            }
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config_path = cli.config.clone().unwrap_or_else(|| default_path("config.yaml"));
    let config = load_config(&config_path)?;
    let state_path = cli.state_file.clone().unwrap_or_else(|| default_path("state.yaml"));
    let mut store = StateStore::load(&state_path)?;
    let loader = Loader::new(&config);

    let (label, root) = match &cli.input {
        Some(input) => {
            let body = fs::read_to_string(input)?;
            let listing = parse_tree_listing(&body)?;
            let label = match &cli.repo {
                Some(repo) => repo.clone(),
                None => input.display().to_string(),
            };
            (label, build(listing.entries))
        }
        None => {
            let repo = resolve_repo(&cli, &store)?;
            let Some(root) = loader.load(&repo).await? else {
                return Ok(());
            };
            store.set_last_repository(&repo.to_string());
            store.save()?;
            (repo.to_string(), root)
        }
    };

    if cli.interactive {
        return browse(&loader, &mut store, &label, root, &cli, &config).await;
    }

    let root = match &cli.filter {
        Some(term) => filter(&root, term),
        None => root,
    };
    let format = cli.format
        .or_else(|| cli.output.as_deref().and_then(ExportFormat::from_path))
        .unwrap_or(config.format);
    let contents = export(format, &label, &root, &config.render_style())?;

    match &cli.output {
        Some(output) => write_export(&output_target(output, &label, format), &contents),
        None => {
            print!("{}", contents);
            Ok(())
        }
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    repotree::logging::init(cli.verbose);

    if let Err(err) = run(cli).await {
        debug!(error = ?err, "exiting with error");
        eprintln!("error: {}", err);
        std::process::exit(1);
    }
}
