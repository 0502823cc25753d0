use std::io::{self, Write};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use tokio::sync::mpsc::{self, UnboundedSender};
use tracing::debug;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use tuneporter::ui::{BannerTimer, Command as UiCommand, UiEvent, UiState, reduce};
use tuneporter::{
    BackendClient, Config, ConversionResult, ConversionWorkflow, FixedDelayPacer, SessionStore,
    SubmitInput, begin_login, parse_callback,
};

#[derive(Parser)]
#[command(name = "tuneporter")]
#[command(about = "Convert playlists between media platforms")]
#[command(version)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Start with the dark theme
    #[arg(long, global = true)]
    dark: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert a source playlist into a destination playlist
    Convert {
        /// Source playlist URL
        #[arg(long)]
        url: String,

        /// Name for the destination playlist
        #[arg(long)]
        name: String,
    },

    /// Login with the source platform and show who you are
    Login,

    /// Show setup guide
    Setup,
}

fn setup_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    setup_tracing(cli.verbose);

    match cli.command {
        Commands::Convert { url, name } => {
            run_convert(url, name, cli.dark).await?;
        }
        Commands::Login => {
            run_login(cli.dark).await?;
        }
        Commands::Setup => {
            show_setup_guide();
        }
    }

    Ok(())
}

/// Render boundary: folds events through the reducer, renders the difference
/// between consecutive snapshots, and executes returned commands exactly once.
struct Boundary {
    app: UiState,
    timer: BannerTimer,
    spinner: Option<ProgressBar>,
    banner_ttl: Duration,
    events_tx: UnboundedSender<UiEvent>,
}

impl Boundary {
    fn new(events_tx: UnboundedSender<UiEvent>, banner_ttl: Duration) -> Self {
        Self {
            app: UiState::default(),
            timer: BannerTimer::default(),
            spinner: None,
            banner_ttl,
            events_tx,
        }
    }

    fn dispatch(&mut self, event: UiEvent) {
        let (next, commands) = reduce(&self.app, event);
        self.render_transition(&next);
        self.app = next;
        for command in commands {
            self.execute(command);
        }
    }

    fn execute(&mut self, command: UiCommand) {
        match command {
            UiCommand::Navigate { url } => {
                println!("\nOpen this URL in your browser to login:");
                println!("{}\n", url);
            }
            UiCommand::RewriteLocation { location } => {
                debug!("login callback consumed, location is now {}", location);
            }
            UiCommand::ScheduleBannerExpiry { generation } => {
                self.timer
                    .arm(generation, self.banner_ttl, self.events_tx.clone());
            }
        }
    }

    fn render_transition(&mut self, next: &UiState) {
        if next.loading && !self.app.loading {
            let spinner = ProgressBar::new_spinner();
            spinner.set_style(
                ProgressStyle::default_spinner()
                    .template("{spinner:.green} {msg}")
                    .unwrap(),
            );
            spinner.enable_steady_tick(Duration::from_millis(120));
            spinner.set_message("Converting...");
            self.spinner = Some(spinner);
        }

        for entry in next.progress.entries().iter().skip(self.app.progress.len()) {
            self.println(format!("  {}", entry));
        }

        if next.banner != self.app.banner
            && let Some(banner) = &next.banner
        {
            let message = if next.theme_dark {
                banner.message.bright_green()
            } else {
                banner.message.green()
            };
            self.println(format!("{}", message));
        }

        if next.error != self.app.error
            && let Some(error) = &next.error
        {
            let message = if next.theme_dark {
                error.bright_red()
            } else {
                error.red()
            };
            self.println(format!("{}", message));
        }

        if !next.loading
            && self.app.loading
            && let Some(spinner) = self.spinner.take()
        {
            spinner.finish_and_clear();
        }
    }

    fn println(&self, line: String) {
        match &self.spinner {
            Some(spinner) => spinner.println(line),
            None => println!("{}", line),
        }
    }
}

/// Run the redirect handshake: fetch the authorization URL, have the user
/// paste the URL they were redirected to, and consume the callback.
async fn authenticate(
    boundary: &mut Boundary,
    store: &mut SessionStore,
    client: &BackendClient,
) -> Result<()> {
    match begin_login(client).await {
        Ok(url) => boundary.dispatch(UiEvent::LoginUrlReceived { url }),
        Err(e) => {
            boundary.dispatch(UiEvent::LoginFailed {
                message: e.to_string(),
            });
            return Ok(());
        }
    }

    print!("Enter the URL you were redirected to: ");
    io::stdout().flush().context("flush stdout")?;

    let mut redirect_url = String::new();
    io::stdin()
        .read_line(&mut redirect_url)
        .context("read redirect URL")?;

    match parse_callback(redirect_url.trim()) {
        Ok(Some(callback)) => {
            store.establish(callback.session.clone());
            boundary.dispatch(UiEvent::SessionEstablished {
                session: callback.session,
                clean_location: callback.clean_location,
            });
        }
        Ok(None) => {
            println!("{}", "No login callback found in that URL".yellow());
        }
        Err(e) => {
            boundary.dispatch(UiEvent::LoginFailed {
                message: e.to_string(),
            });
        }
    }

    Ok(())
}

async fn run_convert(playlist_url: String, playlist_name: String, dark: bool) -> Result<()> {
    println!("{}", "tunePorter".cyan().bold());
    println!("{}", "=".repeat(50));

    let config = Config::from_env().context("Failed to load configuration")?;

    let missing = config.get_missing_config();
    if !missing.is_empty() {
        println!("{}", "Missing configuration:".red());
        for item in &missing {
            println!("   - {}", item);
        }
        println!(
            "\n{}",
            "Please copy .env.example to .env and fill in your settings.".yellow()
        );
        std::process::exit(1);
    }

    let (events_tx, mut events_rx) = mpsc::unbounded_channel();
    let mut boundary = Boundary::new(events_tx.clone(), config.banner_ttl);
    if dark {
        boundary.dispatch(UiEvent::ThemeToggled);
    }

    let client = BackendClient::new(&config.api_url);
    let mut store = SessionStore::new();
    authenticate(&mut boundary, &mut store, &client).await?;

    let Some(session) = store.current().cloned() else {
        std::process::exit(1);
    };
    println!("Welcome, {}", session.display_name_or_default());

    let (workflow_tx, mut workflow_rx) = mpsc::unbounded_channel();
    let workflow = Arc::new(ConversionWorkflow::new(
        client,
        FixedDelayPacer::new(config.stage_delay),
        workflow_tx,
    ));

    let input = SubmitInput {
        playlist_url,
        playlist_name,
    };
    let mut submit = tokio::spawn({
        let workflow = Arc::clone(&workflow);
        let session = session.clone();
        async move { workflow.submit(&input, Some(&session)).await }
    });

    // One loop renders everything: staged workflow events and banner-timer
    // expiries, one at a time, in arrival order.
    let outcome = loop {
        tokio::select! {
            joined = &mut submit => {
                // The run sends before returning; drain what is queued.
                while let Ok(event) = workflow_rx.try_recv() {
                    boundary.dispatch(UiEvent::Workflow(event));
                }
                break joined.context("conversion task panicked")?;
            }
            Some(event) = workflow_rx.recv() => boundary.dispatch(UiEvent::Workflow(event)),
            Some(event) = events_rx.recv() => boundary.dispatch(event),
        }
    };

    if outcome.is_err() {
        // The failure was already rendered through the reducer.
        std::process::exit(1);
    }

    if let Some(result) = &boundary.app.result {
        print_result(result);
    }

    Ok(())
}

async fn run_login(dark: bool) -> Result<()> {
    println!("{}", "tunePorter Login".cyan().bold());
    println!("{}", "=".repeat(50));

    let config = Config::from_env().context("Failed to load configuration")?;

    let missing = config.get_missing_config();
    if !missing.is_empty() {
        println!("{}", "Missing configuration:".red());
        for item in &missing {
            println!("   - {}", item);
        }
        std::process::exit(1);
    }

    let (events_tx, _events_rx) = mpsc::unbounded_channel();
    let mut boundary = Boundary::new(events_tx.clone(), config.banner_ttl);
    if dark {
        boundary.dispatch(UiEvent::ThemeToggled);
    }

    let client = BackendClient::new(&config.api_url);
    let mut store = SessionStore::new();
    authenticate(&mut boundary, &mut store, &client).await?;

    match store.current() {
        Some(session) => {
            println!("Welcome, {}", session.display_name_or_default().green());
        }
        None => {
            std::process::exit(1);
        }
    }

    Ok(())
}

fn print_result(result: &ConversionResult) {
    println!();
    println!("{}", "=".repeat(60));
    println!(
        "Successfully converted {} out of {} songs",
        result.summary.matched.to_string().green(),
        result.summary.total
    );
    println!(
        "Open on the {} platform: {}",
        result.platform,
        result.playlist_url.cyan()
    );
    println!("{}", "=".repeat(60));

    println!(
        "{:>3}  {:<28} {:<20} {:<9} {:<28} {:<20} {:>7}",
        "#", "Source Title", "Source Artist", "Status", "Dest. Title", "Dest. Artist", "Score"
    );
    for (i, track) in result.tracks.iter().enumerate() {
        let status = if track.matched {
            "Found".green()
        } else {
            "Not Found".red()
        };

        match &track.destination {
            Some(destination) => println!(
                "{:>3}  {:<28} {:<20} {:<9} {:<28} {:<20} {:>6.1}%",
                i + 1,
                result_cell(&track.source.title),
                result_cell(&track.source.artist),
                status,
                result_cell(&destination.title),
                result_cell(&destination.artist),
                destination.match_score * 100.0
            ),
            None => println!(
                "{:>3}  {:<28} {:<20} {:<9} {:<28} {:<20} {:>7}",
                i + 1,
                result_cell(&track.source.title),
                result_cell(&track.source.artist),
                status,
                "-",
                "-",
                "-"
            ),
        }
    }
}

/// Truncate long titles so the table stays readable.
fn result_cell(value: &str) -> String {
    if value.chars().count() <= 28 {
        value.to_string()
    } else {
        let truncated: String = value.chars().take(25).collect();
        format!("{}...", truncated)
    }
}

fn show_setup_guide() {
    println!("{}", "tunePorter Setup Guide".cyan().bold());
    println!("{}", "=".repeat(50));

    println!("\n{}", "1. Backend".yellow());
    println!("   - Deploy the tuneporter backend, or run it locally");
    println!("   - Note the base URL it listens on");

    println!("\n{}", "2. Configuration".yellow());
    println!("   - Create a .env file with:");
    println!("     TUNEPORTER_API_URL=http://127.0.0.1:8080");
    println!("     TUNEPORTER_STAGE_DELAY_MS=1000   # optional");
    println!("     TUNEPORTER_BANNER_TTL_SECS=5     # optional");

    println!("\n{}", "3. Usage".yellow());
    println!("   - tuneporter login                      (check your account)");
    println!("   - tuneporter convert --url <playlist URL> --name <new name>");

    println!("\n{}", "Ready to start converting!".green());
}
