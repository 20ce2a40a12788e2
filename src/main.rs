use clap::{ArgAction, Parser, Subcommand};
use dialoguer::theme::ColorfulTheme;
use dialoguer::{Input, Select};
use show_spotter::render;
use show_spotter::{
    AppConfig, DefaultSession, Message, ShowId, ShowSpotterError, ShowSummary, Tab, open_session,
};
use std::path::PathBuf;
use std::process;
use thiserror::Error;
use tracing_subscriber::EnvFilter;

/// Search TV shows on TVMaze and keep a list of favorites
#[derive(Debug, Parser)]
#[command(name = "show-spotter", version, about)]
struct Cli {
    /// Config file to use instead of the default location
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Directory where favorites are stored
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Base URL of the TVMaze API
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Increase log output (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Browse, search and manage favorites interactively (default)
    Interactive,
    /// Search shows by name
    Search {
        /// Search term
        #[arg(required = true, num_args = 1..)]
        term: Vec<String>,
    },
    /// List the catalog from the first page on
    Browse {
        /// Number of pages to load
        #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
        pages: u32,
    },
    /// Show the details of a single show
    Show { id: ShowId },
    /// List or change favorites
    Favorites {
        #[command(subcommand)]
        action: Option<FavoritesCommand>,
    },
}

#[derive(Debug, Subcommand)]
enum FavoritesCommand {
    /// List favorite shows
    List,
    /// Add a show to the favorites, or remove it if already there
    Toggle { id: ShowId },
}

#[derive(Debug, Error)]
enum CliError {
    #[error(transparent)]
    App(#[from] ShowSpotterError),

    #[error("Prompt failed: {0}")]
    Prompt(#[from] dialoguer::Error),

    #[error("Failed to encode JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// A catalog request failed; the message comes from the view state
    #[error("{0}")]
    Failed(String),
}

fn init_logging(verbose: u8) {
    let default_directive = match verbose {
        0 => "show_spotter=warn",
        1 => "show_spotter=info",
        _ => "show_spotter=debug",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(cli: &Cli) -> Result<AppConfig, ShowSpotterError> {
    let mut config = AppConfig::load(cli.config.as_deref())?;

    if let Some(data_dir) = &cli.data_dir {
        config.storage.data_dir = Some(data_dir.clone());
    }
    if let Some(base_url) = &cli.base_url {
        config.catalog.base_url = base_url.clone();
    }

    Ok(config)
}

/// Fails with the view's error message if the last request failed
fn check_error(session: &DefaultSession) -> Result<(), CliError> {
    match &session.state().error {
        Some(message) => Err(CliError::Failed(message.clone())),
        None => Ok(()),
    }
}

fn print_shows(session: &DefaultSession, json: bool) -> Result<(), CliError> {
    let shows = session.displayed_shows();
    if json {
        println!("{}", serde_json::to_string_pretty(shows)?);
    } else {
        println!(
            "{}",
            render::show_list(shows, session.favorites(), session.state().active_tab)
        );
    }
    Ok(())
}

fn run(cli: Cli) -> Result<(), CliError> {
    let config = load_config(&cli)?;
    let mut session = open_session(&config)?;

    match cli.command.unwrap_or(Command::Interactive) {
        Command::Interactive => run_interactive(&mut session)?,
        Command::Search { term } => {
            session.dispatch(Message::SearchSubmitted(term.join(" ")));
            check_error(&session)?;
            print_shows(&session, cli.json)?;
        }
        Command::Browse { pages } => {
            session.dispatch(Message::Refresh);
            for _ in 1..pages {
                check_error(&session)?;
                session.dispatch(Message::MoreShows);
            }
            check_error(&session)?;
            print_shows(&session, cli.json)?;
        }
        Command::Show { id } => {
            session.dispatch(Message::DetailRequested(id));
            check_error(&session)?;
            if let Some(detail) = &session.state().selected_detail {
                if cli.json {
                    println!("{}", serde_json::to_string_pretty(detail)?);
                } else {
                    print!("{}", render::show_detail(detail, session.is_favorite(id)));
                }
            }
        }
        Command::Favorites { action } => match action.unwrap_or(FavoritesCommand::List) {
            FavoritesCommand::List => {
                session.dispatch(Message::TabSelected(Tab::Favorites));
                print_shows(&session, cli.json)?;
            }
            FavoritesCommand::Toggle { id } => toggle_by_id(&mut session, id)?,
        },
    }

    Ok(())
}

/// Toggles a favorite by id, fetching the show first when it is not stored yet
fn toggle_by_id(session: &mut DefaultSession, id: ShowId) -> Result<(), CliError> {
    let stored = session.favorites().iter().find(|s| s.id == id).cloned();

    let show = match stored {
        Some(show) => show,
        None => {
            session.dispatch(Message::DetailRequested(id));
            check_error(session)?;
            let show = session
                .state()
                .selected_detail
                .as_ref()
                .map(|detail| detail.show.clone())
                .ok_or_else(|| CliError::Failed(format!("Show not found: {id}")))?;
            session.dispatch(Message::DetailClosed);
            show
        }
    };

    session.dispatch(Message::FavoriteToggled(show.clone()));
    check_error(session)?;

    if session.is_favorite(id) {
        println!("Added '{}' to favorites.", show.title);
    } else {
        println!("Removed '{}' from favorites.", show.title);
    }
    Ok(())
}

/// Entries of the main interactive menu
enum MenuEntry {
    OpenShow(usize),
    Search,
    Refresh,
    MoreShows,
    SwitchTab(Tab),
    Quit,
}

fn run_interactive(session: &mut DefaultSession) -> Result<(), CliError> {
    let theme = ColorfulTheme::default();

    println!("Show Spotter: TV Show Search & Favorites");
    println!("Loading shows...");
    session.dispatch(Message::Refresh);

    loop {
        let state = session.state();
        let tab = state.active_tab;

        println!("\n{}", render::tab_bar(tab, session.favorites().len()));
        if let Some(error) = &state.error {
            println!("{}", render::error_line(error));
        }
        if tab == Tab::Search && !state.search_term.is_empty() {
            println!("Results for '{}'", state.search_term);
        }

        let shows = session.displayed_shows();
        let mut entries = Vec::new();
        let mut labels = Vec::new();

        if shows.is_empty() {
            println!("{}", render::show_list(shows, session.favorites(), tab));
        }
        for (index, show) in shows.iter().enumerate() {
            entries.push(MenuEntry::OpenShow(index));
            labels.push(render::show_card(show, session.is_favorite(show.id)));
        }

        if tab == Tab::Search {
            entries.push(MenuEntry::Search);
            labels.push("Search...".to_string());
            entries.push(MenuEntry::Refresh);
            labels.push(if state.error.is_some() { "Retry" } else { "Refresh" }.to_string());
            if session.can_load_more() {
                entries.push(MenuEntry::MoreShows);
                labels.push("More shows".to_string());
            }
            entries.push(MenuEntry::SwitchTab(Tab::Favorites));
            labels.push(format!("Favorites ({})", session.favorites().len()));
        } else {
            entries.push(MenuEntry::SwitchTab(Tab::Search));
            labels.push("Back to search".to_string());
        }
        entries.push(MenuEntry::Quit);
        labels.push("Quit".to_string());

        let choice = Select::with_theme(&theme)
            .with_prompt("Choose a show or an action")
            .items(&labels)
            .default(0)
            .max_length(15)
            .interact()?;

        match &entries[choice] {
            MenuEntry::OpenShow(index) => {
                let show = session.displayed_shows()[*index].clone();
                show_actions(session, &theme, show)?;
            }
            MenuEntry::Search => {
                let current = session.state().search_term.clone();
                let term: String = Input::with_theme(&theme)
                    .with_prompt("Search (leave empty to browse)")
                    .with_initial_text(current)
                    .allow_empty(true)
                    .interact_text()?;
                println!("Loading shows...");
                session.dispatch(Message::SearchSubmitted(term));
            }
            MenuEntry::Refresh => {
                println!("Loading shows...");
                session.dispatch(Message::Refresh);
            }
            MenuEntry::MoreShows => {
                println!("Loading shows...");
                session.dispatch(Message::MoreShows);
            }
            MenuEntry::SwitchTab(tab) => session.dispatch(Message::TabSelected(*tab)),
            MenuEntry::Quit => return Ok(()),
        }
    }
}

fn favorite_label(favorite: bool) -> &'static str {
    if favorite {
        "Remove from favorites"
    } else {
        "Add to favorites"
    }
}

/// Card actions: open details or toggle the favorite
fn show_actions(
    session: &mut DefaultSession,
    theme: &ColorfulTheme,
    show: ShowSummary,
) -> Result<(), CliError> {
    let labels = [
        "Details",
        favorite_label(session.is_favorite(show.id)),
        "Back",
    ];

    let choice = Select::with_theme(theme)
        .with_prompt(&show.title)
        .items(&labels)
        .default(0)
        .interact()?;

    match choice {
        0 => {
            session.dispatch(Message::DetailRequested(show.id));
            if session.state().selected_detail.is_some() {
                detail_view(session, theme)?;
            }
        }
        1 => session.dispatch(Message::FavoriteToggled(show)),
        _ => {}
    }
    Ok(())
}

/// The detail view stays open until the user closes it
fn detail_view(session: &mut DefaultSession, theme: &ColorfulTheme) -> Result<(), CliError> {
    loop {
        let Some(detail) = session.state().selected_detail.clone() else {
            return Ok(());
        };
        let favorite = session.is_favorite(detail.show.id);

        println!("\n{}", render::show_detail(&detail, favorite));
        if let Some(error) = &session.state().error {
            println!("{}", render::error_line(error));
        }

        let labels = [favorite_label(favorite), "Close"];
        let choice = Select::with_theme(theme)
            .items(&labels)
            .default(1)
            .interact()?;

        if choice == 0 {
            session.dispatch(Message::FavoriteToggled(detail.show));
        } else {
            session.dispatch(Message::DetailClosed);
        }
    }
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}
