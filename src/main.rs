mod config;
mod db;
mod logging;
mod models;
mod store;
mod ui;

use std::io;
use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::Parser;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{self, EnterAlternateScreen, LeaveAlternateScreen},
};
use tracing::{error, info};
use tui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};

use crate::config::Config;
use crate::db::KeyValueStore;
use crate::store::ClientStore;
use crate::ui::{
    client_form::{
        handle_input as handle_client_form_input, render_client_form, saved_summary,
        ClientFormAction, ClientFormState, FormMode,
    },
    clients::{handle_input as handle_clients_input, render_clients, ClientAction, ClientsState},
    components::notice::Notice,
    home::{handle_input as handle_home_input, render_home, HomeAction, HomeState},
};

/// F&S Academia - gerenciamento de clientes
#[derive(Parser, Debug)]
#[command(name = "fs_academia", version)]
struct Cli {
    /// SQLite URL of the client database (overrides DATABASE_URL)
    #[arg(long)]
    database_url: Option<String>,

    /// Log file (overrides LOG_FILE)
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    fn apply(&self, config: &mut Config) {
        if let Some(url) = &self.database_url {
            config.database_url = url.clone();
        }
        if let Some(path) = &self.log_file {
            config.log_file = path.display().to_string();
        }
        match self.verbose {
            0 => {}
            1 => config.log_level = "debug".to_string(),
            _ => config.log_level = "trace".to_string(),
        }
    }
}

// Represents the current screen in the app
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum AppScreen {
    Home,
    CreateClient,
    Clients,
    EditClient,
}

// Main application state
struct AppState<S> {
    store: ClientStore<S>,
    screen: AppScreen,
    home_state: HomeState,
    form_state: Option<ClientFormState>,
    clients_state: Option<ClientsState>,
}

impl<S: KeyValueStore> AppState<S> {
    fn new(store: ClientStore<S>) -> Self {
        Self {
            store,
            screen: AppScreen::Home,
            home_state: HomeState::new(),
            form_state: None,
            clients_state: None,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let mut config = config::init()?;
    cli.apply(&mut config);
    logging::init_logging(Path::new(&config.log_file), &config.log_level)?;
    println!("Initializing F&S Academia...");

    // Open the on-device storage
    let db = db::init(&config).await?;
    info!(database_url = config.database_url(), "storage opened");

    // Setup terminal
    terminal::enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app_state = AppState::new(ClientStore::new(db));

    // Run the main app loop
    let result = run_app(&mut terminal, &mut app_state).await;

    // Restore terminal
    terminal::disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    app_state.store.storage().close().await;

    // Show any error message
    if let Err(err) = result {
        error!(%err, "application loop failed");
        println!("Error: {}", err);
    }

    println!("Até logo!");

    Ok(())
}

async fn run_app<B: Backend, S: KeyValueStore>(
    terminal: &mut Terminal<B>,
    app_state: &mut AppState<S>,
) -> Result<()> {
    loop {
        // Render current screen
        terminal.draw(|f| match app_state.screen {
            AppScreen::Home => render_home(f, &mut app_state.home_state),
            AppScreen::CreateClient | AppScreen::EditClient => {
                if let Some(state) = &mut app_state.form_state {
                    render_client_form(f, state);
                }
            }
            AppScreen::Clients => {
                if let Some(state) = &mut app_state.clients_state {
                    render_clients(f, state);
                }
            }
        })?;

        // Handle input for current screen
        match app_state.screen {
            AppScreen::Home => {
                if let Some(action) = handle_home_input(&mut app_state.home_state)? {
                    if on_home_action(app_state, action).await {
                        break;
                    }
                }
            }
            AppScreen::CreateClient | AppScreen::EditClient => {
                let action = match app_state.form_state.as_mut() {
                    Some(state) => handle_client_form_input(state)?,
                    None => None,
                };
                if let Some(action) = action {
                    on_client_form_action(app_state, action).await;
                }
            }
            AppScreen::Clients => {
                let action = match app_state.clients_state.as_mut() {
                    Some(state) => handle_clients_input(state)?,
                    None => None,
                };
                if let Some(action) = action {
                    on_clients_action(app_state, action).await;
                }
            }
        }
    }

    Ok(())
}

async fn load_clients_screen<S: KeyValueStore>(app_state: &mut AppState<S>, notice: Option<Notice>) {
    let clients = app_state.store.list_all().await;

    let mut state = ClientsState::new(clients);
    state.notice = notice;
    app_state.clients_state = Some(state);
    app_state.screen = AppScreen::Clients;
}

/// Returns true when the user asked to quit
async fn on_home_action<S: KeyValueStore>(app_state: &mut AppState<S>, action: HomeAction) -> bool {
    match action {
        HomeAction::Exit => return true,
        HomeAction::CreateClient => {
            app_state.form_state = Some(ClientFormState::new());
            app_state.screen = AppScreen::CreateClient;
        }
        HomeAction::ListClients => {
            load_clients_screen(app_state, None).await;
        }
    }
    false
}

async fn on_client_form_action<S: KeyValueStore>(app_state: &mut AppState<S>, action: ClientFormAction) {
    match action {
        ClientFormAction::Cancel => {
            let editing = app_state
                .form_state
                .as_ref()
                .is_some_and(|state| matches!(state.mode, FormMode::Edit { .. }));
            app_state.form_state = None;

            if editing {
                load_clients_screen(app_state, None).await;
            } else {
                app_state.screen = AppScreen::Home;
            }
        }
        ClientFormAction::Create(fields) => {
            let result = app_state.store.create(fields).await;
            if let Some(state) = &mut app_state.form_state {
                match result {
                    Ok(client) => {
                        state.reset();
                        state.notice = Some(Notice::Info(saved_summary("Cliente Criado", &client)));
                    }
                    Err(err) => {
                        error!(%err, "failed to create client");
                        state.notice = Some(Notice::Error(err.to_string()));
                    }
                }
            }
        }
        ClientFormAction::Update(client) => match app_state.store.update(client).await {
            Ok(client) => {
                app_state.form_state = None;
                let notice = Notice::Info(saved_summary("Cliente Atualizado", &client));
                load_clients_screen(app_state, Some(notice)).await;
            }
            Err(err) => {
                error!(%err, "failed to update client");
                if let Some(state) = &mut app_state.form_state {
                    state.notice = Some(Notice::Error(err.to_string()));
                }
            }
        },
    }
}

async fn on_clients_action<S: KeyValueStore>(app_state: &mut AppState<S>, action: ClientAction) {
    match action {
        ClientAction::Back => {
            app_state.clients_state = None;
            app_state.screen = AppScreen::Home;
        }
        ClientAction::EditClient(client) => {
            if let Err(err) = app_state.store.select(&client).await {
                error!(%err, "failed to select client");
                set_clients_notice(app_state, Notice::Error(err.to_string()));
                return;
            }

            // The edit screen reads the record back from the hand-off slot
            match app_state.store.get_selected().await {
                Some(selected) => {
                    app_state.form_state = Some(ClientFormState::from_existing(selected));
                    app_state.screen = AppScreen::EditClient;
                }
                None => set_clients_notice(
                    app_state,
                    Notice::Error("Não foi possível carregar os dados do cliente.".to_string()),
                ),
            }
        }
        ClientAction::DeleteClient(id) => match app_state.store.remove(&id).await {
            Ok(()) => {
                load_clients_screen(app_state, Some(Notice::Info("Cliente excluído.".to_string())))
                    .await;
            }
            Err(err) => {
                error!(%err, "failed to remove client");
                set_clients_notice(app_state, Notice::Error(err.to_string()));
            }
        },
    }
}

fn set_clients_notice<S>(app_state: &mut AppState<S>, notice: Notice) {
    if let Some(state) = &mut app_state.clients_state {
        state.notice = Some(notice);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::memory::MemoryStore;
    use crate::models::ClientFields;
    use crate::ui::{client_form, clients};
    use crossterm::event::KeyCode;

    fn app() -> AppState<MemoryStore> {
        AppState::new(ClientStore::new(MemoryStore::new()))
    }

    fn ana() -> ClientFields {
        ClientFields {
            name: "Ana".to_string(),
            birth_date: "01/01/1990".to_string(),
            height: "170".to_string(),
            weight: "60.5".to_string(),
            phone: "(11)99999-0000".to_string(),
        }
    }

    fn form_notice(app: &AppState<MemoryStore>) -> Option<Notice> {
        app.form_state.as_ref().and_then(|state| state.notice.clone())
    }

    #[test]
    fn cli_overrides_configuration() {
        let cli = Cli::parse_from(["fs_academia", "--database-url", "sqlite::memory:", "-vv"]);
        let mut config = Config::from_vars(Vec::new()).unwrap();

        cli.apply(&mut config);

        assert_eq!(config.database_url(), "sqlite::memory:");
        assert_eq!(config.log_level, "trace");
        assert_eq!(config.log_file, "fs_academia.log");
    }

    #[tokio::test]
    async fn create_list_edit_delete_flow() {
        let mut app = app();

        assert!(!on_home_action(&mut app, HomeAction::CreateClient).await);
        assert_eq!(app.screen, AppScreen::CreateClient);

        on_client_form_action(&mut app, ClientFormAction::Create(ana())).await;
        let notice = form_notice(&app).unwrap();
        assert!(!notice.is_error());
        assert!(notice.text().starts_with("Cliente Criado. Nome: Ana"));
        assert_eq!(app.form_state.as_ref().unwrap().fields(), ClientFields::default());

        on_client_form_action(&mut app, ClientFormAction::Cancel).await;
        assert_eq!(app.screen, AppScreen::Home);

        on_home_action(&mut app, HomeAction::ListClients).await;
        assert_eq!(app.screen, AppScreen::Clients);
        let listed = app.clients_state.as_ref().unwrap().clients().to_vec();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].fields(), ana());

        // Edit through the list screen's key handling
        let action = clients::handle_key(app.clients_state.as_mut().unwrap(), KeyCode::Char('e')).unwrap();
        on_clients_action(&mut app, action).await;
        assert_eq!(app.screen, AppScreen::EditClient);
        assert_eq!(app.store.get_selected().await, Some(listed[0].clone()));

        let form = app.form_state.as_mut().unwrap();
        form.current_field = client_form::ClientField::Height;
        client_form::handle_key(form, KeyCode::Enter);
        client_form::handle_key(form, KeyCode::Backspace);
        client_form::handle_key(form, KeyCode::Char('5'));
        client_form::handle_key(form, KeyCode::Enter);
        let action = client_form::handle_key(form, KeyCode::Char('s')).unwrap();
        on_client_form_action(&mut app, action).await;

        assert_eq!(app.screen, AppScreen::Clients);
        let state = app.clients_state.as_ref().unwrap();
        assert!(state.notice.as_ref().unwrap().text().starts_with("Cliente Atualizado"));
        assert_eq!(state.clients()[0].height, "175");
        assert_eq!(state.clients()[0].id, listed[0].id);

        on_clients_action(&mut app, ClientAction::DeleteClient(listed[0].id.clone())).await;
        assert!(app.clients_state.as_ref().unwrap().clients().is_empty());
        assert!(app.store.list_all().await.is_empty());
    }

    #[tokio::test]
    async fn create_with_blank_fields_shows_error_and_keeps_input() {
        let mut app = app();
        on_home_action(&mut app, HomeAction::CreateClient).await;

        let mut fields = ana();
        fields.weight.clear();
        on_client_form_action(&mut app, ClientFormAction::Create(fields)).await;

        let notice = form_notice(&app).unwrap();
        assert!(notice.is_error());
        assert!(notice.text().contains("peso"));
        assert!(app.store.list_all().await.is_empty());
    }

    #[tokio::test]
    async fn storage_failure_on_delete_keeps_list_and_reports() {
        let mut app = app();
        let created = app.store.create(ana()).await.unwrap();
        load_clients_screen(&mut app, None).await;

        app.store.storage().fail_writes(true);
        on_clients_action(&mut app, ClientAction::DeleteClient(created.id.clone())).await;

        let state = app.clients_state.as_ref().unwrap();
        assert!(state.notice.as_ref().unwrap().is_error());
        assert_eq!(state.clients().len(), 1);
        app.store.storage().fail_writes(false);
        assert_eq!(app.store.list_all().await, vec![created]);
    }

    #[tokio::test]
    async fn cancelling_an_edit_returns_to_the_list() {
        let mut app = app();
        let created = app.store.create(ana()).await.unwrap();
        load_clients_screen(&mut app, None).await;

        on_clients_action(&mut app, ClientAction::EditClient(created)).await;
        assert_eq!(app.screen, AppScreen::EditClient);

        on_client_form_action(&mut app, ClientFormAction::Cancel).await;
        assert_eq!(app.screen, AppScreen::Clients);
        assert!(app.form_state.is_none());
    }

    #[tokio::test]
    async fn back_from_list_goes_home() {
        let mut app = app();
        on_home_action(&mut app, HomeAction::ListClients).await;

        on_clients_action(&mut app, ClientAction::Back).await;

        assert_eq!(app.screen, AppScreen::Home);
        assert!(on_home_action(&mut app, HomeAction::Exit).await);
    }
}
