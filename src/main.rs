//! Academia Portal - Terminal Driver
//!
//! Commands:
//! - check: probe the backend and show the connection banner
//! - login <email> <password>: submit the login form
//! - whoami: show the dashboard for the stored session
//! - stats: fetch system statistics
//! - route <path>: resolve a path through the route guard
//! - logout: clear the stored session

use academia_portal::{
    ApiClient, Config, ConnectionBanner, Dashboard, FileStorage, FormController, LogNavigator,
    LoginForm, Navigator, RouteShell, SessionStore, SubmitOutcome,
};
use anyhow::Context;
use std::sync::Arc;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

fn print_help() {
    println!("Academia Portal v{}", env!("CARGO_PKG_VERSION"));
    println!();
    println!("Usage: academia-portal [--json] <COMMAND>");
    println!();
    println!("Commands:");
    println!("  check                    Probe the backend");
    println!("  login <email> <password> Log in and store the session");
    println!("  whoami                   Show the dashboard for the stored session");
    println!("  stats                    Show system statistics");
    println!("  route <path>             Resolve a path through the route guard");
    println!("  logout                   Clear the stored session");
    println!();
    println!("Environment variables:");
    println!("  ACADEMIA_API_URL             Backend URL (default: http://localhost:8000)");
    println!("  ACADEMIA_TIMEOUT_SECS        Request timeout (default: 10)");
    println!("  ACADEMIA_PROBE_TIMEOUT_SECS  Connection probe timeout (default: 5)");
    println!("  ACADEMIA_SESSION_PATH        Session file");
    println!("  ACADEMIA_PHONE_RULE          at-least | exact (default: at-least)");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment
    dotenvy::dotenv().ok();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let json_logs = args.iter().any(|a| a == "--json");
    let args: Vec<&str> = args
        .iter()
        .map(String::as_str)
        .filter(|a| *a != "--json")
        .collect();

    if args.is_empty() || args.iter().any(|a| *a == "--help" || *a == "-h") {
        print_help();
        return Ok(());
    }

    let log_level = std::env::var("RUST_LOG")
        .map(|s| match s.to_lowercase().as_str() {
            "trace" => Level::TRACE,
            "debug" => Level::DEBUG,
            "warn" => Level::WARN,
            "error" => Level::ERROR,
            _ => Level::INFO,
        })
        .unwrap_or(Level::INFO);

    if json_logs {
        let subscriber = FmtSubscriber::builder()
            .with_max_level(log_level)
            .with_writer(std::io::stderr)
            .with_ansi(false)
            .json()
            .finish();
        tracing::subscriber::set_global_default(subscriber)?;
    } else {
        let subscriber = FmtSubscriber::builder()
            .with_max_level(log_level)
            .with_writer(std::io::stderr)
            .finish();
        tracing::subscriber::set_global_default(subscriber)?;
    }

    let config = Config::from_env()?;
    info!("Academia Portal v{} -> {}", env!("CARGO_PKG_VERSION"), config.api_url);

    let storage = FileStorage::open(&config.session_path)
        .with_context(|| format!("opening {}", config.session_path.display()))?;
    let navigator: Arc<dyn Navigator> = Arc::new(LogNavigator);
    let session = Arc::new(SessionStore::new(Arc::new(storage), navigator.clone()));
    let api = ApiClient::new(&config, session.clone())?;

    match args.as_slice() {
        ["check"] => {
            let mut banner = ConnectionBanner::new();
            let state = banner.refresh(&api).await;
            println!("Estado de conexión: {:?}", state);
            if let Some(message) = banner.message() {
                println!("{}", message);
            }
        }
        ["login", email, password] => {
            let mut form = LoginForm::new();
            form.set_field("email", email);
            form.set_field("password", password);
            match form.submit(&api).await {
                SubmitOutcome::Succeeded => println!("Inicio de sesión exitoso"),
                SubmitOutcome::Invalid(message) | SubmitOutcome::Failed(message) => {
                    println!("{}", message)
                }
            }
        }
        ["whoami"] => {
            let shell = RouteShell::new(session.clone(), navigator);
            if shell.open("/dashboard") == academia_portal::Page::Dashboard {
                let view = Dashboard::load(&session, &api).await;
                println!("{}", view.greeting);
                println!("{}", view.role_label);
                for line in &view.profile {
                    println!("  {}: {}", line.label, line.value);
                }
                if !view.actions.is_empty() {
                    println!("Acciones: {}", view.actions.join(", "));
                }
            } else {
                println!("No hay sesión activa");
            }
        }
        ["stats"] => {
            let stats = api.stats().await?;
            println!("{}", serde_json::to_string_pretty(&stats)?);
        }
        ["route", path] => {
            let shell = RouteShell::new(session.clone(), navigator);
            println!("{:?}", shell.open(path));
        }
        ["logout"] => {
            Dashboard::logout(&session);
            println!("Sesión cerrada");
        }
        _ => {
            print_help();
            anyhow::bail!("unknown command: {}", args.join(" "));
        }
    }

    Ok(())
}
