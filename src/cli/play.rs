//! CLI command handlers: play screens in the terminal.

use std::sync::Arc;

use crate::app::{App, Mounted};
use crate::clipboard::{Clipboard, MemoryClipboard, Osc52Clipboard, UnavailableClipboard};
use crate::config::AcademyConfig;
use crate::error::{AcademyError, Result};
use crate::events::{AcademyEvent, EventPayload, EventSink, ToastLevel};
use crate::router::{Route, ROUTE_TABLE};
use crate::screens::FlowStatus;

use super::{Cli, ClipboardKind, Commands, DashboardArgs, OpenArgs};

/// Dispatch a parsed command line.
pub async fn run(cli: Cli) -> Result<()> {
    let config = cli.resolve_config()?;
    match cli.command {
        Commands::Open(args) => handle_open(config, args).await,
        Commands::Login => handle_login(config).await,
        Commands::Dashboard(args) => handle_dashboard(config, args).await,
        Commands::Routes => {
            handle_routes();
            Ok(())
        }
    }
}

/// Prints toasts; narration goes through the tracing subscriber.
fn toast_printer() -> EventSink {
    Arc::new(|event: AcademyEvent| {
        if let EventPayload::Toast { toast } = event.payload {
            let icon = match toast.level {
                ToastLevel::Success => "✅",
                ToastLevel::Info => "ℹ️ ",
                ToastLevel::Error => "❌",
            };
            println!("{icon} {}", toast.message);
        }
    })
}

fn app(config: AcademyConfig) -> App {
    App::new(config).with_event_sink(toast_printer())
}

/// Handle `oauth-academy open <path>`.
pub async fn handle_open(config: AcademyConfig, args: OpenArgs) -> Result<()> {
    let route = Route::parse(&args.path)?;
    let mut app = app(config);
    println!("🔗 {route}");
    app.open(route);
    play(&mut app).await;

    if args.return_home {
        match app.current() {
            Some(Mounted::Callback(callback)) => callback.return_home()?,
            Some(Mounted::NotFound(page)) => page.return_home(),
            _ => {
                return Err(AcademyError::ActionUnavailable(
                    "this page has no \"Return to Home\" action".to_string(),
                ))
            }
        }
        if let Some(route) = app.follow().await {
            println!("🔗 {route}");
            println!("{}", app.render());
        }
    }
    Ok(())
}

/// Handle `oauth-academy login`.
pub async fn handle_login(config: AcademyConfig) -> Result<()> {
    let mut app = app(config);
    println!("🔗 {}", Route::Landing);
    app.open(Route::Landing);
    println!("{}", app.render());

    if let Some(Mounted::Landing(landing)) = app.current_mut() {
        println!("🖱  Sign in with Google");
        landing.login()?;
    }
    if let Some(route) = app.follow().await {
        println!("🔗 {route}");
    }
    play(&mut app).await;
    Ok(())
}

/// Render screens and follow their redirects until nothing else will happen.
async fn play(app: &mut App) {
    loop {
        println!("{}", app.render());
        if let Some(Mounted::Callback(callback)) = app.current_mut() {
            if callback.status() == FlowStatus::Loading {
                callback.settled().await;
                println!("{}", app.render());
            }
        }
        if !app.awaiting_navigation() {
            break;
        }
        match app.follow().await {
            Some(route) => println!("🔗 {route}"),
            None => break,
        }
    }

    if matches!(app.current(), Some(Mounted::Protected(_))) {
        println!("⏳ The route guard never completes its authentication check,");
        println!("   so the dashboard stays hidden. Try: oauth-academy dashboard");
    }
}

/// Handle `oauth-academy dashboard`.
pub async fn handle_dashboard(config: AcademyConfig, args: DashboardArgs) -> Result<()> {
    let clipboard: Arc<dyn Clipboard> = match args.clipboard {
        ClipboardKind::Terminal => Arc::new(Osc52Clipboard::stdout()),
        ClipboardKind::Memory => Arc::new(MemoryClipboard::new()),
        ClipboardKind::Disabled => Arc::new(UnavailableClipboard),
    };
    let mut app = app(config).with_clipboard(clipboard);
    let mut dashboard = app.unguarded_dashboard();

    if args.show_token {
        dashboard.toggle_token_visibility();
    }
    println!("{}", dashboard.render());

    if args.refresh {
        println!("🔄 Refreshing token...");
        let token = dashboard.refresh_token()?.wait().await?;
        println!(
            "   {} (expires {})",
            dashboard.displayed_token(),
            token.expires_at.format("%H:%M:%S")
        );
    }

    if args.copy {
        dashboard.copy_token().await;
    }

    if args.test_api {
        println!("🧪 Testing API...");
        dashboard.test_api()?.wait().await?;
        println!("{}", dashboard.render());
    }

    if args.logout {
        dashboard.logout();
        drop(dashboard);
        if let Some(route) = app.follow().await {
            println!("🔗 {route}");
            println!("{}", app.render());
        }
    }
    Ok(())
}

/// Handle `oauth-academy routes`.
pub fn handle_routes() {
    println!("📍 Routes\n");
    for (pattern, description) in ROUTE_TABLE {
        println!("  {pattern:<32} {description}");
    }
}
