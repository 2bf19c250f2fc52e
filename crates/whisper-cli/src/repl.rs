//! Interactive loop over the page

use crate::commands::{Command, CommandError};
use crate::terminal::TerminalView;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, info, warn};
use whisper_client::view::TextInput;
use whisper_client::{Action, App, ElementId, Key, UiEvent, normalize_symbol};

fn print_banner(api_url: &str) {
    println!(
        r"
╔══════════════════════════════════════════════════════════════╗
║                      Market Whisperer                        ║
║                                                              ║
║  Commands:                                                   ║
║    /add <symbol>     - Add to the watchlist                  ║
║    /remove <symbol>  - Remove from the watchlist             ║
║    /list             - Show the watchlist                    ║
║    /listen           - Listen to the market                  ║
║    /abort            - Stop listening                        ║
║    /help             - Help                                  ║
║    /exit             - Exit                                  ║
║                                                              ║
║  Or just type a symbol and press Enter.                      ║
╚══════════════════════════════════════════════════════════════╝
"
    );
    println!("Backend: {api_url}\n");
}

/// Run the REPL until `/exit`, EOF or a Ctrl-C while idle
pub async fn run(app: &App, view: &TerminalView, api_url: &str) -> anyhow::Result<()> {
    print_banner(api_url);
    app.init().await;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else {
                    println!("\nGoodbye!");
                    break;
                };
                if !handle_line(app, view, &line).await {
                    println!("Goodbye!");
                    break;
                }
            }
            signal = tokio::signal::ctrl_c() => {
                signal?;
                if app.abort_analysis().await {
                    println!("Stopped listening.");
                } else {
                    println!("\nGoodbye!");
                    break;
                }
            }
        }
    }

    app.abort_analysis().await;
    Ok(())
}

/// Returns `false` when the user asked to leave
async fn handle_line(app: &App, view: &TerminalView, line: &str) -> bool {
    let command = match Command::parse(line) {
        Ok(command) => command,
        Err(CommandError::Empty) => return true,
        Err(err) => {
            eprintln!("Error: {err}\n");
            return true;
        }
    };
    debug!(?command, "repl command");

    match command {
        Command::Type { text } => {
            view.input.set_value(&text);
            app.dispatch(ElementId::StockInput, UiEvent::KeyPress(Key::Enter))
                .await;
        }
        Command::Add { symbol } => {
            view.input.set_value(&symbol);
            app.dispatch(ElementId::AddButton, UiEvent::Click).await;
        }
        Command::Remove { symbol } => {
            if let Some(symbol) = normalize_symbol(&symbol) {
                if let Err(err) = app.perform(&Action::RemoveStock(symbol)).await {
                    warn!(error = %err, "remove failed");
                }
            }
        }
        Command::List => app.watchlist().fetch_stocks().await,
        Command::Listen => {
            if !view.listen_button.enabled() {
                println!("Already listening, /abort to stop.");
            } else {
                app.dispatch(ElementId::ListenButton, UiEvent::Click).await;
            }
        }
        Command::Abort => {
            if !app.abort_analysis().await {
                println!("Nothing to abort.");
            }
        }
        Command::Help => println!("{}", Command::help_text()),
        Command::Exit => {
            info!("exit requested");
            return false;
        }
    }

    true
}
