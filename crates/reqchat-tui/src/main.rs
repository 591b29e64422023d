//! ReqChat terminal client entry point

use anyhow::Result;
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use tokio::sync::mpsc::UnboundedReceiver;

use reqchat_providers::ExtractionBackend;
use reqchat_tui::app::{App, AppEvent};
use reqchat_tui::event::{Event, EventLoop};
use reqchat_tui::view;

#[tokio::main]
async fn main() -> Result<()> {
    // The terminal owns stdout, so logs go to stderr.
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .with_writer(std::io::stderr)
        .init();

    tracing::info!("Starting ReqChat...");

    let backend = ExtractionBackend::from_env()?;
    let (mut app, mut app_events) = App::new(backend);

    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout))?;

    app.start();
    let mut events = EventLoop::new();
    let result = run_loop(&mut terminal, &mut app, &mut events, &mut app_events).await;

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    match result {
        Ok(()) => {
            tracing::info!("ReqChat exited");
            Ok(())
        }
        Err(e) => {
            tracing::error!("ReqChat error: {}", e);
            Err(e)
        }
    }
}

async fn run_loop(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    app: &mut App,
    events: &mut EventLoop,
    app_events: &mut UnboundedReceiver<AppEvent>,
) -> Result<()> {
    loop {
        terminal.draw(|frame| view::draw(frame, app))?;

        tokio::select! {
            event = events.next() => {
                match event {
                    Some(Event::Key(key)) => app.handle_key(key),
                    Some(Event::Resize { .. }) | Some(Event::Tick) => {}
                    None => break,
                }
            }
            event = app_events.recv() => {
                if let Some(event) = event {
                    app.handle_app_event(event);
                }
            }
        }

        if app.should_quit {
            break;
        }
    }
    Ok(())
}
