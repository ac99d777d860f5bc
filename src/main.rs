use clap::Parser;
use color_eyre::Result;
use metrui::{App, AppConfig, AppEvent, ConfigManager, MessageBundle, Theme, APP_NAME};
use ratatui::DefaultTerminal;
use std::path::PathBuf;
use std::sync::mpsc::channel;

#[derive(Parser, Debug)]
#[command(version, about = "metrui")]
struct Args {
    /// Project activity export (JSON) to graph
    path: PathBuf,

    /// Plot this metric on startup (repeatable, overrides the config file)
    #[arg(long = "metric")]
    metric: Vec<String>,

    /// Restrict the add-metric dialog to this metric type (repeatable)
    #[arg(long = "type-filter")]
    type_filter: Vec<String>,

    /// Enable debug mode to show operational information
    #[arg(long = "debug", action)]
    debug: bool,

    /// Write the default config file and exit
    #[arg(long = "write-config", action)]
    write_config: bool,

    /// Overwrite an existing config file (with --write-config)
    #[arg(long = "force", action)]
    force: bool,
}

fn render(terminal: &mut DefaultTerminal, app: &mut App) -> Result<()> {
    terminal.draw(|frame| frame.render_widget(app, frame.area()))?;
    Ok(())
}

fn build_app(tx: std::sync::mpsc::Sender<AppEvent>, args: &Args) -> App {
    let config = AppConfig::load(APP_NAME).unwrap_or_else(|e| {
        eprintln!("Warning: Could not load config: {}. Using defaults.", e);
        AppConfig::default()
    });
    let theme = Theme::from_config(&config.theme).unwrap_or_else(|e| {
        eprintln!("Warning: Failed to create theme: {}. Using fallback.", e);
        Theme::default()
    });
    let messages = match ConfigManager::new(APP_NAME) {
        Ok(config_manager) => MessageBundle::load(&config_manager).unwrap_or_else(|e| {
            eprintln!("Warning: Could not load messages: {}", e);
            MessageBundle::empty()
        }),
        Err(e) => {
            eprintln!("Warning: Could not locate config directory: {}", e);
            MessageBundle::empty()
        }
    };

    let mut app = App::new_with_config(tx, theme, config, messages);
    let type_filter = if args.type_filter.is_empty() {
        None
    } else {
        Some(args.type_filter.clone())
    };
    app.override_graph(args.metric.clone(), type_filter);
    if args.debug {
        app.enable_debug();
    }
    app
}

fn run(mut terminal: DefaultTerminal, args: &Args) -> Result<()> {
    let (tx, rx) = channel::<AppEvent>();
    let mut app = build_app(tx.clone(), args);
    render(&mut terminal, &mut app)?;
    tx.send(AppEvent::Open(args.path.clone()))?;

    loop {
        if crossterm::event::poll(std::time::Duration::from_millis(25))? {
            match crossterm::event::read()? {
                crossterm::event::Event::Key(key) => tx.send(AppEvent::Key(key))?,
                crossterm::event::Event::Resize(cols, rows) => {
                    tx.send(AppEvent::Resize(cols, rows))?
                }
                _ => {}
            }
        }

        let updated = match rx.recv_timeout(std::time::Duration::from_millis(0)) {
            Ok(event) => {
                match event {
                    AppEvent::Exit => break,
                    AppEvent::Crash(msg) => {
                        return Err(color_eyre::eyre::eyre!(msg));
                    }
                    event => {
                        if let Some(event) = app.event(&event) {
                            tx.send(event)?;
                        }
                    }
                }
                true
            }
            Err(std::sync::mpsc::RecvTimeoutError::Timeout) => false,
            Err(std::sync::mpsc::RecvTimeoutError::Disconnected) => break,
        };

        if updated {
            render(&mut terminal, &mut app)?;
        }
    }
    Ok(())
}

fn handle_early_exit_flags(args: &Args) -> Result<Option<()>> {
    if args.write_config {
        let config_manager = ConfigManager::new(APP_NAME)?;
        match config_manager.write_default_config(args.force) {
            Ok(path) => {
                println!("Wrote default config to {}", path.display());
                return Ok(Some(()));
            }
            Err(e) => {
                eprintln!("Error writing config: {}", e);
                std::process::exit(1);
            }
        }
    }

    Ok(None)
}

fn main() -> Result<()> {
    let args = Args::parse();

    if let Some(()) = handle_early_exit_flags(&args)? {
        return Ok(());
    }

    color_eyre::install()?;
    let terminal = ratatui::init();
    let result = run(terminal, &args);
    ratatui::restore();
    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc::channel;

    #[test]
    fn cli_flags_reach_the_graph_config() {
        let args = Args {
            path: PathBuf::new(),
            metric: vec!["bugs".to_string(), "coverage".to_string()],
            type_filter: vec!["INT".to_string()],
            debug: false,
            write_config: false,
            force: false,
        };
        let (tx, _rx) = channel();
        let app = build_app(tx, &args);
        assert_eq!(app.graph.selected_metrics, vec!["bugs", "coverage"]);
        assert_eq!(
            app.graph.type_filter.as_deref(),
            Some(&["INT".to_string()][..])
        );
    }
}
