//! main.rs
//! Entry point for folio

pub(crate) mod app;
pub(crate) mod config;
pub(crate) mod core;
pub(crate) mod ui;
pub(crate) mod utils;

use crate::config::Config;
use crate::core::terminal;
use crate::utils::cli::{CliAction, handle_args};
use crate::utils::logging::init_logging;
use crate::utils::resolve_data_dir;

fn main() -> std::io::Result<()> {
    std::panic::set_hook(Box::new(|info| {
        let _ = crossterm::terminal::disable_raw_mode();
        let mut stdout = std::io::stdout();
        let _ = crossterm::execute!(
            stdout,
            crossterm::terminal::LeaveAlternateScreen,
            crossterm::cursor::Show
        );

        log::error!("panic: {}", info);
        eprintln!("\n[folio] Error occurred: {}", info);

        #[cfg(debug_assertions)]
        {
            let bt = std::backtrace::Backtrace::force_capture();
            eprintln!("\nStack Backtrace:\n{}", bt);
        }
    }));

    let action = handle_args();
    if let CliAction::Exit = action {
        return Ok(());
    }

    let config = Config::load();
    let data_dir = resolve_data_dir(config.general().data_dir());

    match init_logging(&data_dir, config.general().log_level()) {
        Ok(path) => log::info!(
            "folio {} starting, log at {}",
            env!("CARGO_PKG_VERSION"),
            path.display()
        ),
        Err(e) => eprintln!("[folio] Logging disabled: {}", e),
    }

    let mut app = app::AppState::new(&config, &data_dir);
    if let CliAction::Open { locator, mime } = action {
        app.request_open_external(&locator, mime.as_deref());
    }

    let result = terminal::run_terminal(&mut app);
    log::info!("folio exiting");
    result
}
