use std::env;
use std::fs;
use std::io;
use std::path::Path;
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter,
};

/// Initialize console logging plus an optional session log file.
///
/// The log file is truncated on every start. If it cannot be created the
/// viewer keeps logging to the console only.
pub fn init_logging(log_file: Option<&Path>) {
    let log_level = env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());
    let enable_backtrace = env::var("RUST_BACKTRACE").unwrap_or_else(|_| "0".to_string()) == "1";

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let filter = EnvFilter::new(&log_level);
        match "clash_viewer=debug".parse() {
            Ok(directive) => filter.add_directive(directive),
            Err(_) => filter,
        }
    });

    let file = log_file.and_then(|path| match open_session_log(path) {
        Ok(file) => Some(file),
        Err(e) => {
            eprintln!("Warning: Failed to create {}: {}", path.display(), e);
            None
        }
    });
    let file_layer = file.map(|file| {
        fmt::layer()
            .with_writer(file)
            .with_span_events(FmtSpan::CLOSE)
            .with_target(true)
            .with_file(true)
            .with_line_number(true)
            .with_ansi(false) // No ANSI codes in file
    });

    let initialized = tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_target(true).with_ansi(true))
        .with(file_layer)
        .try_init();

    if let Err(e) = initialized {
        eprintln!("Warning: Logging already initialized: {}", e);
        return;
    }

    std::panic::set_hook(Box::new(move |panic_info| {
        tracing::error!("Panic occurred: {}", panic_info);

        if let Some(location) = panic_info.location() {
            tracing::error!(
                "Panic location: {}:{}:{}",
                location.file(),
                location.line(),
                location.column()
            );
        }

        if enable_backtrace {
            tracing::error!("Backtrace:\n{:?}", std::backtrace::Backtrace::capture());
        }
    }));

    tracing::info!("Logging initialized with level: {}", log_level);
    if let Some(path) = log_file {
        tracing::info!("File logging: {} (session-based, cleaned on startup)", path.display());
    }
}

fn open_session_log(path: &Path) -> io::Result<fs::File> {
    if let Err(e) = fs::remove_file(path) {
        if e.kind() != io::ErrorKind::NotFound {
            return Err(e);
        }
    }
    fs::File::create(path)
}

/// Log basic platform information for bug reports
pub fn log_system_info() {
    tracing::info!("=== System Information ===");
    tracing::info!("OS: {}", std::env::consts::OS);
    tracing::info!("Architecture: {}", std::env::consts::ARCH);
    tracing::info!("Viewer Version: {}", env!("CARGO_PKG_VERSION"));
    tracing::info!("========================");
}
