use clap::Parser;
use clash_viewer::assets::{ChampionLoader, HeadlessLoader, ModelRequest};
use clash_viewer::clash::{ClashSource, HttpClashSource, StaticClashSource};
use clash_viewer::config::{save_settings, save_settings_to, settings_path};
use clash_viewer::session::EventSender;
use clash_viewer::utils::logging::{init_logging, log_system_info};
use clash_viewer::{Clash, LoadingEdge, Schedule, SceneRegistry, ViewerSession, ViewerSettings};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};

const VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Debug, Parser)]
#[command(name = "clash-viewer", version, about = "Browse clash tournaments in themed champion scenes")]
struct Args {
    /// Region to fetch clashes for, overriding the settings
    #[arg(long)]
    region: Option<String>,

    /// Browse built-in demo clashes instead of the remote API
    #[arg(long)]
    offline: bool,

    /// Settings file (defaults to the platform config directory)
    #[arg(long)]
    config: Option<PathBuf>,
}

enum Flow {
    Continue,
    Quit,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let config_path = args.config.clone().or_else(settings_path);
    let mut settings = ViewerSettings::layered(config_path.as_deref())?;
    if let Some(region) = args.region {
        settings.region = region;
    }

    init_logging(settings.log_file.as_deref());
    log_system_info();
    info!("clash viewer {} starting (region {})", VERSION, settings.region);

    let source: Arc<dyn ClashSource> = if args.offline {
        Arc::new(StaticClashSource::new(demo_clashes()))
    } else {
        Arc::new(HttpClashSource::new(&settings.api)?)
    };
    let scenes = SceneRegistry::builtin()?;

    let mut session = ViewerSession::new(source, scenes.clone());
    let loader = Arc::new(session.champion_loader(HeadlessLoader::new(), settings.assets.cache_capacity));

    // Warm every scene up front so browsing never waits on a model
    let requests: Vec<ModelRequest> = scenes
        .iter()
        .flat_map(|(_, scene)| scene.champions.iter())
        .map(|champion| ModelRequest::from_config(champion, settings.assets.enable_texture))
        .collect();
    tokio::spawn({
        let loader = Arc::clone(&loader);
        async move {
            for request in requests {
                if let Err(e) = loader.load(&request).await {
                    warn!("Preloading {} failed: {}", request.label(), e);
                }
            }
        }
    });

    session.set_region(&settings.region);
    print_help();

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            edge = session.next_event() => {
                if edge == Some(LoadingEdge::Settled) {
                    print_status(&session);
                }
            }
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                match run_command(&mut session, &mut settings, config_path.as_deref(), &loader, line.trim()).await {
                    Flow::Continue => {}
                    Flow::Quit => break,
                }
            }
        }
    }

    info!("clash viewer shutting down");
    Ok(())
}

async fn run_command(
    session: &mut ViewerSession,
    settings: &mut ViewerSettings,
    config_path: Option<&Path>,
    loader: &ChampionLoader<HeadlessLoader, EventSender>,
    line: &str,
) -> Flow {
    let mut words = line.split_whitespace();
    let Some(command) = words.next() else {
        return Flow::Continue;
    };

    match (command, words.next()) {
        ("next" | "n", _) => session.next(),
        ("prev" | "p", _) => session.previous(),
        ("nearest", _) => session.select_nearest(),
        ("unselect", _) => session.unselect(),
        ("select", Some(id)) => match id.parse() {
            Ok(id) => {
                if let Err(e) = session.select_by_id(id) {
                    println!("{}", e);
                }
            }
            Err(_) => println!("Not a clash id: {}", id),
        },
        ("region", Some(region)) => session.set_region(region),
        ("refresh", _) => session.refresh(),
        ("save", _) => {
            if let Some(region) = session.region() {
                settings.region = region.to_string();
            }
            let saved = match config_path {
                Some(path) => save_settings_to(settings, path),
                None => save_settings(settings),
            };
            match saved {
                Ok(()) => println!("Settings saved"),
                Err(e) => println!("Could not save settings: {}", e),
            }
            return Flow::Continue;
        }
        ("animate", Some(seconds)) => {
            match seconds.parse::<f32>() {
                Ok(elapsed) => animate_scene(session, loader, settings.assets.enable_texture, elapsed).await,
                Err(_) => println!("Not a number of seconds: {}", seconds),
            }
            return Flow::Continue;
        }
        ("list", _) => {
            print_list(session);
            return Flow::Continue;
        }
        ("quit" | "exit" | "q", _) => return Flow::Quit,
        _ => {
            print_help();
            return Flow::Continue;
        }
    }

    print_status(session);
    Flow::Continue
}

fn print_help() {
    println!("Commands: next | prev | nearest | select <id> | unselect | region <name> | refresh | animate <secs> | list | save | quit");
}

async fn animate_scene(
    session: &ViewerSession,
    loader: &ChampionLoader<HeadlessLoader, EventSender>,
    enable_texture: bool,
    elapsed: f32,
) {
    for request in session.scene_requests(enable_texture) {
        match loader.animate(&request, elapsed).await {
            Some(time) => println!("  {} at t={:.0}", request.label(), time),
            None => println!("  {} is not animating", request.label()),
        }
    }
}

fn print_status(session: &ViewerSession) {
    if session.is_loading() {
        println!("Loading...");
        return;
    }

    match session.current() {
        Some(clash) => {
            let start = clash
                .first_start_time()
                .map(|t| t.to_string())
                .unwrap_or_else(|_| "unscheduled".to_string());
            println!("▶ {} (theme {}, starts {})", clash, clash.theme_id, start);
        }
        None => println!("▶ No clash selected"),
    }

    let scene = session.scene();
    let champions: Vec<&str> = scene.champions.iter().map(|c| c.champion_key.as_str()).collect();
    println!("  scene '{}' with champions [{}]", session.scene_key(), champions.join(", "));
}

fn print_list(session: &ViewerSession) {
    let current = session.current().map(|clash| clash.id);
    if session.clashes().is_empty() {
        println!("No clashes in region {}", session.region().unwrap_or("-"));
    }
    for clash in session.clashes() {
        let marker = if Some(clash.id) == current { "*" } else { " " };
        println!("{} {}", marker, clash);
    }
}

fn demo_clashes() -> Vec<Clash> {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or_default();
    let day = 24 * 3_600_000;

    [(1001, 1, "bandle_city", 3), (1002, 2, "bilgewater", 1), (1003, 7, "ionia", 5)]
        .into_iter()
        .map(|(id, theme_id, name_key, days_out)| Clash {
            id,
            theme_id,
            name_key: name_key.to_string(),
            name_key_secondary: "day_1".to_string(),
            schedule: vec![Schedule {
                id: id * 10,
                registration_time: now + days_out * day - 3 * 3_600_000,
                start_time: now + days_out * day,
                cancelled: false,
            }],
        })
        .collect()
}
