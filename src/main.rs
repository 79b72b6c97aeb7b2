use pawmatch::config::{Settings, StorageBackend};
use pawmatch::services::{load_seed_file, mock_profiles, FileStore, KeyValueStore, MemoryStore};
use pawmatch::{CandidateProfile, DecisionRecord, MatchSession, SwipeObserver};
use std::io::{self, BufRead, Write};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// Reports engine notifications through the log
struct LogObserver;

impl SwipeObserver for LogObserver {
    fn on_match(&mut self, candidate: &CandidateProfile) {
        info!("It's a match with {} ({})", candidate.name, candidate.id);
    }

    fn on_dislike(&mut self, candidate: &CandidateProfile) {
        info!("Skipped {} ({})", candidate.name, candidate.id);
    }

    fn on_undo(&mut self, candidate: &CandidateProfile) {
        info!("Took back decision on {} ({})", candidate.name, candidate.id);
    }
}

fn init_logging(settings: &Settings) {
    // LOG_LEVEL and LOG_FORMAT override the configured values
    let level = std::env::var("LOG_LEVEL").unwrap_or_else(|_| settings.logging.level.clone());
    let format = std::env::var("LOG_FORMAT").unwrap_or_else(|_| settings.logging.format.clone());

    let filter = EnvFilter::try_new(&level).unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .with_level(true);

    if format == "pretty" {
        subscriber.pretty().init();
    } else {
        subscriber.init();
    }
}

fn open_storage(settings: &Settings) -> io::Result<Box<dyn KeyValueStore>> {
    match settings.storage.backend {
        StorageBackend::Memory => Ok(Box::new(match settings.storage.quota_bytes {
            Some(quota) => MemoryStore::with_quota(quota),
            None => MemoryStore::new(),
        })),
        StorageBackend::File => FileStore::open(&settings.storage.dir)
            .map(|store| Box::new(store) as Box<dyn KeyValueStore>)
            .map_err(|e| io::Error::new(io::ErrorKind::Other, e.to_string())),
    }
}

fn load_seed(settings: &Settings) -> Vec<CandidateProfile> {
    let mut seed = if settings.profiles.include_mock {
        mock_profiles()
    } else {
        Vec::new()
    };

    if let Some(path) = &settings.profiles.seed_file {
        match load_seed_file(path) {
            Ok(dogs) => seed.extend(dogs),
            Err(e) => error!("Failed to load seed file {}: {}", path.display(), e),
        }
    }

    seed
}

fn describe(candidate: &CandidateProfile) -> String {
    format!(
        "{} - {}, {} yrs, {} / {} energy / {}, {:.1} mi\n  {}",
        candidate.name,
        candidate.breed,
        candidate.age,
        candidate.size,
        candidate.energy_level,
        candidate.friendliness,
        candidate.distance,
        candidate.bio
    )
}

fn report(out: &mut impl Write, record: Option<DecisionRecord>, verb: &str) -> io::Result<()> {
    match record {
        Some(record) => writeln!(out, "{} {}", verb, record.candidate.name),
        None => writeln!(out, "nothing to do"),
    }
}

fn print_status<D: pawmatch::DecisionStore>(
    out: &mut impl Write,
    session: &MatchSession<D>,
) -> io::Result<()> {
    let (index, total) = session.engine().progress();
    match session.current() {
        Some(candidate) => writeln!(out, "[{}/{}] {}", index + 1, total, describe(candidate)),
        None => writeln!(out, "No more dogs nearby. Try `reset` or `start-over`."),
    }
}

const HELP: &str = "commands: like | pass | drag <dx> | undo | reset | start-over | matches | help | quit";

fn main() -> io::Result<()> {
    // Load .env file if present
    dotenv::dotenv().ok();

    let settings = match Settings::load() {
        Ok(settings) => settings,
        Err(e) => {
            let settings = Settings::default();
            init_logging(&settings);
            error!("Failed to load configuration: {}", e);
            return Err(io::Error::new(io::ErrorKind::InvalidInput, e.to_string()));
        }
    };
    init_logging(&settings);

    info!("Starting Pawmatch session...");

    let storage = open_storage(&settings)?;
    let mut session = MatchSession::open(storage, load_seed(&settings))
        .with_drag_threshold(settings.swipe.drag_threshold);
    session.add_observer(Box::new(LogObserver));

    let stdin = io::stdin();
    let mut out = io::stdout().lock();
    writeln!(out, "{}", HELP)?;
    print_status(&mut out, &session)?;

    for line in stdin.lock().lines() {
        let line = line?;
        let mut parts = line.split_whitespace();

        match parts.next() {
            Some("like") | Some("l") => report(&mut out, session.like(), "liked")?,
            Some("pass") | Some("p") => report(&mut out, session.pass(), "passed on")?,
            Some("drag") => match parts.next().map(str::parse::<f64>) {
                Some(Ok(dx)) => report(&mut out, session.release_drag(dx), "swiped")?,
                _ => writeln!(out, "usage: drag <dx>")?,
            },
            Some("undo") | Some("u") => report(&mut out, session.undo(), "brought back")?,
            Some("reset") => session.reset(),
            Some("start-over") => session.start_over(),
            Some("matches") => {
                let view = session.connections();
                writeln!(out, "{} matches", view.len())?;
                for connection in view.connections() {
                    let star = if connection.preferred_breed { "*" } else { " " };
                    writeln!(out, " {} {}", star, describe(&connection.candidate))?;
                }
                continue;
            }
            Some("help") => {
                writeln!(out, "{}", HELP)?;
                continue;
            }
            Some("quit") | Some("exit") => break,
            Some(other) => {
                writeln!(out, "unknown command {:?}", other)?;
                continue;
            }
            None => continue,
        }

        print_status(&mut out, &session)?;
    }

    info!("Session closed");
    Ok(())
}
