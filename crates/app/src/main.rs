use std::fmt;
use std::sync::Arc;

use dioxus::LaunchBuilder;
use dioxus::desktop::{Config as DesktopConfig, WindowBuilder};
use services::{
    CatalogService, Clock, DEFAULT_PROBLEM_COUNT, ExamService, HistoryService, QuizServices,
};
use storage::demo::seeded_repository;
use storage::http::{HttpConfig, HttpRepository};
use storage::repository::{InMemoryRepository, Storage};
use ui::{App, UiApp, build_app_context};
use url::Url;

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidServerUrl { raw: String },
    InvalidCount { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidServerUrl { raw } => write!(f, "invalid --server value: {raw}"),
            ArgsError::InvalidCount { raw } => {
                write!(f, "invalid --count value: {raw} (expected a positive integer)")
            }
        }
    }
}

impl std::error::Error for ArgsError {}

fn require_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ArgsError> {
    args.next().ok_or(ArgsError::MissingValue { flag })
}

struct DesktopApp {
    services: QuizServices,
}

impl UiApp for DesktopApp {
    fn clock(&self) -> Clock {
        self.services.clock()
    }

    fn problem_count(&self) -> usize {
        self.services.problem_count()
    }

    fn exams(&self) -> Arc<ExamService> {
        self.services.exams()
    }

    fn history(&self) -> Arc<HistoryService> {
        self.services.history()
    }

    fn catalog(&self) -> Arc<CatalogService> {
        self.services.catalog()
    }
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  cargo run -p app -- [--server <url>] [--count <n>] [--offline-demo]");
    eprintln!();
    eprintln!("Defaults:");
    eprintln!("  --server {}", HttpConfig::DEFAULT_BASE_URL);
    eprintln!("  --count {DEFAULT_PROBLEM_COUNT}");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  QUIZ_SERVER_URL, QUIZ_PROBLEM_COUNT");
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Backend {
    Server(Url),
    OfflineDemo,
}

#[derive(Debug)]
struct Args {
    backend: Backend,
    problem_count: usize,
}

impl Args {
    fn parse(args: &mut impl Iterator<Item = String>) -> Result<Self, ArgsError> {
        let mut server = match std::env::var("QUIZ_SERVER_URL") {
            Ok(raw) => parse_server_url(raw)?,
            Err(_) => parse_server_url(HttpConfig::DEFAULT_BASE_URL.to_string())?,
        };
        let mut problem_count = match std::env::var("QUIZ_PROBLEM_COUNT") {
            Ok(raw) => parse_count(raw)?,
            Err(_) => DEFAULT_PROBLEM_COUNT,
        };
        let mut offline = false;

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--server" => server = parse_server_url(require_value(args, "--server")?)?,
                "--count" => problem_count = parse_count(require_value(args, "--count")?)?,
                "--offline-demo" => offline = true,
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        let backend = if offline {
            Backend::OfflineDemo
        } else {
            Backend::Server(server)
        };
        Ok(Self {
            backend,
            problem_count,
        })
    }
}

fn parse_server_url(raw: String) -> Result<Url, ArgsError> {
    match Url::parse(raw.trim()) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => Ok(url),
        _ => Err(ArgsError::InvalidServerUrl { raw }),
    }
}

fn parse_count(raw: String) -> Result<usize, ArgsError> {
    match raw.trim().parse::<usize>() {
        Ok(count) if count > 0 => Ok(count),
        _ => Err(ArgsError::InvalidCount { raw }),
    }
}

fn open_storage(backend: &Backend, clock: Clock) -> Result<Storage, Box<dyn std::error::Error>> {
    match backend {
        Backend::Server(base_url) => {
            log::info!("using quiz server at {base_url}");
            let repo = HttpRepository::connect(HttpConfig::new(base_url.clone()))?;
            Ok(Storage::http(repo))
        }
        Backend::OfflineDemo => {
            log::info!("using the offline demo banks");
            let repo = seeded_repository(InMemoryRepository::new().with_clock(clock))?;
            Ok(Storage::from_in_memory(repo))
        }
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut argv = std::env::args().skip(1);
    let parsed = Args::parse(&mut argv).map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;

    let clock = Clock::system();
    let storage = open_storage(&parsed.backend, clock)?;
    let services = QuizServices::new(&storage, clock, parsed.problem_count);

    let app: Arc<dyn UiApp> = Arc::new(DesktopApp { services });
    let context = build_app_context(&app);

    let desktop_cfg = DesktopConfig::new().with_window(
        WindowBuilder::new()
            .with_title("聚类测试")
            .with_always_on_top(false),
    );

    LaunchBuilder::desktop()
        .with_cfg(desktop_cfg)
        .with_context(context)
        .launch(App);
    Ok(())
}

#[tokio::main]
async fn main() {
    colog::init();
    if let Err(err) = run() {
        eprintln!("{err}");
        std::process::exit(2);
    }
}
