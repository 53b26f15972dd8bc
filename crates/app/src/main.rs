use std::fmt;
use std::sync::Arc;

use dioxus::LaunchBuilder;
use dioxus::desktop::{Config as DesktopConfig, WindowBuilder};
use ielts_core::model::{ModuleKind, TestId};
use services::{
    AccountService, AppConfig, AppServices, Clock, ResultHistoryService, SessionLoopService,
};
use tracing::info;
use tracing_subscriber::EnvFilter;
use ui::{App, UiApp, build_app_context};

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    MissingPositional { name: &'static str },
    UnknownArg(String),
    InvalidModule { raw: String },
    InvalidTestId { raw: String },
    InvalidApiUrl { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::MissingPositional { name } => write!(f, "missing <{name}>"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidModule { raw } => write!(
                f,
                "unknown module: {raw} (expected listening, reading, writing, speaking or generic)"
            ),
            ArgsError::InvalidTestId { raw } => write!(f, "invalid test id: {raw:?}"),
            ArgsError::InvalidApiUrl { raw } => write!(f, "invalid --api value: {raw:?}"),
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
    services: AppServices,
}

impl UiApp for DesktopApp {
    fn session_loop(&self) -> Arc<SessionLoopService> {
        self.services.session_loop()
    }

    fn accounts(&self) -> Arc<AccountService> {
        self.services.accounts()
    }

    fn history(&self) -> Arc<ResultHistoryService> {
        self.services.history()
    }
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  cargo run -p app -- ui        [--api <url>]");
    eprintln!("  cargo run -p app -- questions [--api <url>] <module> <test-id>");
    eprintln!();
    eprintln!("Defaults:");
    eprintln!("  --api {}", services::config::DEFAULT_API_URL);
    eprintln!();
    eprintln!("Environment:");
    eprintln!(
        "  {}, {}, RUST_LOG",
        services::config::API_URL_VAR,
        services::config::API_TIMEOUT_VAR
    );
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Ui,
    Questions,
}

impl Command {
    fn from_arg(arg: &str) -> Option<Self> {
        match arg {
            "ui" => Some(Self::Ui),
            "questions" => Some(Self::Questions),
            _ => None,
        }
    }
}

#[derive(Debug, Default)]
struct Args {
    api_url: Option<String>,
    positional: Vec<String>,
}

impl Args {
    fn parse(args: &mut impl Iterator<Item = String>) -> Result<Self, ArgsError> {
        let mut parsed = Self::default();
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--api" => {
                    let value = require_value(args, "--api")?;
                    if value.trim().is_empty() {
                        return Err(ArgsError::InvalidApiUrl { raw: value });
                    }
                    parsed.api_url = Some(value);
                }
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                flag if flag.starts_with("--") => return Err(ArgsError::UnknownArg(arg)),
                _ => parsed.positional.push(arg),
            }
        }
        Ok(parsed)
    }

    fn expect_no_positional(&self) -> Result<(), ArgsError> {
        match self.positional.first() {
            Some(extra) => Err(ArgsError::UnknownArg(extra.clone())),
            None => Ok(()),
        }
    }

    fn module_and_test(&self) -> Result<(ModuleKind, TestId), ArgsError> {
        let mut positional = self.positional.iter();
        let raw_module = positional
            .next()
            .ok_or(ArgsError::MissingPositional { name: "module" })?;
        let module = raw_module
            .parse::<ModuleKind>()
            .map_err(|_| ArgsError::InvalidModule {
                raw: raw_module.clone(),
            })?;
        let raw_test = positional
            .next()
            .ok_or(ArgsError::MissingPositional { name: "test-id" })?;
        let test_id = raw_test
            .parse::<TestId>()
            .map_err(|_| ArgsError::InvalidTestId {
                raw: raw_test.clone(),
            })?;
        if let Some(extra) = positional.next() {
            return Err(ArgsError::UnknownArg(extra.clone()));
        }
        Ok((module, test_id))
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut argv: Vec<String> = std::env::args().skip(1).collect();

    // Default behavior: launching UI when no subcommand is provided.
    let cmd = match argv.first().map(String::as_str) {
        None => Command::Ui,
        Some("--help" | "-h") => {
            print_usage();
            return Ok(());
        }
        Some(first) if first.starts_with("--") => Command::Ui,
        Some(first) => Command::from_arg(first).ok_or_else(|| {
            eprintln!("unknown subcommand: {first}");
            print_usage();
            std::io::Error::new(std::io::ErrorKind::InvalidInput, "unknown subcommand")
        })?,
    };

    if !argv.is_empty() && !argv[0].starts_with("--") {
        argv.remove(0);
    }

    let mut iter = argv.into_iter();
    let parsed = Args::parse(&mut iter).map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;

    let mut config = AppConfig::from_env()?;
    if let Some(api_url) = parsed.api_url.clone() {
        config = config.with_api_url(api_url);
    }
    let services = AppServices::new_http(&config, Clock::system())?;
    info!(api_url = %config.api_url, timeout_secs = config.timeout.as_secs(), "backend configured");

    match cmd {
        Command::Ui => {
            parsed.expect_no_positional()?;
            let app: Arc<dyn UiApp> = Arc::new(DesktopApp { services });
            let context = build_app_context(&app);

            // On macOS, Dioxus/tao can default to an always-on-top window in some dev setups.
            // Explicitly disable it so the app doesn't behave like a modal window.
            let desktop_cfg = DesktopConfig::new().with_window(
                WindowBuilder::new()
                    .with_title("IELTS Practice")
                    .with_always_on_top(false),
            );

            LaunchBuilder::desktop()
                .with_cfg(desktop_cfg)
                .with_context(context)
                .launch(App);
            Ok(())
        }
        Command::Questions => {
            let (module, test_id) = parsed.module_and_test().map_err(|e| {
                print_usage();
                e
            })?;
            let session = services.session_loop().prepare(module, &test_id).await;
            let set = session.question_set();
            println!(
                "{} ({} questions, {} min, source: {:?})",
                set.title(),
                set.total_questions(),
                session.descriptor().duration_secs() / 60,
                session.origin()
            );
            for (index, group) in set.groups().iter().enumerate() {
                let label = group
                    .label
                    .clone()
                    .unwrap_or_else(|| format!("Group {}", index + 1));
                println!("{label}");
                for question in &group.questions {
                    println!("  [{}] {}", question.id(), question.text());
                }
            }
            Ok(())
        }
    }
}

#[tokio::main]
async fn main() {
    init_tracing();
    if let Err(err) = run().await {
        // At this layer (binary glue), printing once is fine.
        eprintln!("{err}");
        std::process::exit(2);
    }
}
