//! Mindful application binary - composition root.
//!
//! 1. Parse the command line and load configuration from TOML
//! 2. Initialise tracing
//! 3. Either serve the HTTP API or reflect on one diary entry in the terminal

mod cli;

use clap::Parser;
use tokio::sync::broadcast;
use tracing_subscriber::EnvFilter;

use mindful_api::routes;
use mindful_api::state::AppState;
use mindful_core::config::MindfulConfig;
use mindful_core::events::StatusEvent;
use mindful_sentiment::{reflect, LexiconClassifier};
use mindful_speech::{
    text_or_empty, AudioInput, CaptureError, GoogleSpeechRecognizer, InputAcquisition, Recognizer,
};

use cli::{CliArgs, Command, DiaryArgs};

type BoxError = Box<dyn std::error::Error>;

/// Log filter: --log-level flag > RUST_LOG > config file.
fn env_filter(cli_level: Option<&str>, config_level: &str) -> EnvFilter {
    if let Some(level) = cli_level {
        return EnvFilter::new(level);
    }
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(config_level))
}

async fn serve(config: MindfulConfig) -> Result<(), BoxError> {
    let recognizer = Recognizer::Google(GoogleSpeechRecognizer::new(config.recognizer.clone())?);
    let state = AppState::new(config.clone(), recognizer);
    routes::start_server(&config, state).await?;
    Ok(())
}

#[cfg(feature = "microphone")]
async fn listen_live(
    acquisition: &InputAcquisition<GoogleSpeechRecognizer>,
    config: &MindfulConfig,
) -> Result<String, CaptureError> {
    let mut microphone = mindful_speech::Microphone::open(&config.listen).map_err(|e| {
        eprintln!("{}", e.status_event().message());
        e
    })?;
    acquisition
        .acquire(AudioInput::Microphone(&mut microphone))
        .await
}

#[cfg(not(feature = "microphone"))]
async fn listen_live(
    _acquisition: &InputAcquisition<GoogleSpeechRecognizer>,
    _config: &MindfulConfig,
) -> Result<String, CaptureError> {
    let err = CaptureError::ServiceUnavailable(
        "this build has no microphone support (enable the `microphone` feature)".to_string(),
    );
    eprintln!("{}", err.status_event().message());
    Err(err)
}

async fn diary(config: MindfulConfig, args: DiaryArgs) -> Result<(), BoxError> {
    let text = match args.text {
        Some(text) => text,
        None => {
            let recognizer = GoogleSpeechRecognizer::new(config.recognizer.clone())?;
            let (tx, mut rx) = broadcast::channel::<StatusEvent>(16);
            let acquisition =
                InputAcquisition::new(recognizer, config.listen.clone()).with_status(tx);

            let printer = tokio::spawn(async move {
                while let Ok(event) = rx.recv().await {
                    eprintln!("{}", event.message());
                }
            });

            let result = match args.file {
                Some(path) => {
                    let bytes = tokio::fs::read(&path).await?;
                    acquisition.acquire(AudioInput::recording(&bytes)).await
                }
                None => listen_live(&acquisition, &config).await,
            };

            // Closing the status channel lets the printer finish.
            drop(acquisition);
            printer.await?;
            text_or_empty(result)
        }
    };

    let classifier = LexiconClassifier::new();
    match reflect(&classifier, &text) {
        Some(reflection) => {
            println!("You said: {}", reflection.entry.text);
            println!();
            println!("{}", reflection.message.text);
        }
        None => println!("Nothing to reflect on yet. Try again whenever you are ready."),
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    let args = CliArgs::parse();

    let config_file = args.resolve_config_path();
    let mut config = MindfulConfig::load_or_default(&config_file);

    tracing_subscriber::fmt()
        .with_env_filter(env_filter(
            args.log_level.as_deref(),
            &config.general.log_level,
        ))
        .with_writer(std::io::stderr)
        .init();

    tracing::info!("Starting Mindful v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!(path = %config_file.display(), "Configuration loaded");

    config.general.port = args.resolve_port(config.general.port);

    match args.command() {
        Command::Serve => serve(config).await,
        Command::Diary(diary_args) => diary(config, diary_args).await,
    }
}
