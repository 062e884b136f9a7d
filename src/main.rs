use anyhow::{anyhow, Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tailor_fit::app;
use tailor_fit::config::{self, Config};
use tailor_fit::generator::{GeminiClient, Unavailable};
use tailor_fit::headless::{self, HeadlessRequest};
use tailor_fit::lifecycle::Controller;
use tailor_fit::logging::{self, LogTarget};
use tailor_fit::ui::{App, ToastKind};

#[derive(Parser, Debug)]
#[command(
    name = "tailor-fit",
    about = "A virtual saya-kurta fitting room for your terminal",
    version
)]
struct Args {
    /// Photo to start with (PNG, JPG, or WEBP)
    photo: Option<PathBuf>,

    /// Generate once without the UI and write the image to disk
    #[arg(long, requires = "photo")]
    generate: bool,

    /// Fit for --generate (e.g. "Slim Fit")
    #[arg(long, requires = "generate")]
    fit: Option<String>,

    /// Color for --generate
    #[arg(long, requires = "generate")]
    color: Option<String>,

    /// Fabric for --generate
    #[arg(long, requires = "generate")]
    fabric: Option<String>,

    /// Collar design for --generate
    #[arg(long, requires = "generate")]
    collar: Option<String>,

    /// Output file for --generate (defaults to a generated name in the output directory)
    #[arg(short, long, requires = "generate")]
    out: Option<PathBuf>,

    /// Store your Gemini API key in the system keychain
    #[arg(long)]
    setup: bool,

    /// Print every fit, color, fabric and collar design and exit
    #[arg(long)]
    list: bool,

    /// Log at debug level
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    if args.setup {
        config::setup_api_key_interactive().map_err(|e| anyhow!(e))?;
        return Ok(());
    }

    if args.list {
        print!("{}", headless::catalog_listing());
        return Ok(());
    }

    let config = Config::load();

    if args.generate {
        logging::init(args.verbose, LogTarget::Stderr)?;
        return run_headless(args, &config).await;
    }

    let log_path = logging::init(args.verbose, LogTarget::default_file())?;
    tracing::debug!(log = ?log_path, config = %Config::config_location(), "starting");

    let mut app = App::new(Controller::default());
    if let Some(photo) = &args.photo {
        if let Err(e) = app.open_photo(&photo.to_string_lossy()) {
            app.show_toast(&e.to_string(), ToastKind::Error);
        }
    }

    let output_dir = config.output_dir();
    match GeminiClient::from_config(&config) {
        Ok(client) => app::run_tui(app, Arc::new(client), output_dir).await,
        Err(err) => {
            tracing::warn!(error = %err, "image service unavailable");
            app.show_toast(&err.to_string(), ToastKind::Error);
            app::run_tui(app, Arc::new(Unavailable::new(err)), output_dir).await
        }
    }
}

async fn run_headless(args: Args, config: &Config) -> Result<()> {
    let request = HeadlessRequest {
        photo: args.photo.context("--generate needs a photo")?,
        fit: args.fit,
        color: args.color,
        fabric: args.fabric,
        collar: args.collar,
        out: args.out,
    };
    let client = GeminiClient::from_config(config)?;

    eprintln!("  Generating your virtual fitting...");
    let path = headless::run(&request, &client, &config.output_dir()).await?;
    println!("{}", path.display());
    Ok(())
}
