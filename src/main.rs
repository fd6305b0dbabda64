//! Command-line front end for the service listing editor.
//!
//! ```bash
//! service-studio validate draft.json --publish
//! service-studio attach draft.json --kind image ./photo.png
//! service-studio submit draft.json --publish
//! service-studio edit 6f1d2a4e-... --currency EUR --out draft.json
//! ```

use clap::{Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

use service_studio::{
    config::{get_config, init_config},
    error::Error,
    models::{
        draft::ServiceDraft,
        localized::Locale,
        media::{MediaFile, MediaKind},
        service::ServiceStatus,
    },
    services::currency_service::default_display_currency,
    session::{EditSession, PresentationMode},
    utils::validation::validate,
    Studio,
};

#[derive(Parser)]
#[command(name = "service-studio")]
#[command(version)]
#[command(about = "Create, edit and publish service listings", long_about = None)]
struct Cli {
    /// Language of messages shown to the user
    #[arg(long, global = true)]
    locale: Option<Locale>,

    /// Use the admin service endpoints
    #[arg(long, global = true)]
    admin: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check a draft file and list field errors
    Validate {
        draft: PathBuf,
        /// Apply publish rules instead of draft rules
        #[arg(long)]
        publish: bool,
    },
    /// Upload a file and reference it from the draft
    Attach {
        draft: PathBuf,
        #[arg(long, value_enum)]
        kind: Slot,
        file: PathBuf,
    },
    /// Save or publish a draft file
    Submit {
        draft: PathBuf,
        #[arg(long)]
        publish: bool,
        /// Update this service instead of creating a new one
        #[arg(long)]
        id: Option<Uuid>,
    },
    /// Load an existing service into a draft file
    Edit {
        id: Uuid,
        /// Display currency for prices
        #[arg(long)]
        currency: Option<String>,
        #[arg(long, short)]
        out: PathBuf,
    },
    /// Print a service as JSON
    Show { id: Uuid },
    /// Change the status of a service
    Status { id: Uuid, status: ServiceStatus },
    /// Delete a service
    Delete { id: Uuid },
    /// Flip the favorite flag of a service
    Favorite { id: Uuid },
    /// List categories
    Categories,
    /// List active currencies
    Currencies,
}

#[derive(Clone, Copy, ValueEnum)]
enum Slot {
    Cover,
    Image,
    Video,
    Document,
}

impl From<Slot> for MediaKind {
    fn from(slot: Slot) -> Self {
        match slot {
            Slot::Cover => MediaKind::Cover,
            Slot::Image => MediaKind::Image,
            Slot::Video => MediaKind::Video,
            Slot::Document => MediaKind::Document,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    init_config()?;
    let mut config = get_config()?.clone();
    if let Some(locale) = cli.locale {
        config.default_locale = locale;
    }
    config.admin_mode |= cli.admin;

    let studio = Studio::new(&config)?;
    if let Err(e) = run(cli.command, &studio).await {
        eprintln!("Error: {}", e.user_message(studio.locale));
        if let Error::Validation(errors) = &e {
            for (field, message) in errors {
                eprintln!("  {}: {}", field, message);
            }
        }
        std::process::exit(1);
    }
    Ok(())
}

async fn run(command: Commands, studio: &Studio) -> Result<(), Error> {
    match command {
        Commands::Validate { draft, publish } => {
            let draft = read_draft(&draft)?;
            let errors = validate(&draft, publish, studio.locale);
            if !errors.is_empty() {
                return Err(Error::Validation(errors));
            }
            println!("OK");
        }
        Commands::Attach { draft: path, kind, file } => {
            let mut draft = read_draft(&path)?;
            let file = read_media(&file)?;
            let url = studio.media.add_media(&mut draft, kind.into(), file).await?;
            write_draft(&path, &draft)?;
            println!("{}", url);
        }
        Commands::Submit { draft, publish, id } => {
            let draft = read_draft(&draft)?;
            let target = if publish {
                ServiceStatus::Published
            } else {
                ServiceStatus::Draft
            };
            let id = studio.dispatcher.submit(&draft, target, id).await?;
            println!("{}", id);
        }
        Commands::Edit { id, currency, out } => {
            let service = studio.catalog.get_service(id).await?;
            let currency = match currency {
                Some(code) => code,
                None => preferred_currency(studio).await,
            };
            let session = EditSession::hydrate(
                &service,
                PresentationMode::Standalone,
                &currency,
                &studio.normalizer,
                studio.locale,
            )
            .await;
            write_draft(&out, session.draft())?;
            info!(%id, path = %out.display(), "Draft written");
        }
        Commands::Show { id } => {
            let service = studio.catalog.get_service(id).await?;
            println!("{}", serde_json::to_string_pretty(&service)?);
        }
        Commands::Status { id, status } => {
            studio.catalog.update_status(id, status).await?;
            println!("{} {}", id, status);
        }
        Commands::Delete { id } => {
            studio.catalog.delete_service(id).await?;
            println!("{} deleted", id);
        }
        Commands::Favorite { id } => {
            let mut favorites = studio.favorites();
            favorites.load().await?;
            let favorite = favorites.toggle(id).await?;
            println!("{} favorite={}", id, favorite);
        }
        Commands::Categories => {
            for category in studio.catalog.list_categories().await? {
                println!("{}\t{}", category.id, category.name.resolve(studio.locale));
            }
        }
        Commands::Currencies => {
            for currency in studio.currencies.list_active_currencies().await? {
                println!("{}\t{}\t{}", currency.code, currency.symbol, currency.name);
            }
        }
    }
    Ok(())
}

async fn preferred_currency(studio: &Studio) -> String {
    let canonical = studio.normalizer.canonical_currency().to_string();
    match studio.currencies.list_active_currencies().await {
        Ok(list) => default_display_currency(&list, &canonical).unwrap_or(canonical),
        Err(_) => canonical,
    }
}

fn read_draft(path: &Path) -> Result<ServiceDraft, Error> {
    let raw = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&raw)?)
}

fn write_draft(path: &Path, draft: &ServiceDraft) -> Result<(), Error> {
    std::fs::write(path, serde_json::to_string_pretty(draft)?)?;
    Ok(())
}

fn read_media(path: &Path) -> Result<MediaFile, Error> {
    let data = std::fs::read(path)?;
    let file_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| Error::BadRequest(format!("Invalid file name: {}", path.display())))?;
    Ok(MediaFile::new(file_name, content_type(file_name), data))
}

fn content_type(file_name: &str) -> &'static str {
    let ext = file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "webp" => "image/webp",
        "gif" => "image/gif",
        "mp4" => "video/mp4",
        "mov" => "video/quicktime",
        "webm" => "video/webm",
        "pdf" => "application/pdf",
        "doc" => "application/msword",
        "docx" => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        _ => "application/octet-stream",
    }
}
