use clap::{Parser, Subcommand, ValueEnum};
use nevada_vetboard_scraper::config::RegistryConfig;
use nevada_vetboard_scraper::error::ScrapeError;
use nevada_vetboard_scraper::registry::{examiner, facility, search};
use nevada_vetboard_scraper::render::{HeadlessRenderer, HttpRenderer, Renderer};
use nevada_vetboard_scraper::workbook;
use std::path::PathBuf;
use tracing::info;
use tracing_error::ErrorLayer;
use tracing_subscriber::prelude::*;

#[derive(Parser)]
#[command(about = "Scrape the Nevada veterinary board register into CSV and XLSX files")]
struct Cli {
    /// JSON config file; defaults carry the register's known values
    #[arg(long)]
    config: Option<PathBuf>,

    #[arg(long, value_enum, default_value_t = Engine::Browser)]
    engine: Engine,

    /// Show the browser window while crawling
    #[arg(long)]
    no_headless: bool,

    #[arg(long)]
    out_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Clone, Copy, ValueEnum)]
enum Engine {
    Browser,
    Http,
}

#[derive(Subcommand)]
enum Command {
    /// Crawl the paged examiner search into the examiners CSV
    SearchExaminers,
    /// Crawl the paged facility search into the facilities CSV
    SearchFacilities,
    /// Visit every examiner profile and extract licenses, notices, workplaces
    ExaminerProfiles,
    /// Visit every facility profile and extract the labeled detail fields
    FacilityProfiles,
    /// Assemble the flat CSV files into one workbook
    Combine {
        #[arg(long, value_enum, default_value_t = Target::Facilities)]
        target: Target,
    },
    /// The full sequence: both searches, both profile crawls, both workbooks
    All,
}

#[derive(Clone, Copy, ValueEnum)]
enum Target {
    Facilities,
    Examiners,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_env("LOG_LEVEL").unwrap_or_else(|_| {
                "info,html5ever=error,selectors=error,hyper=warn,reqwest=info".into()
            }),
        )
        .with(ErrorLayer::default())
        .init();

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => RegistryConfig::load(path)?,
        None => RegistryConfig::default(),
    };
    if cli.no_headless {
        config.headless = false;
    }
    if let Some(out_dir) = &cli.out_dir {
        config.out_dir = out_dir.clone();
    }
    std::fs::create_dir_all(&config.out_dir)?;

    let renderer: Box<dyn Renderer> = match cli.engine {
        Engine::Browser => Box::new(HeadlessRenderer::new(
            config.headless,
            config.settle(),
            config.wait(),
        )?),
        Engine::Http => Box::new(HttpRenderer::new()?),
    };

    run(&cli.command, renderer.as_ref(), &config)?;
    Ok(())
}

fn run(
    command: &Command,
    renderer: &dyn Renderer,
    config: &RegistryConfig,
) -> Result<(), ScrapeError> {
    match command {
        Command::SearchExaminers => search_examiners(renderer, config),
        Command::SearchFacilities => search_facilities(renderer, config),
        Command::ExaminerProfiles => examiner_profiles(renderer, config),
        Command::FacilityProfiles => facility_profiles(renderer, config),
        Command::Combine { target } => combine(*target, config),
        Command::All => {
            search_examiners(renderer, config)?;
            search_facilities(renderer, config)?;
            examiner_profiles(renderer, config)?;
            facility_profiles(renderer, config)?;
            combine(Target::Examiners, config)?;
            combine(Target::Facilities, config)
        }
    }
}

fn search_examiners(renderer: &dyn Renderer, config: &RegistryConfig) -> Result<(), ScrapeError> {
    let crawl = search::SearchCrawl {
        base_url: &config.examiners_url,
        total: config.examiners_total,
        page_size: config.page_size,
        link_column: config.link_column,
    };
    let rows = search::crawl(renderer, &crawl, &config.path(&config.examiners_file))?;
    info!("Collected {} examiner search rows", rows);
    Ok(())
}

fn search_facilities(renderer: &dyn Renderer, config: &RegistryConfig) -> Result<(), ScrapeError> {
    let crawl = search::SearchCrawl {
        base_url: &config.facilities_url,
        total: config.facilities_total,
        page_size: config.page_size,
        link_column: config.link_column,
    };
    let rows = search::crawl(renderer, &crawl, &config.path(&config.facilities_file))?;
    info!("Collected {} facility search rows", rows);
    Ok(())
}

fn examiner_profiles(renderer: &dyn Renderer, config: &RegistryConfig) -> Result<(), ScrapeError> {
    let visited = examiner::crawl(
        renderer,
        &config.path(&config.examiners_file),
        &examiner::ProfileOutputs {
            licenses: &config.path(&config.licenses_file),
            notices: &config.path(&config.notices_file),
            workplaces: &config.path(&config.workplaces_file),
        },
    )?;
    info!("Visited {} examiner profiles", visited);
    Ok(())
}

fn facility_profiles(renderer: &dyn Renderer, config: &RegistryConfig) -> Result<(), ScrapeError> {
    let visited = facility::crawl(
        renderer,
        &config.path(&config.facilities_file),
        &config.path(&config.facility_profiles_file),
    )?;
    info!("Visited {} facility profiles", visited);
    Ok(())
}

fn combine(target: Target, config: &RegistryConfig) -> Result<(), ScrapeError> {
    match target {
        Target::Facilities => workbook::combine(
            &[
                (config.path(&config.facilities_file), "facilities"),
                (
                    config.path(&config.facility_profiles_file),
                    "facility-profile",
                ),
            ],
            &config.path(&config.facilities_workbook),
        ),
        Target::Examiners => workbook::combine(
            &[
                (config.path(&config.examiners_file), "examiners"),
                (config.path(&config.licenses_file), "licenses"),
                (config.path(&config.notices_file), "notices"),
                (config.path(&config.workplaces_file), "workplaces"),
            ],
            &config.path(&config.examiners_workbook),
        ),
    }
}
