use anyhow::bail;
use clap::Parser;
use tracing_subscriber::EnvFilter;

mod batch;
mod catalog;
mod channel;
mod cli;
mod config;
mod errors;
mod metadata;
mod probe;
mod retry;
mod scrape;

use batch::{BatchOptions, BatchSpec, Ingestor};
use catalog::CatalogRemote;
use config::Config;
use metadata::WatchPageFetcher;

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_logging();

    let args = cli::Args::parse();

    if let Some(path) = &args.html_file {
        let meta = probe::probe_html(path)?;
        println!("{}", probe::render(&meta));
        return Ok(());
    }

    let config = Config::load(args.config.as_deref());

    if let Some(url) = &args.probe {
        // the catalog is not needed to probe, a missing base url is fine here
        let config = match config {
            Ok(config) => config,
            Err(errors::IngestError::Config(_)) if args.config.is_none() => Config::default(),
            Err(err) => return Err(err.into()),
        };
        let fetcher = WatchPageFetcher::new(&config.user_agent, config.metadata_timeout())?;
        let meta = probe::probe(&fetcher, &config.retry_policy(), url)?;
        println!("{}", probe::render(&meta));
        return Ok(());
    }

    if args.json_path.is_none() && (args.channel_id.is_none() || args.url.is_none()) {
        println!("{}", cli::USAGE);
        std::process::exit(1);
    }

    let config = config?;
    let remote = CatalogRemote::new(&config)?;
    let fetcher = WatchPageFetcher::new(&config.user_agent, config.metadata_timeout())?;
    let mut ingestor = Ingestor::new(
        &remote,
        &fetcher,
        config.retry_policy(),
        &config.catalog.hint.form_field,
    );

    match (&args.json_path, &args.channel_id, &args.url) {
        (Some(path), _, _) => {
            let spec = BatchSpec::load(path)?;
            let opts = BatchOptions {
                delay: args.delay(),
                dry_run: args.dry_run,
                continue_on_error: args.continue_on_error,
                channel_id_mode: args.channel_id_mode,
            };

            let report = ingestor.run(&spec, &opts)?;
            println!("{}", serde_json::to_string_pretty(&report)?);
            if report.failed() > 0 {
                log::warn!("{} url(s) failed, see the report above", report.failed());
            }
        }
        (None, Some(channel_id), Some(url)) => {
            let inserted = ingestor.insert_single(channel_id, url, args.dry_run)?;
            log::info!("{}", if inserted { "inserted" } else { "nothing to do" });
        }
        _ => bail!("nothing to do"),
    }

    Ok(())
}
