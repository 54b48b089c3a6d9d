use clap::error::ErrorKind;
use clap::Parser;
use product_pages::utils::{logger, validation::Validate};
use product_pages::{
    source_for, CliArgs, GenerationEngine, GeneratorError, LandingPipeline, LocalStorage, Settings,
};

#[tokio::main]
async fn main() {
    let args = match CliArgs::try_parse() {
        Ok(args) => args,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => e.exit(),
        Err(e) => {
            // Usage errors share exit code 1 with every other failure.
            let _ = e.print();
            std::process::exit(1);
        }
    };

    if args.json_logs {
        logger::init_json_logger(args.verbose);
    } else {
        logger::init_cli_logger(args.verbose);
    }

    if let Err(e) = run(args).await {
        tracing::error!(
            "❌ Generation failed: {} (Category: {:?})",
            e,
            e.category()
        );
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        std::process::exit(1);
    }
}

async fn run(args: CliArgs) -> Result<(), GeneratorError> {
    let settings = Settings::from_args(args)?;
    tracing::debug!("Resolved settings: {:?}", settings);
    settings.validate()?;

    tracing::info!(
        "Source: {} | site: {} | output: {}",
        settings.source,
        settings.site_url,
        settings.output
    );

    let source = source_for(&settings)?;
    let storage = LocalStorage::new(settings.output.clone());
    let pipeline = LandingPipeline::new(storage, settings, source);
    let engine = GenerationEngine::new(pipeline);

    let report = engine.run().await?;
    tracing::info!(
        "✅ {} product pages, catalog, sitemap, robots and search index written ({} files)",
        report.pages_written,
        report.files.len()
    );
    Ok(())
}
