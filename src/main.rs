use tracing::{error, info, instrument};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use sheet_content_loader::config::Config;
use sheet_content_loader::context::SiteContext;
use sheet_content_loader::fetcher::SheetFetcher;
use sheet_content_loader::loader::ContentLoader;
use sheet_content_loader::view;

#[tokio::main]
#[instrument]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing with environment filter support
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,sheet_content_loader=debug")),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(true)
                .with_line_number(true)
                .with_writer(std::io::stderr),
        )
        .init();

    dotenvy::dotenv().ok();

    let config = Config::from_env()?;
    info!("Starting sheet content loader with config: {:?}", config);

    // Renderers are checked against the configured sections before any fetch
    let registry = view::registry();
    registry.validate(&config.sections)?;

    let loader = ContentLoader::new(SheetFetcher::new(config.sheet_base_url.clone()));
    let report = loader.load_all(&config.sections).await;

    for (section, e) in &report.failures {
        error!("Section '{}' will not render: {}", section, e);
    }

    let ctx = SiteContext::build(&config.sections, &report.content);
    let rendered = registry.render_all(&config.sections, &report.content, &ctx);
    info!("Rendered {} sections", rendered.len());

    let sections: serde_json::Map<String, serde_json::Value> = rendered
        .into_iter()
        .map(|(section, value)| (section.to_string(), value))
        .collect();

    let output = serde_json::json!({
        "loaded_at": report.loaded_at,
        "complete": report.is_complete(),
        "context": ctx,
        "sections": sections,
    });
    println!("{}", serde_json::to_string_pretty(&output)?);

    Ok(())
}
