//! Headless host for the Swarm hypocenter layer.
//!
//! Wires the event feed, the hypocenter layer, and a fixed viewport
//! together, and logs a summary of every render pass in place of painting.
//!
//! # Startup Sequence
//!
//! 1. Load configuration from `swarm-config.yaml`
//! 2. Initialize structured logging (tracing), `RUST_LOG` first, then the
//!    configured level
//! 3. Build the viewport from the `map` section
//! 4. Build the layer with the host observer
//! 5. Apply the hypocenter source: `none` or an unusable URL clears the
//!    layer, anything else starts the feed poller
//! 6. Import any `GeoJSON` files given on the command line
//! 7. Render on every repaint request and follow console commands (see
//!    [`command`]) until Ctrl-C
//! 8. Stop the feed poller

mod command;
mod error;
mod feed_bridge;
mod feed_control;
mod host;
mod render;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::Utc;
use swarm_feed::client::{EventFeed, FileFeed};
use swarm_hypocenters::cache::EventCache;
use swarm_hypocenters::config::{HypocenterConfig, HypocenterSource, SwarmConfig};
use swarm_hypocenters::draw::RenderOptions;
use swarm_hypocenters::layer::{HypocenterLayer, LayerObserver};
use swarm_hypocenters::viewport::{EquirectangularViewport, PixelExtents};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::command::HostCommand;
use crate::error::MapError;
use crate::feed_control::FeedController;
use crate::host::HostObserver;
use crate::render::RenderSummary;

/// Application entry point for the map host.
///
/// # Errors
///
/// Returns an error if configuration is invalid or waiting for Ctrl-C
/// fails.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. Load configuration.
    let (config, from_file) = load_config()?;

    // 2. Initialize structured logging.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.logging.level)),
        )
        .with_target(true)
        .init();

    info!("swarm-map starting");
    if !from_file {
        info!("Config file not found, using defaults");
    }
    info!(
        source = ?config.hypocenters.source,
        refresh_interval_secs = config.hypocenters.refresh_interval_secs,
        request_timeout_ms = config.hypocenters.request_timeout_ms,
        color_mode = ?config.hypocenters.color_mode,
        "Configuration loaded"
    );

    let imports: Vec<PathBuf> = std::env::args_os().skip(1).map(PathBuf::from).collect();
    run(config, &imports).await?;

    info!("swarm-map shutdown complete");
    Ok(())
}

/// Run the host until Ctrl-C.
async fn run(config: SwarmConfig, imports: &[PathBuf]) -> Result<(), MapError> {
    // 3. Build the viewport.
    let mut viewport = EquirectangularViewport::new(
        config.map.range(),
        PixelExtents {
            width: f64::from(config.map.width_px),
            height: f64::from(config.map.height_px),
            inset: f64::from(config.map.inset_px),
        },
    )
    .with_latitude_scaling();

    // 4. Build the layer.
    let host = Arc::new(HostObserver::new());
    let observer = Arc::clone(&host) as Arc<dyn LayerObserver>;
    let options = RenderOptions {
        color_mode: config.hypocenters.color_mode,
        legend_enabled: config.hypocenters.legend_enabled,
    };
    let mut layer = HypocenterLayer::new(Arc::new(EventCache::new()), options, observer);

    // 5. Apply the hypocenter source.
    let mut settings = config.hypocenters;
    let mut feed = FeedController::new(layer.feed_sink(), settings.refresh_interval());
    feed.apply_config(&settings).await;

    // 6. Import catalogs from the command line.
    for path in imports {
        import_file(&mut layer, path).await;
    }

    // 7. Render and follow console commands until Ctrl-C.
    info!("Entering render loop, press Ctrl-C to exit");
    let mut console = BufReader::new(tokio::io::stdin()).lines();
    let mut console_open = true;
    loop {
        tokio::select! {
            signal = tokio::signal::ctrl_c() => {
                signal?;
                info!("Shutdown requested");
                break;
            }
            () = host.repaint_requested_wait() => {
                render_pass(&layer, &mut viewport, &host);
            }
            line = console.next_line(), if console_open => match line {
                Ok(Some(line)) if line.trim().is_empty() => {}
                Ok(Some(line)) => match line.parse::<HostCommand>() {
                    Ok(command) => {
                        handle_command(command, &mut settings, &mut feed, &mut layer).await;
                    }
                    Err(e) => warn!(error = %e, "Ignoring console line"),
                },
                Ok(None) => {
                    info!("Console closed, commands disabled");
                    console_open = false;
                }
                Err(e) => {
                    warn!(error = %e, "Console read failed, commands disabled");
                    console_open = false;
                }
            },
        }
    }

    // 8. Stop the feed.
    feed.shutdown().await;
    Ok(())
}

/// Apply one console command.
async fn handle_command(
    command: HostCommand,
    settings: &mut HypocenterConfig,
    feed: &mut FeedController,
    layer: &mut HypocenterLayer,
) {
    match command {
        HostCommand::Show => feed.set_visible(true).await,
        HostCommand::Hide => feed.set_visible(false).await,
        HostCommand::Pause => feed.set_refresh_enabled(false),
        HostCommand::Resume => feed.set_refresh_enabled(true),
        HostCommand::Source(source) => {
            settings.source = source;
            feed.apply_config(settings).await;
        }
        HostCommand::Url(url) => {
            settings.source = HypocenterSource::Custom;
            settings.url = Some(url);
            feed.apply_config(settings).await;
        }
        HostCommand::Mode(mode) => layer.set_color_mode(mode),
        HostCommand::Legend(enabled) => layer.set_legend_enabled(enabled),
        HostCommand::Status => {
            let cache = layer.cache();
            info!(
                source = ?settings.source,
                visible = feed.is_visible(),
                polling = feed.poller().is_some(),
                refreshes = feed.poller().map_or(0, swarm_feed::poller::FeedPoller::refresh_count),
                displayed = cache.len(),
                imported = cache.imported_len(),
                "Host status"
            );
        }
    }
}

/// Import one `GeoJSON` catalog. Failures are logged and skipped.
async fn import_file(layer: &mut HypocenterLayer, path: &Path) {
    match EventFeed::from(FileFeed::new(path)).fetch().await {
        Ok(catalog) => {
            if catalog.skipped > 0 {
                warn!(
                    path = %path.display(),
                    skipped = catalog.skipped,
                    "Some features in the import were malformed"
                );
            }
            layer.import_events(catalog.events);
        }
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Import failed");
        }
    }
}

/// Apply any pending recenter, draw, and log what would be painted.
fn render_pass(layer: &HypocenterLayer, viewport: &mut EquirectangularViewport, host: &HostObserver) {
    if let Some(region) = host.take_recenter() {
        viewport.set_range(region);
    }
    let commands = layer.draw(&*viewport, Utc::now());
    RenderSummary::from_commands(&commands, layer.options().color_mode, layer.hover().target_id())
        .log();
}

/// Load configuration from `swarm-config.yaml` in the working directory.
///
/// Falls back to defaults (plus environment overrides) when the file does
/// not exist. The flag reports whether the file was read.
fn load_config() -> Result<(SwarmConfig, bool), MapError> {
    let config_path = Path::new("swarm-config.yaml");
    if config_path.exists() {
        Ok((SwarmConfig::from_file(config_path)?, true))
    } else {
        Ok((SwarmConfig::parse("")?, false))
    }
}
