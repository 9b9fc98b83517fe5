use std::process::ExitCode;

use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use itinerary_server::config::Settings;
use itinerary_server::feed::Feed;
use itinerary_server::web::{AppState, create_router};

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| "info,tower_http=info".into()),
        )
        .init();

    let settings = match Settings::from_env() {
        Ok(settings) => settings,
        Err(e) => {
            error!("invalid settings: {e}");
            return ExitCode::FAILURE;
        }
    };

    // Load the feed (fail fast if unavailable)
    let mut feed = match Feed::load(&settings.feed_path) {
        Ok(feed) => feed,
        Err(e) => {
            error!(path = %settings.feed_path.display(), "failed to load feed: {e}");
            return ExitCode::FAILURE;
        }
    };
    if let Some(cutoff) = settings.calendar_cutoff {
        feed.retain_calendar_from(cutoff);
    }
    info!(
        stops = feed.stop_count(),
        trips = feed.trip_count(),
        direct_trips = feed.direct_trip_count(),
        segments = settings.segments.len(),
        "loaded feed"
    );

    // Build app state
    let state = AppState::new(feed, settings.segments, settings.engine, &settings.cache);

    // Create router
    let app = create_router(state);

    // Bind and serve
    let listener = match tokio::net::TcpListener::bind(settings.bind).await {
        Ok(listener) => listener,
        Err(e) => {
            error!(addr = %settings.bind, "failed to bind: {e}");
            return ExitCode::FAILURE;
        }
    };
    info!("itinerary planner listening on http://{}", settings.bind);
    info!("  GET  /health                  - Health check");
    info!("  GET  /api/stops/search        - Search stops by name");
    info!("  GET  /api/stops/destinations  - Stops reachable by direct trip");
    info!("  POST /itinerary/plan          - Plan an itinerary");

    if let Err(e) = axum::serve(listener, app).await {
        error!("server error: {e}");
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}
