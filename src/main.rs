use anyhow::Result;
use hacky_news_tui::config::AppConfig;
use hacky_news_tui::internal::ui::app::App;
use hacky_news_tui::tui;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first to get logging settings
    let config = AppConfig::load();

    // While the TUI owns the terminal, logs must not go to stderr/stdout, so they go
    // to a daily rotating file. If the terminal cannot be set up, log to the console.
    match tui::init() {
        Ok(terminal) => {
            let log_dir = config.logging.log_directory.as_deref().unwrap_or("logs");
            let file_appender = tracing_appender::rolling::daily(log_dir, "hacky-news-tui.log");
            let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);

            // RUST_LOG wins over the configured levels.
            let env_filter = match std::env::var("RUST_LOG") {
                Ok(_) => tracing_subscriber::EnvFilter::from_default_env(),
                Err(_) => tracing_subscriber::EnvFilter::new(config.logging.filter_directives()),
            };

            tracing_subscriber::fmt()
                .with_env_filter(env_filter)
                .with_writer(non_blocking)
                .with_ansi(false)
                .compact()
                .init();

            tracing::info!(base_url = %config.base_url, "starting hacky-news-tui");

            let res = match App::new(config) {
                Ok(mut app) => app.run(terminal).await,
                Err(e) => Err(e),
            };

            // Restore terminal state before exiting so the console is usable again.
            tui::restore()?;

            if let Err(err) = res {
                tracing::error!("{err:?}");
                eprintln!("{err:?}");
            }

            Ok(())
        }
        Err(e) => {
            tracing_subscriber::fmt()
                .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
                .init();

            eprintln!("Failed to initialize TUI: {e:?}");
            Err(e.into())
        }
    }
}
