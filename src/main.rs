#[cfg(all(target_os = "linux", target_env = "musl"))]
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

use std::{sync::Arc, time::Duration};

use anyhow::Result;

use crate::{config::SETTINGS, crawler::campus::CampusApi, feed::QuoteFeed};

pub mod config;
pub mod crawler;
pub mod declare;
pub mod error;
pub mod feed;
pub mod logging;
pub mod util;
pub mod web;

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    util::ensure_rustls_crypto_provider();

    logging::info_console(format!(
        "quote_feed v{} polling {}",
        env!("CARGO_PKG_VERSION"),
        SETTINGS.feed.endpoint
    ));

    let feed = Arc::new(QuoteFeed::new(
        CampusApi::new(SETTINGS.feed.endpoint.clone()),
        Duration::from_secs(SETTINGS.feed.interval_secs),
    ));
    feed.start()?;

    let shutdown = async {
        if let Err(why) = tokio::signal::ctrl_c().await {
            logging::error_file_async(format!("Failed to listen for ctrl-c because {:?}", why));
        }
    };

    let served = web::serve(Arc::clone(&feed), SETTINGS.system.http_port, shutdown).await;

    feed.stop();
    logging::info_console("quote_feed stopped".to_string());

    if let Err(why) = &served {
        logging::error_console(format!("Snapshot API failed because {:?}", why));
    }

    served
}
