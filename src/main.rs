use log::{error, info};
use poll_tally::config::Config;
use poll_tally::handlers::{self, StdoutResponder};
use poll_tally::ids::TimeIdGenerator;
use poll_tally::store::PollStore;
use poll_tally::tasks;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};

#[tokio::main]
async fn main() {
    // Config::load also reads .env, which may set RUST_LOG
    let config = Config::load();
    env_logger::init();

    let config = match config {
        Ok(config) => config,
        Err(e) => {
            error!("Invalid configuration: {}", e);
            return;
        }
    };

    let ids = match TimeIdGenerator::new(config.id_bits) {
        Ok(ids) => ids,
        Err(e) => {
            error!("Invalid configuration: {}", e);
            return;
        }
    };
    let store = Arc::new(PollStore::new(Box::new(ids)));

    // --- Start Background Task for Ending Polls ---
    let store_clone = Arc::clone(&store);
    tokio::spawn(async move {
        tasks::poll_ender::check_expired_polls_task(store_clone, config.check_interval).await;
    });

    info!("Poll console ready. Type `help` for commands.");
    let responder = StdoutResponder::new();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        match lines.next_line().await {
            Ok(Some(line)) => {
                if let Err(why) = handlers::handle_line(&store, &responder, &line).await {
                    error!("Command handler error: {:?}", why);
                }
            }
            Ok(None) => break,
            Err(why) => {
                error!("Failed to read from stdin: {:?}", why);
                break;
            }
        }
    }

    info!("Input closed, shutting down.");
}
