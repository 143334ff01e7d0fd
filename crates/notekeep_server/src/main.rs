//! Server entry point: settings, logging, state, listener.

use std::net::SocketAddr;

use log::{error, info};
use notekeep_core::init_logging;
use notekeep_server::config::Settings;
use notekeep_server::state::build_state;

#[tokio::main]
async fn main() {
    let settings = match Settings::new() {
        Ok(settings) => settings,
        Err(err) => {
            eprintln!("failed to load settings: {err}");
            std::process::exit(1);
        }
    };

    if let Err(err) = init_logging(&settings.log.level, &settings.log.dir) {
        eprintln!("failed to initialize logging: {err}");
        std::process::exit(1);
    }

    let state = match build_state(&settings) {
        Ok(state) => state,
        Err(err) => {
            error!("event=server_start module=main status=error error={err}");
            std::process::exit(1);
        }
    };

    let addr = SocketAddr::from(([0, 0, 0, 0], settings.server.port));
    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(err) => {
            error!("event=server_start module=main status=error port={} error={err}", settings.server.port);
            std::process::exit(1);
        }
    };

    info!(
        "event=server_start module=main status=ok port={}",
        settings.server.port
    );
    if let Err(err) = axum::serve(listener, notekeep_server::app(state)).await {
        error!("event=server_run module=main status=error error={err}");
        std::process::exit(1);
    }
}
