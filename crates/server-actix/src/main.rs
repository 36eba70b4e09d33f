// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use actix_web::{App, HttpServer, middleware};

use common::logging_tracing;
use server_actix::{Pages, ServerConfig, StaticDir, configure_router};
use thiserror::Error;
use tracing::info;
use tracing_actix_web::TracingLogger;

use std::io::ErrorKind;
use std::net::SocketAddr;
use std::time;

use launch_env::SystemEnvironment;

#[derive(Error)]
enum ServerError {
    #[error("Port {0} is already in use. Check if there is another process running at that port.")]
    PortInUse(u16),
    #[error("{0}")]
    Io(#[from] std::io::Error),
    #[error("{0}")]
    EnvError(#[from] launch_env::EnvError),
    #[error("{0}")]
    Tracing(#[from] logging_tracing::TracingError),
}

// A custom `Debug` implementation for `ServerError` (that delegate to the `Display` impl), so that
// we don't print the default `Debug` implementation's message when the server exits.
impl std::fmt::Debug for ServerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{self}")
    }
}

/// Serve the module pages and static files
#[actix_web::main]
async fn main() -> Result<(), ServerError> {
    let start_time = time::SystemTime::now();

    logging_tracing::init()?;

    let config = ServerConfig::from_env(&SystemEnvironment)?;
    let pages = Pages::render(&config.page_title);
    let static_dir = StaticDir(config.static_dir.clone());

    info!(static_dir = %config.static_dir.display(), "Serving static files");

    let server = HttpServer::new(move || {
        App::new()
            .wrap(TracingLogger::default())
            .wrap(middleware::NormalizePath::new(
                middleware::TrailingSlash::Trim,
            ))
            .configure(configure_router(pages.clone(), static_dir.clone()))
    });

    let address = &config.address;

    match server.bind((address.host.as_str(), address.port)) {
        Ok(server) => {
            println!(
                "Started server on {} in {:.2} ms",
                pretty_addr(&server.addrs()),
                start_time
                    .elapsed()
                    .map(|elapsed| elapsed.as_micros() as f64 / 1000.0)
                    .unwrap_or_default()
            );
            Ok(server.run().await?)
        }
        Err(e) => Err(if e.kind() == ErrorKind::AddrInUse {
            ServerError::PortInUse(address.port)
        } else {
            ServerError::Io(e)
        }),
    }
}

fn pretty_addr(addrs: &[SocketAddr]) -> String {
    match addrs {
        // Print single address without square brackets
        [addr] => format!("{addr}"),
        _ => {
            format!("{addrs:?}")
        }
    }
}
