// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

//! Serves the pages that launch modules in the browser, and the static files (modules included)
//! they load.

mod pages;
mod static_files;

use std::path::PathBuf;

use actix_web::web::{self, ServiceConfig};
use common::env_const::{ServerAddress, get_page_title, get_server_address, get_static_dir};
use launch_env::{EnvError, Environment};

pub use pages::{PAGE_ROUTES, Pages};
pub use static_files::{STATIC_FILES_PATH_PREFIX, StaticDir};

pub struct ServerConfig {
    pub address: ServerAddress,
    pub static_dir: PathBuf,
    pub page_title: String,
}

impl ServerConfig {
    pub fn from_env(env: &dyn Environment) -> Result<Self, EnvError> {
        Ok(Self {
            address: get_server_address(env)?,
            static_dir: PathBuf::from(get_static_dir(env)),
            page_title: get_page_title(env),
        })
    }
}

pub fn configure_router(page_cache: Pages, static_dir: StaticDir) -> impl FnOnce(&mut ServiceConfig) {
    move |app| {
        app.app_data(web::Data::new(static_dir)).route(
            &format!("{STATIC_FILES_PATH_PREFIX}/{{path:.*}}"),
            web::get().to(static_files::serve_static),
        );

        for (route, body) in page_cache.iter().cloned() {
            app.route(
                route,
                web::get().to(move || {
                    let body = body.clone();
                    async move { pages::page_response(body) }
                }),
            );
        }
    }
}
