// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::{
    io::ErrorKind,
    path::{Component, Path, PathBuf},
};

use actix_web::{HttpResponse, http::header, web};
use tracing::warn;

pub const STATIC_FILES_PATH_PREFIX: &str = "/static";

/// Root directory of the files served under [`STATIC_FILES_PATH_PREFIX`].
#[derive(Debug, Clone)]
pub struct StaticDir(pub PathBuf);

impl StaticDir {
    /// Map a request path (relative to the prefix) to a file inside the directory.
    ///
    /// Only plain path segments are accepted, so a request can never escape the directory.
    fn resolve(&self, request_path: &str) -> Option<PathBuf> {
        let relative = Path::new(request_path);

        let plain = relative
            .components()
            .all(|component| matches!(component, Component::Normal(_)));

        (plain && !request_path.is_empty()).then(|| self.0.join(relative))
    }
}

pub(crate) async fn serve_static(
    path: web::Path<String>,
    static_dir: web::Data<StaticDir>,
) -> HttpResponse {
    let request_path = path.into_inner();

    let Some(file_path) = static_dir.resolve(&request_path) else {
        return HttpResponse::NotFound().finish();
    };

    match tokio::fs::read(&file_path).await {
        Ok(content) => {
            let content_type = mime_guess::from_path(&file_path).first_or_octet_stream();
            HttpResponse::Ok()
                .insert_header((header::CONTENT_TYPE, content_type.essence_str()))
                .body(content)
        }
        Err(e) if matches!(e.kind(), ErrorKind::NotFound | ErrorKind::IsADirectory) => {
            HttpResponse::NotFound().finish()
        }
        Err(e) => {
            warn!("Failed to read static file {}: {e}", file_path.display());
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_plain_paths() {
        let dir = StaticDir(PathBuf::from("/srv/static"));

        assert_eq!(
            dir.resolve("wasm/home.wasm"),
            Some(PathBuf::from("/srv/static/wasm/home.wasm"))
        );
    }

    #[test]
    fn rejects_escaping_paths() {
        let dir = StaticDir(PathBuf::from("/srv/static"));

        for path in ["../secret", "wasm/../../secret", "/etc/passwd", "./wasm", ""] {
            assert_eq!(dir.resolve(path), None, "{path} should be rejected");
        }
    }
}
