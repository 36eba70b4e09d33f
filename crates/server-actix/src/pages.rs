// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use actix_web::{HttpResponse, web::Bytes};

const PAGE_TEMPLATE: &str = include_str!("../assets/page.html");

/// Page routes and the module each page launches.
pub const PAGE_ROUTES: [(&str, &str); 2] = [
    ("/", "/static/wasm/home.wasm"),
    ("/about", "/static/wasm/about.wasm"),
];

const PAGE_HEADERS: [(&str, &str); 4] = [
    ("Content-Type", "text/html; charset=UTF-8"),
    ("Content-Security-Policy", "default-src 'self';"),
    ("X-Content-Type-Options", "nosniff"),
    ("X-Frame-Options", "DENY"),
];

/// Every page, rendered once at startup.
#[derive(Clone)]
pub struct Pages {
    pages: Vec<(&'static str, Bytes)>,
}

impl Pages {
    pub fn render(title: &str) -> Self {
        let pages = PAGE_ROUTES
            .iter()
            .map(|(route, wasm_path)| (*route, Bytes::from(render_page(title, wasm_path))))
            .collect();

        Self { pages }
    }

    pub fn iter(&self) -> impl Iterator<Item = &(&'static str, Bytes)> {
        self.pages.iter()
    }
}

pub(crate) fn page_response(body: Bytes) -> HttpResponse {
    let mut response = HttpResponse::Ok();
    for header in PAGE_HEADERS {
        response.insert_header(header);
    }
    response.body(body)
}

fn render_page(title: &str, wasm_path: &str) -> String {
    PAGE_TEMPLATE
        .replace("{{title}}", &escape_html(title))
        .replace("{{wasm_path}}", &escape_html(wasm_path))
}

fn escape_html(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&#34;"),
            '\'' => escaped.push_str("&#39;"),
            c => escaped.push(c),
        }
    }
    escaped
}
