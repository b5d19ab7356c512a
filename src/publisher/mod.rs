//! HTTP publisher for library files.
//!
//! URLs have the shape `/<library>/[:hash:<token>/]<relpath>`. The hash
//! segment is never checked against anything: its presence alone marks the
//! URL as content-addressed, and only then are far-future cache headers
//! sent.

mod path;

use crate::error::ConfigResult;
use crate::http::{Handler, HttpRequest, HttpResponse, Method};
use crate::library::Library;
use crate::registry::Registry;
use crate::utils::date::http_date;
use crate::utils::mime;
use std::fs;
use std::sync::Arc;
use std::time::{Duration, SystemTime};

/// Segment prefix marking a content-addressed URL.
pub const HASH_MARKER: &str = ":hash:";

/// Cache lifetime for hashed URLs, in seconds (one year).
pub const FOREVER: u64 = 31_536_000;

#[derive(Debug)]
pub struct Publisher {
    libraries: Registry<Library>,
}

impl Publisher {
    pub fn new<I>(libraries: I) -> ConfigResult<Self>
    where
        I: IntoIterator<Item = Arc<Library>>,
    {
        let mut registry = Registry::new("library");
        for library in libraries {
            registry.add(library)?;
        }
        Ok(Self {
            libraries: registry,
        })
    }

    pub fn libraries(&self) -> &Registry<Library> {
        &self.libraries
    }

    fn serve(&self, request: &HttpRequest) -> HttpResponse {
        let Some(segments) = path::segments(request.path()) else {
            return not_found();
        };
        let [name, rest @ ..] = segments.as_slice() else {
            return forbidden();
        };
        if rest.is_empty() {
            return forbidden();
        }

        let Some(library) = self.libraries.lookup(name) else {
            return not_found();
        };

        let (hashed, rest) = match rest {
            [first, tail @ ..] if first.starts_with(HASH_MARKER) => (true, tail),
            _ => (false, rest),
        };

        let Some(file) = path::resolve_file(library.root(), rest) else {
            return not_found();
        };
        let Ok(body) = fs::read(&file) else {
            return not_found();
        };

        let mut response = HttpResponse::new(200)
            .with_header("Content-Type", mime::from_path(&file))
            .with_header("Content-Length", body.len().to_string());
        if hashed {
            let expires = SystemTime::now() + Duration::from_secs(FOREVER);
            response = response
                .with_header("Cache-Control", format!("max-age={FOREVER}"))
                .with_header("Expires", http_date(expires));
        }

        if request.method() == Method::Head {
            response
        } else {
            response.with_body(body)
        }
    }
}

impl Handler for Publisher {
    fn handle(&self, request: &HttpRequest) -> HttpResponse {
        match request.method() {
            Method::Get | Method::Head => self.serve(request),
            Method::Other => HttpResponse::plain(405, "Method Not Allowed")
                .with_header("Allow", "GET, HEAD"),
        }
    }
}

fn forbidden() -> HttpResponse {
    HttpResponse::plain(403, "Forbidden")
}

fn not_found() -> HttpResponse {
    HttpResponse::plain(404, "Not Found")
}
