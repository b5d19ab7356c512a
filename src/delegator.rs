//! Mount a [`Publisher`] under a path prefix in front of an application.

use crate::http::{Handler, HttpRequest, HttpResponse};
use crate::publisher::Publisher;

pub const DEFAULT_PREFIX: &str = "/vitrine";

/// Routes `<prefix>/...` to the publisher and everything else to `app`.
pub struct Delegator<A> {
    prefix: String,
    publisher: Publisher,
    app: A,
}

impl<A: Handler> Delegator<A> {
    pub fn new(publisher: Publisher, app: A) -> Self {
        Self {
            prefix: DEFAULT_PREFIX.to_owned(),
            publisher,
            app,
        }
    }

    /// Leading slash added, trailing slashes dropped.
    pub fn with_prefix(mut self, prefix: &str) -> Self {
        self.prefix = normalize_prefix(prefix);
        self
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn publisher(&self) -> &Publisher {
        &self.publisher
    }

    /// Remainder of `url` after the prefix, if the prefix matches on a
    /// segment boundary.
    fn strip<'u>(&self, url: &'u str) -> Option<&'u str> {
        let rest = url.strip_prefix(self.prefix.as_str())?;
        (rest.is_empty() || rest.starts_with(['/', '?'])).then_some(rest)
    }
}

impl<A: Handler> Handler for Delegator<A> {
    fn handle(&self, request: &HttpRequest) -> HttpResponse {
        match self.strip(request.url()) {
            Some(rest) => self.publisher.handle(&request.with_url(rest)),
            None => self.app.handle(request),
        }
    }
}

fn normalize_prefix(prefix: &str) -> String {
    let trimmed = prefix.trim_matches('/');
    if trimmed.is_empty() {
        String::new()
    } else {
        format!("/{trimmed}")
    }
}
