//! `serve` command: publish the declared libraries over HTTP.

use anyhow::Result;
use vitrine::config::{AssetsConfig, Declared};
use vitrine::{Delegator, HttpRequest, HttpResponse, log, server};

/// Mount the publisher under the configured prefix and serve until Ctrl+C.
pub fn serve(config: &AssetsConfig, declared: &Declared) -> Result<()> {
    let publisher = declared.publisher()?;
    let libraries = publisher.libraries().len();
    let delegator = Delegator::new(publisher, not_found).with_prefix(&config.serve.prefix);
    log!("serve"; "{} libraries under {}/", libraries, delegator.prefix());

    let bound = server::bind(config.serve.interface, config.serve.port, delegator)?;
    bound.run()
}

/// Everything outside the prefix.
fn not_found(_: &HttpRequest) -> HttpResponse {
    HttpResponse::plain(404, "404 Not Found")
}
