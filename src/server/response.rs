//! Conversion between `tiny_http` and the crate's request/response types.

use crate::http::{Handler, HttpRequest, HttpResponse, Method};
use anyhow::Result;
use std::io::Cursor;
use tiny_http::{Header, Request, Response, StatusCode};

/// Dispatch a `tiny_http` request through `handler` and send the reply.
pub fn respond(request: Request, handler: &dyn Handler) -> Result<()> {
    let incoming = to_request(&request);
    let response = if super::lifecycle::is_shutdown() {
        HttpResponse::plain(503, "503 Service Unavailable")
    } else {
        handler.handle(&incoming)
    };
    request.respond(to_response(response))?;
    Ok(())
}

fn to_request(request: &Request) -> HttpRequest {
    HttpRequest::new(Method::from_name(request.method().as_str()), request.url())
}

/// Build the wire response. Headers `tiny_http` rejects are dropped.
///
/// An explicit `Content-Length` overrides the body length, so HEAD replies
/// advertise the size of the body they omit.
fn to_response(response: HttpResponse) -> Response<Cursor<Vec<u8>>> {
    let (status, headers, body) = response.into_parts();
    let mut wire = Response::from_data(body).with_status_code(StatusCode(status));
    for (name, value) in headers {
        if let Ok(header) = Header::from_bytes(name.as_bytes(), value.as_bytes()) {
            wire.add_header(header);
        }
    }
    wire
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_response_status_and_headers() {
        let response = HttpResponse::plain(404, "Not Found").with_header("Cache-Control", "no-cache");
        let wire = to_response(response);

        assert_eq!(wire.status_code(), StatusCode(404));
        let names: Vec<_> = wire
            .headers()
            .iter()
            .map(|h| h.field.as_str().as_str().to_ascii_lowercase())
            .collect();
        assert!(names.contains(&"cache-control".to_owned()));
        assert!(names.contains(&"content-type".to_owned()));
    }

    #[test]
    fn test_to_response_drops_invalid_header() {
        let response = HttpResponse::new(200)
            .with_header("X-Caf\u{e9}", "x")
            .with_header("X-Ok", "y");
        let wire = to_response(response);
        assert_eq!(wire.headers().len(), 1);
    }
}
