//! Blocking HTTP server around a [`Handler`].
//!
//! Requests are dispatched on a small thread pool so a slow file read
//! never stalls the accept loop. Ctrl+C unblocks the server and ends
//! [`BoundServer::run`].

mod lifecycle;
mod response;

pub use lifecycle::{is_shutdown, setup_shutdown_handler};

use crate::http::Handler;
use crate::log;
use anyhow::{Context, Result};
use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;
use tiny_http::Server;

/// Worker threads serving requests.
const WORKERS: usize = 4;

/// Bound server ready to accept requests
pub struct BoundServer {
    server: Arc<Server>,
    addr: SocketAddr,
    handler: Arc<dyn Handler>,
}

/// Bind `handler` to `interface:port`, trying the next ports when taken.
pub fn bind<H: Handler + 'static>(interface: IpAddr, port: u16, handler: H) -> Result<BoundServer> {
    let (server, addr) = lifecycle::bind_with_retry(interface, port)?;
    let server = Arc::new(server);
    lifecycle::register_server(Arc::clone(&server));

    log!("serve"; "http://{}", addr);

    Ok(BoundServer {
        server,
        addr,
        handler: Arc::new(handler),
    })
}

impl BoundServer {
    /// Get the bound address.
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Handle for stopping the server from another thread.
    pub fn server(&self) -> Arc<Server> {
        Arc::clone(&self.server)
    }

    /// Start the request loop (blocking).
    pub fn run(self) -> Result<()> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(WORKERS)
            .build()
            .context("failed to create thread pool")?;

        for request in self.server.incoming_requests() {
            let handler = Arc::clone(&self.handler);
            pool.spawn(move || {
                if let Err(e) = response::respond(request, handler.as_ref()) {
                    log!("serve"; "request error: {e}");
                }
            });
        }
        Ok(())
    }
}
