//! HTTP status endpoint.
//!
//! | Method | Path  | Response                                   |
//! |--------|-------|--------------------------------------------|
//! | GET    | `/`   | 200 `application/json` snapshot            |
//! | other  | other | 404 `text/plain` `Not found`               |
//!
//! [`route`] is the transport-independent part and is what the tests
//! exercise.  On ESP-IDF, [`StatusServer::start`] binds it to an
//! `EspHttpServer` with a wildcard URI handler per method.

use log::warn;

use crate::app::ports::SnapshotProvider;

pub const CONTENT_TYPE_JSON: &str = "application/json";
pub const CONTENT_TYPE_TEXT: &str = "text/plain";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub content_type: &'static str,
    pub body: String,
}

impl HttpResponse {
    fn not_found() -> Self {
        Self {
            status: 404,
            content_type: CONTENT_TYPE_TEXT,
            body: "Not found".into(),
        }
    }
}

/// Resolve one request.  The query string is ignored.
pub fn route(provider: &impl SnapshotProvider, method: &str, uri: &str) -> HttpResponse {
    let path = uri.split('?').next().unwrap_or(uri);
    if method != "GET" || path != "/" {
        return HttpResponse::not_found();
    }

    match provider.snapshot().to_json() {
        Ok(body) => HttpResponse {
            status: 200,
            content_type: CONTENT_TYPE_JSON,
            body,
        },
        Err(e) => {
            warn!("http: snapshot serialization failed: {}", e);
            HttpResponse {
                status: 500,
                content_type: CONTENT_TYPE_TEXT,
                body: "Internal error".into(),
            }
        }
    }
}

#[cfg(target_os = "espidf")]
pub use server::StatusServer;

#[cfg(target_os = "espidf")]
mod server {
    use std::sync::Arc;

    use esp_idf_svc::http::Method;
    use esp_idf_svc::http::server::{Configuration, EspHttpServer};
    use esp_idf_svc::io::Write;
    use log::info;

    use super::route;
    use crate::app::ports::SnapshotProvider;
    use crate::error::CommsError;

    const METHODS: [(Method, &str); 6] = [
        (Method::Get, "GET"),
        (Method::Post, "POST"),
        (Method::Put, "PUT"),
        (Method::Delete, "DELETE"),
        (Method::Patch, "PATCH"),
        (Method::Head, "HEAD"),
    ];

    /// Running server.  Dropping it stops the httpd task.
    pub struct StatusServer {
        _server: EspHttpServer<'static>,
    }

    impl StatusServer {
        pub fn start<P>(provider: P, port: u16) -> Result<Self, CommsError>
        where
            P: SnapshotProvider + Send + Sync + 'static,
        {
            let config = Configuration {
                http_port: port,
                uri_match_wildcard: true,
                ..Default::default()
            };
            let mut server =
                EspHttpServer::new(&config).map_err(|_| CommsError::HttpServerFailed)?;

            let provider = Arc::new(provider);
            for (method, name) in METHODS {
                let provider = Arc::clone(&provider);
                server
                    .fn_handler("/*", method, move |req| {
                        let resp = route(provider.as_ref(), name, req.uri());
                        let mut out = req.into_response(
                            resp.status,
                            None,
                            &[("Content-Type", resp.content_type)],
                        )?;
                        out.write_all(resp.body.as_bytes())?;
                        Ok::<(), esp_idf_svc::io::EspIOError>(())
                    })
                    .map_err(|_| CommsError::HttpServerFailed)?;
            }

            info!("http: status endpoint listening on port {}", port);
            Ok(Self { _server: server })
        }
    }
}
