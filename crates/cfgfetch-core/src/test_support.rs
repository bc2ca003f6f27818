//! In-memory transport for unit tests.

use std::collections::HashMap;
use std::io::Write;
use std::sync::Mutex;

use crate::error::GetError;
use crate::transport::{Request, Response, Transport};

#[derive(Debug, Clone)]
pub(crate) struct Route {
    pub status: u32,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

/// A request as the transport saw it.
#[derive(Debug, Clone)]
pub(crate) struct Seen {
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub netrc: bool,
}

/// Serves canned responses keyed by URL path; unknown paths get 404.
#[derive(Default)]
pub(crate) struct MockTransport {
    routes: HashMap<String, Route>,
    seen: Mutex<Vec<Seen>>,
}

impl MockTransport {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn ok(self, path: &str, body: &str) -> Self {
        self.route(path, 200, &[], body.as_bytes())
    }

    pub(crate) fn route(
        mut self,
        path: &str,
        status: u32,
        headers: &[(&str, &str)],
        body: &[u8],
    ) -> Self {
        self.routes.insert(
            path.to_string(),
            Route {
                status,
                headers: headers
                    .iter()
                    .map(|(k, v)| (k.to_string(), v.to_string()))
                    .collect(),
                body: body.to_vec(),
            },
        );
        self
    }

    pub(crate) fn seen(&self) -> Vec<Seen> {
        self.seen.lock().unwrap().clone()
    }
}

impl Transport for MockTransport {
    fn execute(&self, req: &Request<'_>, body: &mut dyn Write) -> Result<Response, GetError> {
        self.seen.lock().unwrap().push(Seen {
            url: req.url.to_string(),
            headers: req.headers.clone(),
            netrc: req.netrc,
        });
        if req.cancel.is_some_and(|c| c.is_cancelled()) {
            return Err(GetError::Cancelled);
        }
        let route = self.routes.get(req.url.path()).cloned().unwrap_or(Route {
            status: 404,
            headers: Vec::new(),
            body: b"not found".to_vec(),
        });
        let body_complete = body.write_all(&route.body).is_ok();
        Ok(Response {
            status: route.status,
            headers: route.headers,
            body_complete,
        })
    }
}
