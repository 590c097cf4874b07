//! Index page and fallback routing.
//!
//! The browser front end is a single page. `GET /` and every unknown
//! non-API `GET` return `index.html` from the site root so client-side
//! routes survive a reload; unknown `/api` paths get a JSON 404.

use std::io;
use std::path::{Path, PathBuf};

use actix_web::http::{Method, header::ContentType};
use actix_web::{HttpRequest, HttpResponse, get, web};
use cap_std::{ambient_authority, fs::Dir};
use tracing::warn;

use super::ApiResult;
use crate::domain::Error;

const INDEX_FILE: &str = "index.html";

/// Directory holding the front-end assets.
#[derive(Debug, Clone)]
pub struct SiteRoot(PathBuf);

impl SiteRoot {
    /// Serve pages from `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self(root.into())
    }

    /// Directory path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.0
    }
}

fn read_index(root: &Path) -> io::Result<String> {
    let dir = Dir::open_ambient_dir(root, ambient_authority())?;
    dir.read_to_string(INDEX_FILE)
}

async fn index_page(site: &SiteRoot) -> ApiResult<HttpResponse> {
    let root = site.path().to_owned();
    let read = web::block(move || read_index(&root))
        .await
        .map_err(|err| Error::internal(format!("index read task failed: {err}")))?;
    match read {
        Ok(html) => Ok(HttpResponse::Ok()
            .content_type(ContentType::html())
            .body(html)),
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            warn!(root = %site.path().display(), "index page is missing");
            Err(Error::not_found("Page not found"))
        }
        Err(err) => Err(Error::internal(format!("failed to read index page: {err}"))),
    }
}

/// Front-end entry point.
#[get("/")]
pub async fn index(site: web::Data<SiteRoot>) -> ApiResult<HttpResponse> {
    index_page(&site).await
}

/// Default service: JSON 404 for API paths and non-GET methods, index page
/// otherwise.
pub async fn fallback(req: HttpRequest, site: web::Data<SiteRoot>) -> ApiResult<HttpResponse> {
    let path = req.path();
    let is_api = path == "/api" || path.starts_with("/api/");
    if is_api || req.method() != Method::GET {
        return Err(Error::not_found(format!("No route for {} {path}", req.method())));
    }
    index_page(&site).await
}
