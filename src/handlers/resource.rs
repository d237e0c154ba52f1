use tracing::{debug, warn};

use crate::backend::resolver::ResourceResolver;
use crate::http::mime::content_type_for;
use crate::http::response::Response;

/// Maps a GET target onto a resource name.
///
/// Only `/` and `/index.html` (any case) are served; both name the index.
pub fn resource_name<'a>(target: &str, index: &'a str) -> Option<&'a str> {
    if target == "/" || target.eq_ignore_ascii_case("/index.html") {
        Some(index)
    } else {
        None
    }
}

/// Answers a GET for `target`.
pub async fn respond<R>(resolver: &R, target: &str, index: &str) -> Response
where
    R: ResourceResolver,
{
    let Some(name) = resource_name(target, index) else {
        debug!(path = target, "No resource for target");
        return Response::not_found();
    };

    match resolver.resolve(name).await {
        Ok(Some(resource)) => {
            let content_type = content_type_for(&resource.name);
            Response::stream(content_type, resource.body)
        }
        Ok(None) => {
            debug!(resource = name, "Resource missing");
            Response::not_found()
        }
        Err(e) => {
            warn!(resource = name, error = %e, "Failed to open resource");
            Response::not_found()
        }
    }
}
