//! API clients
//!
//! [`ApiClient`] is the layer between the resource clients and the
//! [`RequestExecutor`]: it runs the request and then reduces the body with
//! the caller's [`TokenEfficiencyOptions`]. The resource clients shape
//! requests for one kind of object each and validate ids before anything
//! goes on the wire.

mod api;
mod automations;
mod connectors;
mod pipelines;
mod projects;

pub use api::{ApiClient, CallOptions};
pub use automations::AutomationsClient;
pub use connectors::ConnectorsClient;
pub use pipelines::PipelinesClient;
pub use projects::{Project, ProjectsClient, PROJECTS_CACHE_KEY};

use crate::error::{Error, Result};
use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};

/// Characters escaped when an id is placed in a single path segment
const PATH_SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'[')
    .add(b'\\')
    .add(b']')
    .add(b'^')
    .add(b'`')
    .add(b'{')
    .add(b'|')
    .add(b'}');

/// Reject blank ids and escape the rest as one path segment
pub(crate) fn require_id(kind: &str, id: &str) -> Result<String> {
    let id = id.trim();
    if id.is_empty() {
        return Err(Error::validation(format!("a {kind} id is required")));
    }
    Ok(utf8_percent_encode(id, PATH_SEGMENT).to_string())
}

#[cfg(test)]
mod tests;
