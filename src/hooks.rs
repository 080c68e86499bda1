//! Extension points around each request.

use crate::client::{Request, Response};
use url::Url;

/// Strategy invoked by [`HypixelClient`](crate::HypixelClient) around every request.
///
/// Both methods default to doing nothing.
///
/// # Example
///
/// ```
/// use hypixel_client::{Request, RequestHooks, Response};
/// use url::Url;
///
/// struct Offline;
///
/// impl RequestHooks for Offline {
///     fn before_request(&self, _request: &Request, url: &Url) -> Option<Response> {
///         Some(Response::new(url.as_str(), 503, Vec::new()))
///     }
/// }
/// ```
pub trait RequestHooks: Send + Sync {
    /// Called before the rate gate and the network.
    ///
    /// Returning a response short-circuits the request (a cache, a test double).
    fn before_request(&self, _request: &Request, _url: &Url) -> Option<Response> {
        None
    }

    /// Called with each response that came back from the network.
    fn after_response(&self, _request: &Request, response: Response) -> Response {
        response
    }
}
