//! The two request accessors the router consumes.

use http::request::Parts;
use http::{Method, Request};

/// Anything that can report an HTTP method and a path.
#[cfg_attr(test, mockall::automock)]
pub trait RouteRequest {
    fn method(&self) -> &Method;

    fn path(&self) -> &str;
}

impl<B> RouteRequest for Request<B> {
    fn method(&self) -> &Method {
        Request::method(self)
    }

    fn path(&self) -> &str {
        self.uri().path()
    }
}

impl RouteRequest for Parts {
    fn method(&self) -> &Method {
        &self.method
    }

    fn path(&self) -> &str {
        self.uri.path()
    }
}

impl<S: AsRef<str>> RouteRequest for (Method, S) {
    fn method(&self) -> &Method {
        &self.0
    }

    fn path(&self) -> &str {
        self.1.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_request() {
        let request = Request::builder().method(Method::POST).uri("/users/42?page=2").body(()).unwrap();
        assert_eq!(RouteRequest::method(&request), &Method::POST);
        assert_eq!(RouteRequest::path(&request), "/users/42");

        let (parts, ()) = request.into_parts();
        assert_eq!(RouteRequest::method(&parts), &Method::POST);
        assert_eq!(RouteRequest::path(&parts), "/users/42");
    }

    #[test]
    fn test_tuple() {
        let request = (Method::GET, "/about");
        assert_eq!(request.method(), &Method::GET);
        assert_eq!(request.path(), "/about");
    }
}
