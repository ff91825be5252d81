//! Response type returned by handlers and middleware.

use std::collections::HashMap;

/// What the pipeline hands back to the host server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    pub status: u16,
    /// Header names are unique ignoring case; see [`Response::header`].
    pub headers: HashMap<String, String>,
    pub body: Vec<u8>,
}

impl Response {
    /// An empty response with `status`.
    pub fn new(status: u16) -> Self {
        Self {
            status,
            headers: HashMap::default(),
            body: Vec::default(),
        }
    }

    fn typed(status: u16, content_type: &str, body: Vec<u8>) -> Self {
        Self::new(status)
            .header("Content-Type", content_type)
            .body(body)
    }

    pub fn ok() -> Self {
        Self::new(200)
    }

    pub fn html(body: impl Into<String>) -> Self {
        Self::typed(200, "text/html; charset=utf-8", body.into().into_bytes())
    }

    pub fn text(body: impl Into<String>) -> Self {
        Self::typed(200, "text/plain; charset=utf-8", body.into().into_bytes())
    }

    /// A 200 JSON response, or a bare 500 if `data` cannot be encoded.
    pub fn json<T: serde::Serialize + ?Sized>(data: &T) -> Self {
        serde_json::to_vec(data).map_or_else(
            |_| Self::internal_server_error(),
            |body| Self::typed(200, "application/json", body),
        )
    }

    /// A 302 to `location`.
    pub fn redirect(location: impl Into<String>) -> Self {
        Self::new(302).header("Location", location)
    }

    /// `status` with its reason phrase as the body.
    fn plain_status(status: u16) -> Self {
        Self::new(status).body(status_reason(status))
    }

    pub fn bad_request() -> Self {
        Self::plain_status(400)
    }

    pub fn unauthorized() -> Self {
        Self::plain_status(401)
    }

    pub fn not_found() -> Self {
        Self::plain_status(404)
    }

    pub fn method_not_allowed() -> Self {
        Self::plain_status(405)
    }

    pub fn internal_server_error() -> Self {
        Self::plain_status(500)
    }

    /// Sets a header, replacing any existing one whose name differs only
    /// in case.
    #[must_use]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        let name = name.into();
        self.headers.retain(|n, _| !n.eq_ignore_ascii_case(&name));
        self.headers.insert(name, value.into());
        self
    }

    #[must_use]
    pub fn status(mut self, status: u16) -> Self {
        self.status = status;
        self
    }

    #[must_use]
    pub fn body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = body.into();
        self
    }

    /// Header value by name, ignoring case.
    pub fn get_header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find_map(|(n, v)| n.eq_ignore_ascii_case(name).then_some(v.as_str()))
    }

    /// The body as UTF-8, if it is valid UTF-8.
    pub fn body_string(&self) -> Option<String> {
        std::str::from_utf8(&self.body).ok().map(str::to_string)
    }

    pub fn body_json<T: serde::de::DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_slice(&self.body)
    }

    /// Reason phrase of the status code, `"Unknown"` for unlisted codes.
    pub fn status_text(&self) -> &'static str {
        status_reason(self.status)
    }
}

fn status_reason(status: u16) -> &'static str {
    match status {
        200 => "OK",
        201 => "Created",
        204 => "No Content",
        302 => "Found",
        400 => "Bad Request",
        401 => "Unauthorized",
        403 => "Forbidden",
        404 => "Not Found",
        405 => "Method Not Allowed",
        500 => "Internal Server Error",
        503 => "Service Unavailable",
        _ => "Unknown",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_replaces_ignoring_case() {
        let res = Response::html("<p>hi</p>").header("content-type", "text/plain");
        assert_eq!(res.headers.len(), 1);
        assert_eq!(res.get_header("Content-Type"), Some("text/plain"));
        assert_eq!(res.body_string().as_deref(), Some("<p>hi</p>"));
    }

    #[test]
    fn test_response_json() {
        let res = Response::json(&serde_json::json!({"Message": "Created!"})).status(201);
        assert_eq!(res.status, 201);
        assert_eq!(res.get_header("Content-Type"), Some("application/json"));
        let value: serde_json::Value = res.body_json().unwrap();
        assert_eq!(value["Message"], "Created!");
    }

    #[test]
    fn test_redirect_sets_location() {
        let res = Response::redirect("/Note/4");
        assert_eq!(res.status, 302);
        assert_eq!(res.get_header("location"), Some("/Note/4"));
        assert!(res.body.is_empty());
    }

    #[test]
    fn test_status_helpers_carry_reason() {
        let res = Response::not_found();
        assert_eq!(res.status_text(), "Not Found");
        assert_eq!(res.body_string().as_deref(), Some("Not Found"));
    }
}
