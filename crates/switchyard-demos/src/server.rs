//! HTTP/1 server adapter over hyper.

use std::convert::Infallible;
use std::sync::Arc;

use http_body_util::{BodyExt, Full};
use hyper::body::Bytes;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::{header, HeaderMap, Request as HyperRequest, Response as HyperResponse, StatusCode, Uri};
use hyper_util::rt::TokioIo;
use switchyard::{Method, Request, Response, Router};
use tokio::net::TcpListener;

/// Converts the parts of a hyper request; `None` for unsupported methods.
pub fn convert_request(
    method: &hyper::Method,
    uri: &Uri,
    headers: &HeaderMap,
    body: Vec<u8>,
) -> Option<Request> {
    let method = Method::parse(method.as_str())?;
    let mut request = Request::new(method, uri.path());
    if let Some(query) = uri.query() {
        request.query = Request::parse_query_string(query);
    }
    // Repeated headers fold into one value; cookies use their own separator.
    for key in headers.keys() {
        let separator = if *key == header::COOKIE { "; " } else { ", " };
        let values: Vec<&str> = headers
            .get_all(key)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .collect();
        if !values.is_empty() {
            request.headers.insert(key.to_string(), values.join(separator));
        }
    }
    request.body = body;
    Some(request)
}

pub fn convert_response(response: Response) -> HyperResponse<Full<Bytes>> {
    let status = StatusCode::from_u16(response.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    let mut builder = HyperResponse::builder().status(status);
    for (key, value) in &response.headers {
        builder = builder.header(key.as_str(), value.as_str());
    }
    builder
        .body(Full::new(Bytes::from(response.body)))
        .unwrap_or_else(|err| {
            tracing::error!(error = %err, "invalid response headers");
            let mut fallback = HyperResponse::new(Full::new(Bytes::from_static(b"Internal Server Error")));
            *fallback.status_mut() = StatusCode::INTERNAL_SERVER_ERROR;
            fallback
        })
}

async fn handle_request(
    req: HyperRequest<hyper::body::Incoming>,
    router: Arc<Router>,
) -> Result<HyperResponse<Full<Bytes>>, Infallible> {
    let (parts, body) = req.into_parts();
    let body = match body.collect().await {
        Ok(collected) => collected.to_bytes().to_vec(),
        Err(err) => {
            tracing::warn!(error = %err, "cannot read request body");
            return Ok(convert_response(Response::bad_request()));
        }
    };

    let Some(request) = convert_request(&parts.method, &parts.uri, &parts.headers, body) else {
        return Ok(convert_response(Response::method_not_allowed()));
    };
    Ok(convert_response(router.handle(request).await))
}

/// Accepts connections until Ctrl-C.
pub async fn serve(router: Arc<Router>, listener: TcpListener) -> std::io::Result<()> {
    loop {
        let (stream, peer) = tokio::select! {
            accepted = listener.accept() => accepted?,
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("shutting down");
                return Ok(());
            }
        };
        let io = TokioIo::new(stream);
        let router = Arc::clone(&router);

        tokio::task::spawn(async move {
            let service = service_fn(move |req| handle_request(req, Arc::clone(&router)));
            if let Err(err) = http1::Builder::new().serve_connection(io, service).await {
                tracing::warn!(%peer, error = %err, "error serving connection");
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_convert_request() {
        let uri: Uri = "/notes/1?verbose=true".parse().unwrap();
        let mut headers = HeaderMap::new();
        headers.insert("x-user-email", "ann@example.com".parse().unwrap());

        let request = convert_request(&hyper::Method::PUT, &uri, &headers, b"{}".to_vec()).unwrap();
        assert_eq!(request.method, Method::Put);
        assert_eq!(request.path, "/notes/1");
        assert_eq!(request.get_query("verbose"), Some("true"));
        assert_eq!(request.get_header("X-User-Email"), Some("ann@example.com"));
        assert_eq!(request.body, b"{}");
    }

    #[test]
    fn test_repeated_headers_are_joined() {
        let uri: Uri = "/guestbook".parse().unwrap();
        let mut headers = HeaderMap::new();
        headers.append(header::COOKIE, "theme=dark".parse().unwrap());
        headers.append(header::COOKIE, "session=abc".parse().unwrap());
        headers.append(header::ACCEPT, "text/html".parse().unwrap());
        headers.append(header::ACCEPT, "application/json".parse().unwrap());

        let request = convert_request(&hyper::Method::GET, &uri, &headers, Vec::new()).unwrap();
        assert_eq!(request.get_header("cookie"), Some("theme=dark; session=abc"));
        assert_eq!(request.get_header("accept"), Some("text/html, application/json"));
    }

    #[test]
    fn test_unsupported_method() {
        let uri: Uri = "/".parse().unwrap();
        assert!(convert_request(&hyper::Method::TRACE, &uri, &HeaderMap::new(), Vec::new()).is_none());
    }

    #[test]
    fn test_convert_response() {
        let res = convert_response(Response::text("hi").status(201));
        assert_eq!(res.status(), StatusCode::CREATED);
        assert_eq!(
            res.headers().get("content-type").and_then(|v| v.to_str().ok()),
            Some("text/plain; charset=utf-8")
        );
    }
}
