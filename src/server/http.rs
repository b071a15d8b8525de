use std::collections::HashMap;

use serde::Serialize;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;

use crate::error::{AppError, AppResult, ServerError};

const MAX_REQUEST_BYTES: usize = 64 * 1024;

pub(super) struct HttpRequest {
    pub(super) method: String,
    pub(super) path: String,
    pub(super) headers: HashMap<String, String>,
    pub(super) body: Vec<u8>,
}

#[derive(Debug)]
pub(super) struct RequestError {
    pub(super) status: u16,
    pub(super) message: String,
}

impl RequestError {
    pub(super) fn new(status: u16, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }
}

pub(super) async fn read_request(socket: &mut TcpStream) -> Result<HttpRequest, RequestError> {
    let mut buffer: Vec<u8> = Vec::with_capacity(1024);
    let mut chunk = [0u8; 1024];

    let head_end = loop {
        let bytes = socket
            .read(&mut chunk)
            .await
            .map_err(|err| RequestError::new(400, format!("failed to read request: {}", err)))?;
        if bytes == 0 {
            return Err(RequestError::new(400, "empty request"));
        }
        let read_slice = chunk
            .get(..bytes)
            .ok_or_else(|| RequestError::new(400, "invalid read length"))?;
        buffer.extend_from_slice(read_slice);
        if buffer.len() > MAX_REQUEST_BYTES {
            return Err(RequestError::new(413, "request too large"));
        }
        if let Some(pos) = buffer.windows(4).position(|window| window == b"\r\n\r\n") {
            break pos;
        }
    };

    let (method, path, headers) = parse_head(&buffer, head_end)?;

    let content_length = headers
        .get("content-length")
        .and_then(|value| value.parse::<usize>().ok())
        .unwrap_or(0);
    if content_length > MAX_REQUEST_BYTES {
        return Err(RequestError::new(413, "request body too large"));
    }
    let body_start = head_end
        .checked_add(4)
        .ok_or_else(|| RequestError::new(400, "malformed request head"))?;
    let mut body = buffer.get(body_start..).unwrap_or_default().to_vec();
    while body.len() < content_length {
        let bytes = socket
            .read(&mut chunk)
            .await
            .map_err(|err| RequestError::new(400, format!("failed to read body: {}", err)))?;
        if bytes == 0 {
            break;
        }
        let read_slice = chunk
            .get(..bytes)
            .ok_or_else(|| RequestError::new(400, "invalid read length"))?;
        body.extend_from_slice(read_slice);
    }
    body.truncate(content_length);

    Ok(HttpRequest {
        method,
        path,
        headers,
        body,
    })
}

fn parse_head(
    buffer: &[u8],
    head_end: usize,
) -> Result<(String, String, HashMap<String, String>), RequestError> {
    let head_bytes = buffer
        .get(..head_end)
        .ok_or_else(|| RequestError::new(400, "malformed request head"))?;
    let head = std::str::from_utf8(head_bytes)
        .map_err(|err| RequestError::new(400, format!("invalid request encoding: {}", err)))?;

    let mut lines = head.split("\r\n");
    let request_line = lines
        .next()
        .ok_or_else(|| RequestError::new(400, "missing request line"))?;
    let mut parts = request_line.split_whitespace();
    let method = parts
        .next()
        .ok_or_else(|| RequestError::new(400, "missing HTTP method"))?;
    let path = parts
        .next()
        .ok_or_else(|| RequestError::new(400, "missing request path"))?;

    let mut headers = HashMap::new();
    for line in lines {
        if line.is_empty() {
            continue;
        }
        let Some((key, value)) = line.split_once(':') else {
            return Err(RequestError::new(400, "malformed header"));
        };
        headers.insert(key.trim().to_ascii_lowercase(), value.trim().to_owned());
    }

    Ok((method.to_owned(), path.to_owned(), headers))
}

const fn status_text(status: u16) -> &'static str {
    match status {
        200 => "OK",
        400 => "Bad Request",
        401 => "Unauthorized",
        404 => "Not Found",
        413 => "Payload Too Large",
        500 => "Internal Server Error",
        _ => "OK",
    }
}

pub(super) async fn write_json<T>(socket: &mut TcpStream, status: u16, payload: &T) -> AppResult<()>
where
    T: Serialize + ?Sized,
{
    let body = serde_json::to_vec(payload).map_err(|err| {
        AppError::server(ServerError::Serialize {
            context: "control response",
            source: err,
        })
    })?;
    let head = format!(
        "HTTP/1.1 {} {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
        status,
        status_text(status),
        body.len()
    );
    socket.write_all(head.as_bytes()).await.map_err(|err| {
        AppError::server(ServerError::Io {
            context: "write control response head",
            source: err,
        })
    })?;
    socket.write_all(&body).await.map_err(|err| {
        AppError::server(ServerError::Io {
            context: "write control response body",
            source: err,
        })
    })?;
    Ok(())
}
