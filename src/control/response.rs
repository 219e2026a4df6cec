// src/control/response.rs

use core::fmt::{self, Write};
use heapless::String;
use log::warn;

/// Largest body any handler renders.
pub const BODY_CAPACITY: usize = 512;

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Status {
    Ok,
    Found,
    NotFound,
    InternalServerError,
}

impl Status {
    pub const fn code(&self) -> u16 {
        match self {
            Status::Ok => 200,
            Status::Found => 302,
            Status::NotFound => 404,
            Status::InternalServerError => 500,
        }
    }

    pub const fn reason(&self) -> &'static str {
        match self {
            Status::Ok => "OK",
            Status::Found => "Found",
            Status::NotFound => "Not Found",
            Status::InternalServerError => "Internal Server Error",
        }
    }
}

/// Complete reply to one request. The connection is closed once it has
/// been written, so every response carries `Connection: close`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    pub status: Status,
    pub content_type: Option<&'static str>,
    pub location: Option<&'static str>,
    pub body: String<BODY_CAPACITY>,
}

impl Response {
    pub fn html(status: Status, body: fmt::Arguments<'_>) -> Self {
        Self::with_body(status, "text/html", body)
    }

    pub fn text(status: Status, body: fmt::Arguments<'_>) -> Self {
        Self::with_body(status, "text/plain", body)
    }

    pub fn redirect(location: &'static str) -> Self {
        Response {
            status: Status::Found,
            content_type: None,
            location: Some(location),
            body: String::new(),
        }
    }

    pub fn not_found() -> Self {
        Self::text(Status::NotFound, format_args!("Not found\r\n"))
    }

    /// Renders `body`; a body that does not fit becomes a bare 500.
    fn with_body(status: Status, content_type: &'static str, body: fmt::Arguments<'_>) -> Self {
        let mut rendered = String::new();
        if rendered.write_fmt(body).is_err() {
            warn!("Response body exceeds {} bytes", BODY_CAPACITY);
            return Response {
                status: Status::InternalServerError,
                content_type: None,
                location: None,
                body: String::new(),
            };
        }
        Response {
            status,
            content_type: Some(content_type),
            location: None,
            body: rendered,
        }
    }

    /// Serializes status line, headers and body.
    pub fn write_to<W: Write>(&self, out: &mut W) -> fmt::Result {
        write!(out, "HTTP/1.1 {} {}\r\n", self.status.code(), self.status.reason())?;
        if let Some(content_type) = self.content_type {
            write!(out, "Content-Type: {}\r\n", content_type)?;
        }
        if let Some(location) = self.location {
            write!(out, "Location: {}\r\n", location)?;
        }
        write!(out, "Content-Length: {}\r\n", self.body.len())?;
        out.write_str("Connection: close\r\n\r\n")?;
        out.write_str(&self.body)
    }
}
