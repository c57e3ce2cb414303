//! Response encoding: turning an invocation outcome into exactly one
//! response.

use crate::error::BindError;
use crate::outcome::{Outcome, Rendered};
use crate::response::{Response, ResponseWriter};
use http::{header, StatusCode};

/// Answers a binding fault before the handler was ever invoked.
pub(crate) fn respond_bind_error(w: &mut dyn ResponseWriter, err: &BindError) {
    w.set_status(err.status());
    w.insert_header(header::CONTENT_TYPE.as_str(), mime::TEXT_PLAIN_UTF_8.as_ref());
    write_all(w, err.to_string().as_bytes());
}

/// Writes the invocation outcome.
///
/// Handler errors and marshal faults suppress both the payload and any
/// response side effects the handler buffered; otherwise the buffered parts
/// are flushed first and the payload (if the plan expects one) follows.
pub(crate) fn respond(
    w: &mut dyn ResponseWriter,
    buffered: Response,
    outcome: Outcome,
    has_payload: bool,
) {
    let rendered = match outcome {
        Outcome::Failure(message) => {
            server_fault(w, &message);
            return;
        }
        Outcome::Success(rendered) => rendered,
    };

    if let Rendered::Json(Err(err)) = &rendered {
        server_fault(w, &err.to_string());
        return;
    }

    flush(w, buffered);
    if !has_payload {
        return;
    }

    match rendered {
        Rendered::Empty | Rendered::Json(Err(_)) => {}
        Rendered::Text(text) => {
            w.insert_header(
                header::CONTENT_TYPE.as_str(),
                mime::TEXT_PLAIN_UTF_8.as_ref(),
            );
            write_all(w, text.as_bytes());
        }
        Rendered::Json(Ok(bytes)) => {
            w.insert_header(
                header::CONTENT_TYPE.as_str(),
                mime::APPLICATION_JSON.as_ref(),
            );
            write_all(w, &bytes);
        }
    }
}

fn server_fault(w: &mut dyn ResponseWriter, message: &str) {
    w.set_status(StatusCode::INTERNAL_SERVER_ERROR);
    w.insert_header(header::CONTENT_TYPE.as_str(), mime::TEXT_PLAIN_UTF_8.as_ref());
    write_all(w, message.as_bytes());
}

/// Replays the handler's buffered response side effects onto the host
/// writer: status first, then headers, then any directly-written body.
fn flush(w: &mut dyn ResponseWriter, buffered: Response) {
    w.set_status(buffered.status());
    for (name, value) in buffered.headers() {
        if let Ok(value) = value.to_str() {
            w.insert_header(name.as_str(), value);
        }
    }
    if !buffered.body().is_empty() {
        write_all(w, buffered.body());
    }
}

/// Drains `buf` through the writer, tolerating partial writes.
///
/// A transport error or a zero-length acceptance stops the loop; the
/// response is already in flight at that point, so the failure is logged
/// rather than surfaced.
fn write_all(w: &mut dyn ResponseWriter, mut buf: &[u8]) {
    while !buf.is_empty() {
        match w.write(buf) {
            Ok(0) => {
                tracing::debug!(remaining = buf.len(), "writer accepted no bytes, giving up");
                break;
            }
            Ok(n) => buf = &buf[n.min(buf.len())..],
            Err(err) => {
                tracing::debug!(%err, "response write failed");
                break;
            }
        }
    }
}
