//! Response body module
//!
//! One boxed body type for every response: small in-memory bodies and streamed files.

use futures_util::TryStreamExt;
use http_body_util::combinators::UnsyncBoxBody;
use http_body_util::{BodyExt, Empty, Full, StreamBody};
use hyper::body::{Bytes, Frame};
use std::io;
use tokio::io::AsyncRead;
use tokio_util::io::ReaderStream;

/// Read buffer size for streamed files (64 KiB)
pub const DEFAULT_CAPACITY: usize = 65536;

pub type ResponseBody = UnsyncBoxBody<Bytes, io::Error>;

/// In-memory body
pub fn full(data: impl Into<Bytes>) -> ResponseBody {
    Full::new(data.into())
        .map_err(|never| match never {})
        .boxed_unsync()
}

pub fn empty() -> ResponseBody {
    Empty::<Bytes>::new()
        .map_err(|never| match never {})
        .boxed_unsync()
}

/// Stream `reader` chunk by chunk without buffering it whole
pub fn stream<R>(reader: R) -> ResponseBody
where
    R: AsyncRead + Send + 'static,
{
    let frames = ReaderStream::with_capacity(reader, DEFAULT_CAPACITY).map_ok(Frame::data);
    StreamBody::new(frames).boxed_unsync()
}
