//! The incremental RESP frame decoder: a resumable state machine that turns
//! a stream of client-to-server bytes into complete argument vectors,
//! tolerating arbitrary fragmentation across socket reads.
//!
//! Only the client-to-server grammar is accepted: an array of bulk strings.
//! Inline simple-string/error/integer frames are rejected, since real
//! clients never send them.

use bytes::{Bytes, BytesMut};
use memchr::memchr;
use thiserror::Error;
use tokio_util::codec::{Decoder, Encoder};

use crate::response::Response;

const ARRAY_PREFIX: u8 = b'*';
const BULK_PREFIX: u8 = b'$';

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FrameError {
    #[error("expected '*' at start of frame")]
    ExpectedArray,
    #[error("expected '$' before bulk string")]
    ExpectedBulkPrefix,
    #[error("malformed size: {0}")]
    BadSize(String),
    #[error("negative array or bulk size")]
    NegativeSize,
    #[error("missing CRLF terminator after bulk payload")]
    MissingTerminator,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Start,
    ReadingArraySize,
    ReadingBulkPrefix,
    ReadingBulkSize,
    ReadingBulkData,
}

/// One argument vector's worth of parsing state, reusable across frames via
/// [`reset`](RespDecoder::reset).
#[derive(Debug)]
pub struct RespDecoder {
    state: State,
    expected_args: usize,
    current_len: usize,
    args: Vec<Bytes>,
}

impl Default for RespDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl RespDecoder {
    pub fn new() -> Self {
        RespDecoder {
            state: State::Start,
            expected_args: 0,
            current_len: 0,
            args: Vec::new(),
        }
    }

    /// Returns the parser to `Start` and clears accumulated args, for reuse
    /// on the next frame of the same connection.
    pub fn reset(&mut self) {
        self.state = State::Start;
        self.expected_args = 0;
        self.current_len = 0;
        self.args.clear();
    }

    /// Runs the state machine forward over `buf`, consuming bytes greedily.
    /// Returns `Ok(Some(args))` on a complete frame, `Ok(None)` if more bytes
    /// are needed, or `Err` on a grammar violation.
    fn step(&mut self, buf: &mut BytesMut) -> Result<Option<Vec<Bytes>>, FrameError> {
        loop {
            match self.state {
                State::Start => {
                    if buf.is_empty() {
                        return Ok(None);
                    }
                    if buf[0] != ARRAY_PREFIX {
                        return Err(FrameError::ExpectedArray);
                    }
                    let _ = buf.split_to(1);
                    self.state = State::ReadingArraySize;
                }
                State::ReadingArraySize => {
                    let Some(n) = read_decimal(buf)? else {
                        return Ok(None);
                    };
                    self.expected_args = n;
                    self.args.reserve(n);
                    self.state = State::ReadingBulkPrefix;
                }
                State::ReadingBulkPrefix => {
                    if self.args.len() == self.expected_args {
                        let args = std::mem::take(&mut self.args);
                        self.reset();
                        return Ok(Some(args));
                    }
                    if buf.is_empty() {
                        return Ok(None);
                    }
                    if buf[0] != BULK_PREFIX {
                        return Err(FrameError::ExpectedBulkPrefix);
                    }
                    let _ = buf.split_to(1);
                    self.state = State::ReadingBulkSize;
                }
                State::ReadingBulkSize => {
                    let Some(n) = read_decimal(buf)? else {
                        return Ok(None);
                    };
                    self.current_len = n;
                    self.state = State::ReadingBulkData;
                }
                State::ReadingBulkData => {
                    let needed = self.current_len + 2;
                    if buf.len() < needed {
                        return Ok(None);
                    }
                    if &buf[self.current_len..needed] != b"\r\n" {
                        return Err(FrameError::MissingTerminator);
                    }
                    let payload = buf.split_to(self.current_len).freeze();
                    let _ = buf.split_to(2);
                    self.args.push(payload);
                    self.state = State::ReadingBulkPrefix;
                    if self.args.len() == self.expected_args {
                        let args = std::mem::take(&mut self.args);
                        self.reset();
                        return Ok(Some(args));
                    }
                }
            }
        }
    }
}

/// Reads an ASCII decimal integer up to the next CRLF, advancing `buf` past
/// it. Returns `Ok(None)` if no CRLF is present yet (need more bytes).
fn read_decimal(buf: &mut BytesMut) -> Result<Option<usize>, FrameError> {
    let Some(eol) = memchr(b'\r', buf) else {
        return Ok(None);
    };
    if eol + 1 >= buf.len() {
        return Ok(None);
    }
    if buf[eol + 1] != b'\n' {
        return Err(FrameError::BadSize("CR not followed by LF".into()));
    }
    let digits = &buf[..eol];
    let text = std::str::from_utf8(digits)
        .map_err(|_| FrameError::BadSize("non-UTF8 size field".into()))?;
    if !matches!(digits.first(), Some(b'0'..=b'9')) {
        return Err(FrameError::BadSize(text.to_string()));
    }
    let value: i64 = text
        .parse()
        .map_err(|_| FrameError::BadSize(text.to_string()))?;
    if value < 0 {
        return Err(FrameError::NegativeSize);
    }
    let _ = buf.split_to(eol + 2);
    Ok(Some(value as usize))
}

/// `tokio_util` wiring: decodes argument vectors, encodes [`Response`]s.
/// Combines the frame decoder with the wire encoder so the session loop can
/// drive both sides of a connection through a single `Framed` transport.
#[derive(Debug, Default)]
pub struct RespCodec {
    decoder: RespDecoder,
}

impl Decoder for RespCodec {
    type Item = Vec<Bytes>;
    type Error = FrameError;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        self.decoder.step(src)
    }
}

impl Encoder<Response> for RespCodec {
    type Error = std::io::Error;

    fn encode(&mut self, item: Response, dst: &mut BytesMut) -> Result<(), Self::Error> {
        for buf in item.to_buffers() {
            dst.extend_from_slice(&buf);
        }
        Ok(())
    }
}
