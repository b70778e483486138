//! The server-to-client half of the protocol: response values and their
//! encoding into RESP wire buffers.

use bytes::{Bytes, BytesMut};

/// One reply to a command, in the shapes RESP permits from a server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Response {
    SimpleString(Bytes),
    Error(String),
    Integer(i64),
    /// A single bulk string, or the null bulk string if `None`.
    Bulk(Option<Bytes>),
    /// An array of bulk strings, each independently nullable (as `MGET`
    /// needs for missing keys).
    Array(Vec<Option<Bytes>>),
}

impl Response {
    pub fn ok() -> Response {
        Response::SimpleString(Bytes::from_static(b"OK"))
    }

    pub fn simple_string(value: impl Into<Bytes>) -> Response {
        Response::SimpleString(value.into())
    }

    pub fn error(message: impl Into<String>) -> Response {
        Response::Error(message.into())
    }

    pub fn bulk(value: impl Into<Bytes>) -> Response {
        Response::Bulk(Some(value.into()))
    }

    pub fn null_bulk() -> Response {
        Response::Bulk(None)
    }

    /// Renders this response as the scatter/gather list of buffers to write
    /// to the socket, in order.
    pub fn to_buffers(&self) -> Vec<Bytes> {
        let mut out = Vec::new();
        encode_into(self, &mut out);
        out
    }
}

fn encode_into(resp: &Response, out: &mut Vec<Bytes>) {
    match resp {
        Response::SimpleString(s) => {
            let mut buf = BytesMut::with_capacity(s.len() + 3);
            buf.extend_from_slice(b"+");
            buf.extend_from_slice(s);
            buf.extend_from_slice(b"\r\n");
            out.push(buf.freeze());
        }
        Response::Error(msg) => {
            out.push(Bytes::from(format!("-{msg}\r\n")));
        }
        Response::Integer(n) => {
            out.push(Bytes::from(format!(":{n}\r\n")));
        }
        Response::Bulk(None) => {
            out.push(Bytes::from_static(b"$-1\r\n"));
        }
        Response::Bulk(Some(data)) => {
            let mut header = BytesMut::with_capacity(data.len() + 16);
            header.extend_from_slice(format!("${}\r\n", data.len()).as_bytes());
            out.push(header.freeze());
            out.push(data.clone());
            out.push(Bytes::from_static(b"\r\n"));
        }
        Response::Array(items) => {
            out.push(Bytes::from(format!("*{}\r\n", items.len())));
            for item in items {
                encode_into(&Response::Bulk(item.clone()), out);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn joined(resp: &Response) -> Vec<u8> {
        resp.to_buffers().concat()
    }

    #[test]
    fn ok_encodes_as_simple_string() {
        assert_eq!(joined(&Response::ok()), b"+OK\r\n");
    }

    #[test]
    fn error_encodes_with_minus_prefix() {
        assert_eq!(joined(&Response::error("ERR boom")), b"-ERR boom\r\n");
    }

    #[test]
    fn integer_encodes_with_colon_prefix() {
        assert_eq!(joined(&Response::Integer(42)), b":42\r\n");
    }

    #[test]
    fn null_bulk_encodes_as_dollar_minus_one() {
        assert_eq!(joined(&Response::null_bulk()), b"$-1\r\n");
    }

    #[test]
    fn bulk_encodes_length_prefixed() {
        assert_eq!(joined(&Response::bulk(Bytes::from("hey"))), b"$3\r\nhey\r\n");
    }

    #[test]
    fn array_with_mixed_nulls_encodes_each_element() {
        let resp = Response::Array(vec![Some(Bytes::from("a")), None]);
        assert_eq!(joined(&resp), b"*2\r\n$1\r\na\r\n$-1\r\n");
    }
}
