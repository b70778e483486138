//! The command registry: a static name→handler table and the shared
//! validation helpers every handler builds on (arity, type guard, numeric
//! parsing, canonical error strings).

mod generic;
mod hash;
mod list;
mod ping;
mod string;
mod zset;

use std::collections::HashMap;
use std::sync::OnceLock;

use bytes::Bytes;

use crate::keyspace::Keyspace;
use crate::response::Response;

pub type Handler = fn(&mut Keyspace, &[Bytes]) -> Response;

fn registry() -> &'static HashMap<&'static str, Handler> {
    static REGISTRY: OnceLock<HashMap<&'static str, Handler>> = OnceLock::new();
    REGISTRY.get_or_init(|| {
        let mut m: HashMap<&'static str, Handler> = HashMap::new();
        m.insert("ping", ping::ping);
        m.insert("set", string::set);
        m.insert("get", string::get);
        m.insert("mget", string::mget);
        m.insert("keys", string::keys);
        m.insert("flushdb", generic::flushdb);
        m.insert("dbsize", generic::dbsize);
        m.insert("expire", generic::expire);
        m.insert("ttl", generic::ttl);
        m.insert("persist", generic::persist);
        m.insert("hset", hash::hset);
        m.insert("hget", hash::hget);
        m.insert("hgetall", hash::hgetall);
        m.insert("lpush", list::lpush);
        m.insert("lpop", list::lpop);
        m.insert("lrange", list::lrange);
        m.insert("zadd", zset::zadd);
        m.insert("zrange", zset::zrange);
        m
    })
}

/// Looks up and invokes the handler for `args[0]`, applying the registry
/// rules from the command-dispatch contract (empty command, unknown
/// command, case-insensitive lookup).
pub fn dispatch(ks: &mut Keyspace, args: &[Bytes]) -> Response {
    let Some(name) = args.first() else {
        return Response::error("ERR empty command");
    };
    let lowered = String::from_utf8_lossy(name).to_ascii_lowercase();
    match registry().get(lowered.as_str()) {
        Some(handler) => handler(ks, args),
        None => Response::error(format!(
            "ERR unknown command '{}'",
            String::from_utf8_lossy(name)
        )),
    }
}

pub(crate) fn arity_error(cmd: &str) -> Response {
    Response::error(format!(
        "ERR wrong number of arguments for '{cmd}' command"
    ))
}

pub(crate) fn wrongtype() -> Response {
    Response::error("WRONGTYPE Operation against a key holding the wrong kind of value")
}

pub(crate) fn not_integer() -> Response {
    Response::error("ERR value is not an integer or out of range")
}

pub(crate) fn not_float() -> Response {
    Response::error("ERR value is not a valid float")
}

pub(crate) fn syntax_error() -> Response {
    Response::error("ERR syntax error")
}

pub(crate) fn parse_u64(bytes: &[u8]) -> Option<u64> {
    std::str::from_utf8(bytes).ok()?.parse().ok()
}

pub(crate) fn parse_i64(bytes: &[u8]) -> Option<i64> {
    std::str::from_utf8(bytes).ok()?.parse().ok()
}

pub(crate) fn parse_f64(bytes: &[u8]) -> Option<f64> {
    let text = std::str::from_utf8(bytes).ok()?;
    let value: f64 = text.parse().ok()?;
    if value.is_nan() {
        None
    } else {
        Some(value)
    }
}

/// Clamps a signed `[start, stop]` index pair (negative counts from the
/// tail) to `[0, length-1]`. Returns `None` if the normalized range is
/// empty (`start > stop` or `start >= length`).
pub(crate) fn normalize_range(start: i64, stop: i64, length: usize) -> Option<(usize, usize)> {
    if length == 0 {
        return None;
    }
    let len = length as i64;
    let clamp = |i: i64| if i < 0 { (len + i).max(0) } else { i };
    let start = clamp(start);
    let stop = clamp(stop).min(len - 1);
    if start > stop || start >= len {
        return None;
    }
    Some((start as usize, stop as usize))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn b(s: &str) -> Bytes {
        Bytes::copy_from_slice(s.as_bytes())
    }

    #[test]
    fn dispatch_rejects_empty_command() {
        let mut ks = Keyspace::new();
        assert_eq!(dispatch(&mut ks, &[]), Response::error("ERR empty command"));
    }

    #[test]
    fn dispatch_rejects_unknown_command() {
        let mut ks = Keyspace::new();
        let resp = dispatch(&mut ks, &[b("BOGUS")]);
        assert_eq!(resp, Response::error("ERR unknown command 'BOGUS'"));
    }

    #[test]
    fn dispatch_is_case_insensitive() {
        let mut ks = Keyspace::new();
        assert_eq!(dispatch(&mut ks, &[b("PiNg")]), Response::simple_string(Bytes::from_static(b"PONG")));
    }

    #[test]
    fn normalize_range_clamps_negative_indices() {
        assert_eq!(normalize_range(-2, -1, 3), Some((1, 2)));
    }

    #[test]
    fn normalize_range_empty_when_start_past_length() {
        assert_eq!(normalize_range(5, 10, 3), None);
    }

    #[test]
    fn normalize_range_empty_on_empty_collection() {
        assert_eq!(normalize_range(0, -1, 0), None);
    }
}
