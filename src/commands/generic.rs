use bytes::Bytes;

use crate::keyspace::Keyspace;
use crate::response::Response;

use super::{arity_error, not_integer, parse_u64};

pub fn flushdb(ks: &mut Keyspace, args: &[Bytes]) -> Response {
    match args.len() {
        1 => {
            ks.flush();
            Response::ok()
        }
        2 if args[1].eq_ignore_ascii_case(b"sync") => {
            ks.flush();
            Response::ok()
        }
        2 if args[1].eq_ignore_ascii_case(b"async") => {
            ks.flush_async();
            Response::ok()
        }
        _ => arity_error("flushdb"),
    }
}

pub fn dbsize(ks: &mut Keyspace, args: &[Bytes]) -> Response {
    if args.len() != 1 {
        return arity_error("dbsize");
    }
    Response::Integer(ks.size() as i64)
}

pub fn expire(ks: &mut Keyspace, args: &[Bytes]) -> Response {
    if args.len() != 3 {
        return arity_error("expire");
    }
    let Some(seconds) = parse_u64(&args[2]) else {
        return not_integer();
    };
    let ok = ks.expire_at(&args[1], seconds);
    Response::Integer(if ok { 1 } else { 0 })
}

pub fn ttl(ks: &mut Keyspace, args: &[Bytes]) -> Response {
    if args.len() != 2 {
        return arity_error("ttl");
    }
    const KEY_NOT_EXIST: i64 = -2;
    const KEY_NO_EXPIRE: i64 = -1;
    match ks.ttl(&args[1]) {
        Some(seconds) => Response::Integer(seconds as i64),
        None if ks.contains(&args[1]) => Response::Integer(KEY_NO_EXPIRE),
        None => Response::Integer(KEY_NOT_EXIST),
    }
}

pub fn persist(ks: &mut Keyspace, args: &[Bytes]) -> Response {
    if args.len() != 2 {
        return arity_error("persist");
    }
    Response::Integer(if ks.persist(&args[1]) { 1 } else { 0 })
}
