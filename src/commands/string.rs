use bytes::Bytes;

use crate::keyspace::Keyspace;
use crate::response::Response;
use crate::value::Value;

use super::{arity_error, not_integer, parse_u64, wrongtype};

pub fn set(ks: &mut Keyspace, args: &[Bytes]) -> Response {
    match args.len() {
        3 => {
            ks.set(args[1].clone(), Value::String(args[2].clone()));
            Response::ok()
        }
        5 if args[3].eq_ignore_ascii_case(b"ex") => {
            let Some(seconds) = parse_u64(&args[4]) else {
                return not_integer();
            };
            ks.set_with_ttl(args[1].clone(), Value::String(args[2].clone()), seconds);
            Response::ok()
        }
        _ => arity_error("set"),
    }
}

pub fn get(ks: &mut Keyspace, args: &[Bytes]) -> Response {
    if args.len() != 2 {
        return arity_error("get");
    }
    match ks.get(&args[1]) {
        None => Response::null_bulk(),
        Some(Value::String(v)) => Response::bulk(v.clone()),
        Some(_) => wrongtype(),
    }
}

pub fn mget(ks: &mut Keyspace, args: &[Bytes]) -> Response {
    if args.len() < 2 {
        return arity_error("mget");
    }
    let keys = args[1..].iter().map(|k| k.as_ref());
    Response::Array(ks.mget(keys))
}

pub fn keys(ks: &mut Keyspace, args: &[Bytes]) -> Response {
    if args.len() < 2 {
        return arity_error("keys");
    }
    let candidates = args[1..].iter().map(|k| k.as_ref());
    let found = ks.keys(candidates);
    Response::Array(found.into_iter().map(Some).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn b(s: &str) -> Bytes {
        Bytes::copy_from_slice(s.as_bytes())
    }

    #[test]
    fn set_then_get_round_trips() {
        let mut ks = Keyspace::new();
        set(&mut ks, &[b("SET"), b("k"), b("v")]);
        assert_eq!(get(&mut ks, &[b("GET"), b("k")]), Response::bulk(b("v")));
    }

    #[test]
    fn set_with_ex_installs_ttl() {
        let mut ks = Keyspace::new();
        let resp = set(&mut ks, &[b("SET"), b("k"), b("v"), b("EX"), b("60")]);
        assert_eq!(resp, Response::ok());
        let remaining = ks.ttl(b"k").unwrap();
        assert!(remaining <= 60);
    }

    #[test]
    fn set_rejects_bad_option() {
        let mut ks = Keyspace::new();
        let resp = set(&mut ks, &[b("SET"), b("k"), b("v"), b("XX"), b("60")]);
        assert_eq!(resp, arity_error("set"));
    }

    #[test]
    fn get_missing_key_is_null_bulk() {
        let mut ks = Keyspace::new();
        assert_eq!(get(&mut ks, &[b("GET"), b("missing")]), Response::null_bulk());
    }

    #[test]
    fn get_wrong_type_errors() {
        let mut ks = Keyspace::new();
        ks.set(b("h"), Value::Hash(Default::default()));
        assert_eq!(get(&mut ks, &[b("GET"), b("h")]), wrongtype());
    }

    #[test]
    fn mget_mixes_values_and_nulls() {
        let mut ks = Keyspace::new();
        ks.set(b("a"), Value::String(b("1")));
        let resp = mget(&mut ks, &[b("MGET"), b("a"), b("missing")]);
        assert_eq!(resp, Response::Array(vec![Some(b("1")), None]));
    }

    #[test]
    fn keys_returns_only_existing_candidates() {
        let mut ks = Keyspace::new();
        ks.set(b("a"), Value::String(b("1")));
        let resp = keys(&mut ks, &[b("KEYS"), b("a"), b("b")]);
        assert_eq!(resp, Response::Array(vec![Some(b("a"))]));
    }
}
