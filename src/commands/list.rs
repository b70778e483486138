use std::collections::VecDeque;

use bytes::Bytes;

use crate::keyspace::Keyspace;
use crate::response::Response;
use crate::value::Value;

use super::{arity_error, normalize_range, not_integer, parse_i64, wrongtype};

pub fn lpush(ks: &mut Keyspace, args: &[Bytes]) -> Response {
    if args.len() < 3 {
        return arity_error("lpush");
    }
    match ks.get_mut(&args[1]) {
        None => {
            let mut list = VecDeque::new();
            for value in &args[2..] {
                list.push_front(value.clone());
            }
            let len = list.len() as i64;
            ks.set(args[1].clone(), Value::List(list));
            Response::Integer(len)
        }
        Some(Value::List(list)) => {
            for value in &args[2..] {
                list.push_front(value.clone());
            }
            Response::Integer(list.len() as i64)
        }
        Some(_) => wrongtype(),
    }
}

pub fn lpop(ks: &mut Keyspace, args: &[Bytes]) -> Response {
    if args.len() != 2 {
        return arity_error("lpop");
    }
    match ks.get_mut(&args[1]) {
        None => Response::null_bulk(),
        Some(Value::List(list)) => match list.pop_front() {
            Some(value) => Response::bulk(value),
            None => Response::null_bulk(),
        },
        Some(_) => wrongtype(),
    }
}

pub fn lrange(ks: &mut Keyspace, args: &[Bytes]) -> Response {
    if args.len() != 4 {
        return arity_error("lrange");
    }
    match ks.get(&args[1]) {
        None => Response::Array(Vec::new()),
        Some(Value::List(list)) => {
            let (Some(start), Some(stop)) = (parse_i64(&args[2]), parse_i64(&args[3])) else {
                return not_integer();
            };
            match normalize_range(start, stop, list.len()) {
                None => Response::Array(Vec::new()),
                Some((start, stop)) => Response::Array(
                    list.iter()
                        .skip(start)
                        .take(stop - start + 1)
                        .map(|v| Some(v.clone()))
                        .collect(),
                ),
            }
        }
        Some(_) => wrongtype(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn b(s: &str) -> Bytes {
        Bytes::copy_from_slice(s.as_bytes())
    }

    #[test]
    fn lpush_pushes_each_arg_onto_the_head_in_order() {
        let mut ks = Keyspace::new();
        let resp = lpush(&mut ks, &[b("LPUSH"), b("L"), b("a"), b("b"), b("c")]);
        assert_eq!(resp, Response::Integer(3));
        let range = lrange(&mut ks, &[b("LRANGE"), b("L"), b("-2"), b("-1")]);
        assert_eq!(range, Response::Array(vec![Some(b("b")), Some(b("a"))]));
    }

    #[test]
    fn lpush_wrong_type_errors() {
        let mut ks = Keyspace::new();
        ks.set(b("s"), Value::String(b("v")));
        assert_eq!(lpush(&mut ks, &[b("LPUSH"), b("s"), b("x")]), wrongtype());
    }

    #[test]
    fn lpop_missing_key_is_null() {
        let mut ks = Keyspace::new();
        assert_eq!(lpop(&mut ks, &[b("LPOP"), b("missing")]), Response::null_bulk());
    }

    #[test]
    fn lpop_empty_list_is_null() {
        let mut ks = Keyspace::new();
        ks.set(b("L"), Value::List(VecDeque::new()));
        assert_eq!(lpop(&mut ks, &[b("LPOP"), b("L")]), Response::null_bulk());
    }

    #[test]
    fn lrange_out_of_range_start_is_empty() {
        let mut ks = Keyspace::new();
        lpush(&mut ks, &[b("LPUSH"), b("L"), b("a")]);
        let resp = lrange(&mut ks, &[b("LRANGE"), b("L"), b("5"), b("10")]);
        assert_eq!(resp, Response::Array(vec![]));
    }

    #[test]
    fn lrange_rejects_non_integer_bounds() {
        let mut ks = Keyspace::new();
        lpush(&mut ks, &[b("LPUSH"), b("L"), b("a")]);
        assert_eq!(lrange(&mut ks, &[b("LRANGE"), b("L"), b("x"), b("1")]), not_integer());
    }

    #[test]
    fn lrange_wrong_type_wins_over_bad_bounds() {
        let mut ks = Keyspace::new();
        ks.set(b("s"), Value::String(b("v")));
        assert_eq!(lrange(&mut ks, &[b("LRANGE"), b("s"), b("x"), b("y")]), wrongtype());
    }
}
