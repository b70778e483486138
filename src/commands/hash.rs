use std::collections::HashMap;

use bytes::Bytes;

use crate::keyspace::Keyspace;
use crate::response::Response;
use crate::value::Value;

use super::{arity_error, wrongtype};

pub fn hset(ks: &mut Keyspace, args: &[Bytes]) -> Response {
    if args.len() < 4 || args.len() % 2 != 0 {
        return arity_error("hset");
    }
    let pairs = || args[2..].chunks_exact(2).map(|pair| (pair[0].clone(), pair[1].clone()));

    match ks.get_mut(&args[1]) {
        None => {
            let mut hash = HashMap::new();
            let mut new_fields = 0;
            for (field, value) in pairs() {
                if hash.insert(field, value).is_none() {
                    new_fields += 1;
                }
            }
            ks.set(args[1].clone(), Value::Hash(hash));
            Response::Integer(new_fields)
        }
        Some(Value::Hash(hash)) => {
            let mut new_fields = 0;
            for (field, value) in pairs() {
                if hash.insert(field, value).is_none() {
                    new_fields += 1;
                }
            }
            Response::Integer(new_fields)
        }
        Some(_) => wrongtype(),
    }
}

pub fn hget(ks: &mut Keyspace, args: &[Bytes]) -> Response {
    if args.len() != 3 {
        return arity_error("hget");
    }
    match ks.get(&args[1]) {
        None => Response::null_bulk(),
        Some(Value::Hash(hash)) => match hash.get(args[2].as_ref()) {
            Some(value) => Response::bulk(value.clone()),
            None => Response::null_bulk(),
        },
        Some(_) => wrongtype(),
    }
}

pub fn hgetall(ks: &mut Keyspace, args: &[Bytes]) -> Response {
    if args.len() != 2 {
        return arity_error("hgetall");
    }
    match ks.get(&args[1]) {
        None => Response::Array(Vec::new()),
        Some(Value::Hash(hash)) => {
            let mut out = Vec::with_capacity(hash.len() * 2);
            for (field, value) in hash.iter() {
                out.push(Some(field.clone()));
                out.push(Some(value.clone()));
            }
            Response::Array(out)
        }
        Some(_) => wrongtype(),
    }
}
