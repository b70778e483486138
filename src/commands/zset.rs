use bytes::Bytes;

use crate::keyspace::Keyspace;
use crate::response::Response;
use crate::value::{SortedSet, Value};

use super::{arity_error, normalize_range, not_float, not_integer, parse_f64, parse_i64, syntax_error, wrongtype};

pub fn zadd(ks: &mut Keyspace, args: &[Bytes]) -> Response {
    if args.len() < 4 || args.len() % 2 != 0 {
        return arity_error("zadd");
    }
    match ks.get_mut(&args[1]) {
        None => {
            let pairs = match parse_score_member_pairs(&args[2..]) {
                Ok(pairs) => pairs,
                Err(resp) => return resp,
            };
            let mut set = SortedSet::new();
            let mut new_members = 0;
            for (score, member) in pairs {
                if set.insert_or_assign(score, member) {
                    new_members += 1;
                }
            }
            ks.set(args[1].clone(), Value::SortedSet(set));
            Response::Integer(new_members)
        }
        Some(Value::SortedSet(set)) => {
            let pairs = match parse_score_member_pairs(&args[2..]) {
                Ok(pairs) => pairs,
                Err(resp) => return resp,
            };
            let mut new_members = 0;
            for (score, member) in pairs {
                if set.insert_or_assign(score, member) {
                    new_members += 1;
                }
            }
            Response::Integer(new_members)
        }
        Some(_) => wrongtype(),
    }
}

fn parse_score_member_pairs(rest: &[Bytes]) -> Result<Vec<(f64, Bytes)>, Response> {
    rest.chunks_exact(2)
        .map(|pair| match parse_f64(&pair[0]) {
            Some(score) => Ok((score, pair[1].clone())),
            None => Err(not_float()),
        })
        .collect()
}

pub fn zrange(ks: &mut Keyspace, args: &[Bytes]) -> Response {
    let with_scores = match args.len() {
        4 => false,
        5 if args[4].eq_ignore_ascii_case(b"withscores") => true,
        5 => return syntax_error(),
        _ => return arity_error("zrange"),
    };
    match ks.get(&args[1]) {
        None => Response::Array(Vec::new()),
        Some(Value::SortedSet(set)) => {
            let (Some(start), Some(stop)) = (parse_i64(&args[2]), parse_i64(&args[3])) else {
                return not_integer();
            };
            match normalize_range(start, stop, set.len()) {
                None => Response::Array(Vec::new()),
                Some((start, stop)) => {
                    let mut out = Vec::new();
                    for (member, score) in set.range(start, stop) {
                        out.push(Some(member));
                        if with_scores {
                            out.push(Some(Bytes::from(format_score(score))));
                        }
                    }
                    Response::Array(out)
                }
            }
        }
        Some(_) => wrongtype(),
    }
}

/// Rust's default `f64` display already produces the shortest decimal that
/// round-trips back to the same bits.
fn format_score(score: f64) -> String {
    format!("{score}")
}
