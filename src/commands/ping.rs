use bytes::Bytes;

use crate::keyspace::Keyspace;
use crate::response::Response;

use super::arity_error;

pub fn ping(_ks: &mut Keyspace, args: &[Bytes]) -> Response {
    match args.len() {
        1 => Response::simple_string(Bytes::from_static(b"PONG")),
        2 => Response::simple_string(args[1].clone()),
        _ => arity_error("ping"),
    }
}
