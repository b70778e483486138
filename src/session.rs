//! The per-connection read→parse→dispatch→write loop.

use std::cell::RefCell;
use std::rc::Rc;

use futures::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio_util::codec::Framed;

use crate::commands;
use crate::keyspace::Keyspace;
use crate::parser::RespCodec;
use crate::{log_error, log_info};

/// Drives one client connection to completion. Never suspends inside a
/// dispatched command: the keyspace borrow never crosses an `.await`, so a
/// single `Rc<RefCell<_>>` is sufficient on this single-threaded executor.
pub async fn run(stream: TcpStream, keyspace: Rc<RefCell<Keyspace>>) {
    let mut transport = Framed::new(stream, RespCodec::default());

    loop {
        match transport.next().await {
            Some(Ok(args)) => {
                let response = commands::dispatch(&mut keyspace.borrow_mut(), &args);
                if transport.send(response).await.is_err() {
                    log_error!("failed to write response, closing connection");
                    return;
                }
            }
            Some(Err(err)) => {
                log_error!("protocol error, closing connection: {err}");
                return;
            }
            None => {
                log_info!("client disconnected");
                return;
            }
        }
    }
}
