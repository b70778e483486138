use std::cell::RefCell;
use std::rc::Rc;

use anyhow::Context;
use rkv::keyspace::Keyspace;
use rkv::logging::{self, LogLevel};
use rkv::{log_error, log_info};
use tokio::net::TcpListener;
use tokio::task::LocalSet;

const BIND_ADDR: &str = "0.0.0.0:16379";

async fn run() -> anyhow::Result<()> {
    let keyspace = Rc::new(RefCell::new(Keyspace::new()));
    let listener = TcpListener::bind(BIND_ADDR)
        .await
        .with_context(|| format!("failed to bind {BIND_ADDR}"))?;
    log_info!("listening on {BIND_ADDR}");

    loop {
        match listener.accept().await {
            Ok((stream, peer)) => {
                log_info!("accepted connection from {peer}");
                let keyspace = Rc::clone(&keyspace);
                tokio::task::spawn_local(rkv::session::run(stream, keyspace));
            }
            Err(err) => {
                log_error!("error accepting connection: {err}");
                break;
            }
        }
    }
    Ok(())
}

fn main() -> anyhow::Result<()> {
    logging::set_level(LogLevel::Warning);

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to build the single-threaded runtime")?;

    let local = LocalSet::new();
    local.block_on(&runtime, run())
}
