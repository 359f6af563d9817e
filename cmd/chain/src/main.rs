//! Error chain walkthrough
//!
//! Builds a three-layer chain over an `io::Error` and prints every layer:
//! code, data and (for the origin) the resolved call stack.
//!
//! # Environment Variables
//!
//! - `RUST_LOG=coderr=debug` - Show capture decisions from the library
//! - `CODERR_BACKTRACE=0` - Disable stack capture
//! - `CODERR_DEPTH=4` - Keep at most 4 frames per origin
// RUST_LOG=coderr=debug CODERR_DEPTH=4 cargo run -p coderr-chain

use std::io;

use coderr::{code, data, CaptureConfig, Error, ResultExt};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let fmt_layer = fmt::layer().with_target(true).with_level(true);

    if let Err(e) = tracing_subscriber::registry().with(filter).with(fmt_layer).try_init() {
        eprintln!("tracing init failed: {}", e);
    }
}

fn read_block(sector: u64) -> Result<Vec<u8>, io::Error> {
    Err(io::Error::new(
        io::ErrorKind::UnexpectedEof,
        format!("short read at sector {}", sector),
    ))
}

fn load_page(page: u32) -> Result<Vec<u8>, Error> {
    read_block(u64::from(page) * 8).wrap_err_with("storage/read", [data! { "page" => page }])
}

fn fetch_user(id: u64) -> Result<String, Error> {
    let bytes = load_page(17).wrap_err_with("user/fetch", [data! { "id" => id }])?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

fn handle_request(path: &str) -> Result<String, Error> {
    fetch_user(42).wrap_err_with("http/handler", [data! { "path" => path, "status" => 500 }])
}

fn main() {
    init_tracing();

    println!("=== coderr chain ===\n");

    let config = coderr::config::global();
    tracing::info!(enabled = config.enabled, depth = config.depth, "capture config");
    if *config != CaptureConfig::default() {
        println!("Capture: enabled={} depth={}\n", config.enabled, config.depth);
    }

    let err = match handle_request("/users/42") {
        Ok(body) => {
            println!("unexpected success: {}", body);
            return;
        }
        Err(e) => e,
    };

    println!("Top: {}\n", err);

    for (depth, layer) in err.chain().enumerate() {
        let pad = "  ".repeat(depth);
        match layer.downcast_ref::<Error>() {
            Some(e) => {
                println!("{}[{}] code={} data={}", pad, depth, e.code(), e.data());
                for (i, frame) in e.frames().iter().enumerate() {
                    println!("{}      #{:<2} {}", pad, i, frame);
                }
            }
            None => {
                let c = code::<&str>(Some(layer)).unwrap_or_default();
                println!("{}[{}] foreign ({}) {}", pad, depth, c, layer);
            }
        }
    }

    if let Some(origin) = err.origin() {
        println!("\nOrigin: {} ({} frames)", origin.code(), origin.frames().len());
    }
}
