mod calc;
mod config;
mod ipc;
mod roster;

use std::io::{self, BufRead, Write};

use anyhow::Context;
use clap::Parser;

fn main() -> anyhow::Result<()> {
    let config = config::Config::parse();
    config::init_logging(&config);
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "rosterd started");

    let mut state = ipc::AppState::default();

    let stdin = io::stdin();
    let mut stdout = io::stdout();

    for line in stdin.lock().lines() {
        let line = match line {
            Ok(v) => v,
            Err(e) => {
                tracing::warn!(error = %e, "stdin read failed");
                break;
            }
        };
        if line.trim().is_empty() {
            continue;
        }

        let resp = match serde_json::from_str::<ipc::Request>(&line) {
            Ok(req) => {
                tracing::debug!(id = %req.id, method = %req.method, "request");
                ipc::handle_request(&mut state, req)
            }
            Err(e) => {
                // Can't reply with an id we could not parse.
                tracing::warn!(error = %e, "bad request line");
                let mut v = ipc::err("", "bad_json", e.to_string(), None);
                if let Some(obj) = v.as_object_mut() {
                    obj.remove("id");
                }
                v
            }
        };

        let out = serde_json::to_string(&resp).context("serialize response")?;
        writeln!(stdout, "{}", out).context("write response")?;
        stdout.flush().context("flush stdout")?;
    }

    tracing::info!(students = state.roster.len(), "stdin closed, exiting");
    Ok(())
}
