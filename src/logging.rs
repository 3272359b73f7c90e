//! `tracing` initialization (spec §9 ambient stack), grounded in the
//! teacher's `init_tracing` in `bin/legit_poker_server.rs`: an
//! `EnvFilter` defaulting to `info`, with a switch between human-readable
//! and JSON output. The teacher calls this from its server binary's
//! `main`; here it is a library-exposed helper for collaborator binaries
//! (CLI tooling, the HTTP/WebSocket frontends) to call, since this core
//! has no `main` of its own (spec §1: CLI/frontends are out of scope).

use tracing_subscriber::{fmt, EnvFilter};

/// Initialize a global `tracing` subscriber reading `RUST_LOG` (falling
/// back to `info`). `json` selects structured JSON output over the
/// default compact human-readable format. Safe to call at most once per
/// process; a second call is a caller error, not handled here.
pub fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = fmt::fmt().with_env_filter(filter).with_target(true);
    if json {
        builder.json().flatten_event(true).init();
    } else {
        builder.compact().init();
    }
}
