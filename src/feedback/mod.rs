//! Side-effect sinks: spoken feedback and host power control
//!
//! Both are fire-and-forget. Nothing that happens in here is reported back
//! to the dispatcher.

mod power;
mod voice;

pub use power::{PowerControl, SystemPower};
pub use voice::{Announcer, CommandAnnouncer, LogAnnouncer};

use std::process::Stdio;

use tokio::process::Command;
use tracing::{debug, warn};

/// Spawn `argv` (plus optional extra argument) without waiting for it
fn spawn_detached(argv: &[String], extra: Option<&str>) {
    let Some((program, args)) = argv.split_first() else {
        warn!("empty command, nothing to run");
        return;
    };

    let mut cmd = Command::new(program);
    cmd.args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null());
    if let Some(extra) = extra {
        cmd.arg(extra);
    }

    match cmd.spawn() {
        Ok(mut child) => {
            let program = program.clone();
            // Reap in the background so the child doesn't linger as a zombie
            tokio::spawn(async move {
                match child.wait().await {
                    Ok(status) if status.success() => debug!(%program, "command finished"),
                    Ok(status) => warn!(%program, %status, "command exited with failure"),
                    Err(e) => warn!(%program, ?e, "failed to wait for command"),
                }
            });
        }
        Err(e) => warn!(%program, ?e, "failed to spawn command"),
    }
}
