// src/lib.rs

pub mod cli;
pub mod context;
pub mod errors;
pub mod logging;
pub mod options;
pub mod process;

use std::time::Duration;

use anyhow::Context as _;
use tracing::{debug, info, warn};

use crate::cli::CliArgs;
pub use crate::context::{Context, ContextError};
pub use crate::errors::{ProcessError, Result};
pub use crate::options::{CreateOptions, OutputMode};
pub use crate::process::{
    BasicProcess, Process, ProcessInfo, Signal, ThreadSafeProcess, Trigger,
};

/// The form handed to consumers: a locked [`BasicProcess`].
pub type SharedProcess = ThreadSafeProcess<BasicProcess>;

/// Start a process and return it already wrapped for sharing.
///
/// Prefer this over [`BasicProcess::start`] whenever more than one task will
/// touch the process.
pub fn spawn_process(ctx: &Context, opts: CreateOptions) -> Result<SharedProcess> {
    let process = BasicProcess::start(ctx, opts)?;
    Ok(ThreadSafeProcess::new(process))
}

/// High-level entry point used by `main.rs`.
///
/// Builds options from the CLI (and optional options file), starts the
/// process, waits for it (bounded by `--timeout`, interrupted by Ctrl-C),
/// and prints the final [`ProcessInfo`] as JSON. Returns whether the process
/// completed successfully.
pub async fn run(args: CliArgs) -> anyhow::Result<bool> {
    let opts = args.create_options()?;

    let root = Context::background();
    let ctx = match args.timeout {
        Some(secs) => root.with_timeout(Duration::from_secs_f64(secs)),
        None => root.with_cancel(),
    };

    // Ctrl-C → stop waiting.
    {
        let ctx = ctx.clone();
        tokio::spawn(async move {
            if let Err(e) = tokio::signal::ctrl_c().await {
                eprintln!("failed to listen for Ctrl+C: {e}");
                return;
            }
            ctx.cancel();
        });
    }

    let mut process = spawn_process(&root, opts).context("starting process")?;

    let report = Trigger::new(|info: &ProcessInfo| {
        info!(id = %info.id, successful = info.successful, "process completed");
    });
    if let Err(err) = process.register_trigger(Some(report)).await {
        // Already complete, e.g. the program could not be spawned.
        debug!(error = %err, "completion trigger not registered");
    }

    match process.wait(&ctx).await {
        Ok(()) => {}
        Err(err) if err.is_canceled() => {
            warn!(error = %err, "gave up waiting for process");
            if let Some(sig) = args.signal_on_timeout {
                process
                    .signal(&root, sig)
                    .await
                    .with_context(|| format!("sending {sig} after timeout"))?;
                // Reap it so the report reflects the signal.
                if let Err(err) = process.wait(&root).await {
                    debug!(error = %err, "process exited after signal");
                }
            }
        }
        Err(err) => warn!(error = %err, "process did not exit cleanly"),
    }

    let info = process.info(&root).await;
    println!("{}", render_report(&info)?);

    Ok(info.complete && info.successful)
}

/// Pretty JSON form of the final snapshot printed by the binary.
pub fn render_report(info: &ProcessInfo) -> Result<String> {
    Ok(serde_json::to_string_pretty(info)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_carries_snapshot_fields() {
        let info = ProcessInfo {
            id: "abc".to_string(),
            options: CreateOptions::new(["true"]),
            host: "box".to_string(),
            complete: true,
            running: false,
            successful: true,
            pid: None,
        };

        let report = render_report(&info).unwrap();
        let value: serde_json::Value = serde_json::from_str(&report).unwrap();

        assert_eq!(value["id"], "abc");
        assert_eq!(value["complete"], true);
        assert_eq!(value["successful"], true);
        assert!(value["pid"].is_null());
    }
}
