// tests/wait_cancellation.rs

mod common;
use crate::common::builders::CreateOptionsBuilder;
use crate::common::init_tracing;

use std::error::Error;
use std::time::{Duration, Instant};

use procward::{BasicProcess, Context, ContextError, Process, ProcessError};

type TestResult = Result<(), Box<dyn Error>>;

#[tokio::test]
async fn explicit_cancel_is_reported_as_canceled() -> TestResult {
    init_tracing();

    let root = Context::background();
    let ctx = root.with_cancel();
    let mut process = BasicProcess::start(&root, CreateOptionsBuilder::sleep(2.0).build())?;

    let canceller = {
        let ctx = ctx.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(20)).await;
            ctx.cancel();
        })
    };

    let err = process.wait(&ctx).await.unwrap_err();
    assert!(matches!(
        err,
        ProcessError::WaitCanceled {
            reason: ContextError::Canceled,
            ..
        }
    ));
    canceller.await?;

    // The process keeps running; a fresh context can still observe it.
    assert!(process.running(&root).await);
    process.signal(&root, procward::Signal::SIGKILL).await?;
    let err = process
        .wait(&root.with_timeout(Duration::from_secs(5)))
        .await
        .unwrap_err();
    assert!(!err.is_canceled());
    Ok(())
}

#[tokio::test]
async fn deadline_is_reported_as_deadline_exceeded() -> TestResult {
    init_tracing();

    let ctx = Context::background();
    let mut process = BasicProcess::start(&ctx, CreateOptionsBuilder::sleep(2.0).build())?;

    let err = process
        .wait(&ctx.with_timeout(Duration::from_millis(10)))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        ProcessError::WaitCanceled {
            reason: ContextError::DeadlineExceeded,
            ..
        }
    ));

    process.signal(&ctx, procward::Signal::SIGKILL).await?;
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn repeated_cancel_and_discard_does_not_leak_waiters() -> TestResult {
    init_tracing();

    let metrics = tokio::runtime::Handle::current().metrics();
    let baseline = metrics.num_alive_tasks();
    let ctx = Context::background();

    for _ in 0..25 {
        let mut process = BasicProcess::start(&ctx, CreateOptionsBuilder::sleep(0.2).build())?;
        let err = process
            .wait(&ctx.with_timeout(Duration::from_millis(5)))
            .await
            .unwrap_err();
        assert!(err.is_canceled());
        drop(process);
    }

    // Each abandoned waiter finishes once its child exits.
    let deadline = Instant::now() + Duration::from_secs(10);
    while metrics.num_alive_tasks() > baseline {
        assert!(
            Instant::now() < deadline,
            "background waiters still alive: {} (baseline {})",
            metrics.num_alive_tasks(),
            baseline
        );
        tokio::time::sleep(Duration::from_millis(50)).await;
    }
    Ok(())
}
