// tests/thread_safe_process.rs

mod common;
use crate::common::builders::CreateOptionsBuilder;
use crate::common::fake_process::FakeProcess;
use crate::common::init_tracing;
use crate::common::triggers::TriggerLog;

use std::collections::HashSet;
use std::error::Error;
use std::sync::Arc;
use std::time::Duration;

use nix::errno::Errno;
use tokio::sync::Barrier;
use tokio::time::timeout;

use procward::{
    spawn_process, Context, CreateOptions, Process, ProcessError, Signal, ThreadSafeProcess,
    Trigger,
};

type TestResult = Result<(), Box<dyn Error>>;

#[tokio::test]
async fn readers_hold_the_lock_together() -> TestResult {
    init_tracing();

    let ctx = Context::background();
    let barrier = Arc::new(Barrier::new(2));
    let a = ThreadSafeProcess::new(FakeProcess::new("readers").with_read_barrier(barrier));
    let b = a.clone();

    // Each `running` call parks on the barrier while holding a read guard,
    // so this only finishes if both guards are held at once.
    let (ra, rb) = timeout(
        Duration::from_secs(1),
        async { tokio::join!(a.running(&ctx), b.running(&ctx)) },
    )
    .await?;
    assert!(ra && rb);
    Ok(())
}

#[tokio::test]
async fn wait_blocks_other_operations_until_it_returns() -> TestResult {
    init_tracing();

    let ctx = Context::background();
    let fake = FakeProcess::new("blocked");
    let release = fake.release_handle();
    let entered = fake.entered_wait_handle();

    let waiter = ThreadSafeProcess::new(fake);
    let mut other = waiter.clone();

    let wait_task = {
        let mut waiter = waiter.clone();
        let ctx = ctx.clone();
        tokio::spawn(async move { waiter.wait(&ctx).await })
    };
    entered.notified().await;

    assert!(
        timeout(Duration::from_millis(50), other.tag("queued")).await.is_err(),
        "tag should queue behind the in-flight wait"
    );
    assert!(
        timeout(Duration::from_millis(50), other.signal(&ctx, Signal::SIGTERM))
            .await
            .is_err(),
        "signal should queue behind the in-flight wait"
    );
    assert!(
        timeout(Duration::from_millis(50), other.get_tags()).await.is_err(),
        "readers should queue behind the in-flight wait"
    );

    release.notify_one();
    wait_task.await??;

    timeout(Duration::from_secs(1), other.tag("after")).await?;
    assert_eq!(other.get_tags().await, vec!["after"]);
    assert!(other.complete(&ctx).await);
    Ok(())
}

#[tokio::test]
async fn cancelled_wait_releases_the_lock() -> TestResult {
    init_tracing();

    let ctx = Context::background();
    let mut process = ThreadSafeProcess::new(FakeProcess::new("cancel"));

    let err = process
        .wait(&ctx.with_timeout(Duration::from_millis(10)))
        .await
        .unwrap_err();
    assert!(err.is_canceled());

    timeout(Duration::from_secs(1), process.tag("x")).await?;
    assert!(!process.complete(&ctx).await);
    Ok(())
}

#[tokio::test]
async fn errors_pass_through_unchanged() -> TestResult {
    init_tracing();

    let ctx = Context::background();
    let fake = FakeProcess::new("errs").failing_signals(Errno::EPERM);
    let signals = fake.signals_handle();
    let mut process = ThreadSafeProcess::new(fake);

    let err = process.signal(&ctx, Signal::SIGHUP).await.unwrap_err();
    assert!(matches!(
        err,
        ProcessError::Signal {
            signal: Signal::SIGHUP,
            source: Errno::EPERM,
            ..
        }
    ));
    assert_eq!(*signals.lock().unwrap(), vec![Signal::SIGHUP]);

    let err = process.register_trigger(None).await.unwrap_err();
    assert!(matches!(err, ProcessError::NilTrigger));
    assert_eq!(process.id().await, "errs");
    Ok(())
}

#[tokio::test]
async fn shared_process_is_observable_from_every_handle() -> TestResult {
    init_tracing();

    let ctx = Context::background();
    let log = TriggerLog::new();
    let mut owner = spawn_process(&ctx, CreateOptionsBuilder::sleep(0.1).tag("shared").build())?;
    owner.register_trigger(Some(log.trigger("done"))).await?;

    let observer = owner.clone();
    assert_eq!(observer.id().await, owner.id().await);
    assert!(observer.running(&ctx).await);

    owner.wait(&ctx.with_timeout(Duration::from_secs(5))).await?;

    let info = observer.info(&ctx).await;
    assert!(info.complete);
    assert!(info.successful);
    assert_eq!(info.options.tags, vec!["shared"]);
    assert_eq!(log.labels(), vec!["done"]);
    Ok(())
}

#[tokio::test]
async fn concurrent_waits_fire_triggers_once() -> TestResult {
    init_tracing();

    let ctx = Context::background().with_timeout(Duration::from_secs(5));
    let log = TriggerLog::new();
    let mut process = spawn_process(&ctx, CreateOptionsBuilder::sleep(0.1).build())?;
    process.register_trigger(Some(log.trigger("once"))).await?;

    let mut handles = Vec::new();
    for _ in 0..4 {
        let mut p = process.clone();
        let ctx = ctx.clone();
        handles.push(tokio::spawn(async move { p.wait(&ctx).await }));
    }
    for h in handles {
        h.await??;
    }

    assert_eq!(log.labels(), vec!["once"]);
    Ok(())
}

#[tokio::test]
async fn panicking_trigger_does_not_wedge_the_lock() -> TestResult {
    init_tracing();

    let ctx = Context::background();
    let mut process = spawn_process(&ctx, CreateOptions::new(["true"]))?;
    process
        .register_trigger(Some(Trigger::new(|_| panic!("trigger blew up"))))
        .await?;

    let joined = {
        let mut p = process.clone();
        let ctx = ctx.clone();
        tokio::spawn(async move { p.wait(&ctx.with_timeout(Duration::from_secs(5))).await }).await
    };
    assert!(joined.unwrap_err().is_panic());

    timeout(Duration::from_secs(1), process.tag("still-usable")).await?;
    assert_eq!(process.get_tags().await, vec!["still-usable"]);
    assert!(process.complete(&ctx).await);
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_tag_operations_stay_consistent() -> TestResult {
    init_tracing();

    let ctx = Context::background();
    let mut process = spawn_process(&ctx, CreateOptionsBuilder::sleep(10.0).build())?;

    let mut handles = Vec::new();
    for worker in 0..16usize {
        let mut p = process.clone();
        handles.push(tokio::spawn(async move {
            for step in 0..200usize {
                match (worker * 31 + step) % 11 {
                    0 => p.reset_tags().await,
                    n if n < 8 => p.tag(&format!("t{}", (worker + step) % 7)).await,
                    _ => {
                        let tags = p.get_tags().await;
                        let unique: HashSet<_> = tags.iter().collect();
                        assert_eq!(unique.len(), tags.len(), "duplicate tags: {tags:?}");
                    }
                }
            }
        }));
    }
    for h in handles {
        h.await?;
    }

    let tags = process.get_tags().await;
    let unique: HashSet<_> = tags.iter().cloned().collect();
    assert_eq!(unique.len(), tags.len());

    // Every listed tag is a member: tagging again changes nothing.
    for t in &tags {
        process.tag(t).await;
    }
    assert_eq!(process.get_tags().await, tags);
    assert_eq!(process.info(&ctx).await.options.tags, tags);

    process.signal(&ctx, Signal::SIGKILL).await?;
    let _ = process.wait(&ctx.with_timeout(Duration::from_secs(5))).await;
    Ok(())
}
