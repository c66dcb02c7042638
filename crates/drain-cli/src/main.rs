use std::sync::{Arc, OnceLock};
use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use clap::Parser;
use serde::Deserialize;
use tracing_subscriber::EnvFilter;

use drain_core::app::{BASE_IDENTIFIER, EventManager};
use drain_core::domain::{Job, JobKind};
use drain_core::impls::{
    HandlerProcessor, InMemoryQueue, JobHandler, QueueRegistry, TracingListener,
};
use drain_core::ports::QueueHandle;
use drain_core::{JobFailure, MaxRuns, PopOptions, SignalBridge, Worker, WorkerOptions};

static TRACING_INIT: OnceLock<()> = OnceLock::new();

/// Honours `RUST_LOG`, falls back to `info`. Safe to call more than once.
fn init_tracing() {
    if TRACING_INIT.get().is_some() {
        return;
    }

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init();

    let _ = TRACING_INIT.set(());
}

/// Drain an in-memory queue seeded with demo jobs.
#[derive(Debug, Parser)]
#[command(name = "drain", version)]
struct Args {
    /// Queue to process.
    #[arg(long, env = "DRAIN_QUEUE", default_value = "default")]
    queue: String,

    /// Stop after this many jobs. Omit for no limit.
    #[arg(long, env = "DRAIN_MAX_RUNS")]
    max_runs: Option<u64>,

    /// Stop once process memory exceeds this many bytes.
    #[arg(long, env = "DRAIN_MAX_MEMORY", default_value_t = 100 * 1024 * 1024)]
    max_memory: u64,

    /// How long a pop waits for work, in milliseconds.
    #[arg(long, env = "DRAIN_TIMEOUT_MS", default_value_t = 1_000)]
    timeout_ms: u64,

    /// Jobs per pop.
    #[arg(long, env = "DRAIN_BATCH_SIZE", default_value_t = 1)]
    batch_size: usize,

    /// Number of demo jobs to enqueue before processing.
    #[arg(long, env = "DRAIN_SEED", default_value_t = 10)]
    seed: u32,

    /// Simulated work per job, in milliseconds.
    #[arg(long, env = "DRAIN_WORK_MS", default_value_t = 100)]
    work_ms: u64,
}

#[derive(Debug, Deserialize)]
struct HelloPayload {
    name: String,
}

struct HelloHandler {
    work: Duration,
}

#[async_trait]
impl JobHandler for HelloHandler {
    async fn handle(&self, job: &Job, queue: &dyn QueueHandle) -> Result<(), JobFailure> {
        let p: HelloPayload = serde_json::from_value(job.payload().clone())
            .map_err(|e| JobFailure::with_source("json decode", e))?;

        tokio::time::sleep(self.work).await;
        tracing::info!(
            job_id = %job.id(),
            queue = queue.name(),
            seq = ?job.metadata().get("seq"),
            "Hello, {}!",
            p.name
        );
        Ok(())
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let args = Args::parse();

    // (A) queue + handlers
    let queue = Arc::new(InMemoryQueue::new(args.queue.clone()));
    queue
        .push_all((0..args.seed).map(|n| {
            Job::new(
                JobKind::new("hello"),
                serde_json::json!({ "name": format!("drain-{n}") }),
            )
            .with_metadata("seq", serde_json::json!(n))
        }))
        .context("seed queue")?;

    let mut queues = QueueRegistry::new();
    queues.register(queue.clone())?;

    let processor = HandlerProcessor::new().route(
        JobKind::new("hello"),
        Arc::new(HelloHandler {
            work: Duration::from_millis(args.work_ms),
        }),
    )?;

    // (B) worker
    let options = WorkerOptions::new(MaxRuns::from(args.max_runs), args.max_memory)?;
    let worker = Worker::builder(Arc::new(queues), Arc::new(processor))
        .options(options)
        .identifier("drain.cli")
        .event_manager(
            EventManager::new().with_listener(BASE_IDENTIFIER, Arc::new(TracingListener)),
        )
        .build()?;
    tracing::info!(
        identifiers = ?worker.identifiers().as_slice(),
        listeners = worker.event_manager().listener_count(),
        "worker ready"
    );

    // (C) SIGTERM / SIGINT -> stop after the current job
    let _bridge = SignalBridge::install(worker.clone()).context("install signal bridge")?;

    // (D) run
    let pop = PopOptions::new()
        .with_timeout(Duration::from_millis(args.timeout_ms))
        .with_batch_size(args.batch_size);
    let count = worker
        .process(&args.queue, &pop)
        .await
        .with_context(|| format!("process queue {}", args.queue))?;

    tracing::info!(
        count,
        remaining = queue.len()?,
        stopped = worker.is_stopped(),
        "worker finished"
    );
    Ok(())
}
