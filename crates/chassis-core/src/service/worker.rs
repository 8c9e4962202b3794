use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use tokio::process::{Child, Command};

use crate::service::error::{Result, ServiceError};
use crate::service::Service;

const DEFAULT_GRACE_PERIOD: Duration = Duration::from_secs(5);

/// Manager for a fixed-size pool of worker processes.
///
/// Workers are tracked in a pid-keyed handle table. Shutdown follows a
/// graceful-termination protocol: signal each worker, wait out a bounded
/// grace period, then hard-kill stragglers. The table is drained before the
/// pool reports stopped.
pub struct WorkerPool {
    program: String,
    args: Vec<String>,
    worker_limit: usize,
    grace_period: Duration,
    workers: HashMap<u32, Child>,
}

impl WorkerPool {
    /// Create a pool that runs `program` in up to `worker_limit` processes.
    pub fn new(program: impl Into<String>, worker_limit: usize) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            worker_limit,
            grace_period: DEFAULT_GRACE_PERIOD,
            workers: HashMap::new(),
        }
    }

    /// Append an argument passed to every worker.
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Override how long workers get between the termination signal and the
    /// hard kill.
    pub fn with_grace_period(mut self, grace_period: Duration) -> Self {
        self.grace_period = grace_period;
        self
    }

    pub fn worker_limit(&self) -> usize {
        self.worker_limit
    }

    /// Number of tracked workers.
    pub fn worker_count(&self) -> usize {
        self.workers.len()
    }

    /// Process ids of the tracked workers.
    pub fn worker_ids(&self) -> Vec<u32> {
        self.workers.keys().copied().collect()
    }

    /// Launch workers until the pool is at its limit, recording each by
    /// process id.
    pub async fn spawn_workers(&mut self) -> Result<usize> {
        while self.workers.len() < self.worker_limit {
            let child = Command::new(&self.program)
                .args(&self.args)
                .kill_on_drop(true)
                .spawn()
                .map_err(|source| ServiceError::Spawn {
                    command: self.program.clone(),
                    source,
                })?;
            match child.id() {
                Some(pid) => {
                    log::debug!("Worker '{}' started (pid {pid})", self.program);
                    self.workers.insert(pid, child);
                }
                None => {
                    return Err(ServiceError::Fault(format!(
                        "worker '{}' exited before its pid could be recorded",
                        self.program
                    )));
                }
            }
        }
        Ok(self.workers.len())
    }

    /// Gracefully terminate every tracked worker.
    ///
    /// Returns true if every worker exited (on its own, after the signal, or
    /// by the fallback kill). The handle table is empty afterwards either
    /// way.
    pub async fn shutdown(&mut self) -> bool {
        let grace_period = self.grace_period;
        let mut all_exited = true;
        for (pid, mut child) in self.workers.drain() {
            if !Self::terminate(pid, &mut child, grace_period).await {
                all_exited = false;
            }
        }
        all_exited
    }

    async fn terminate(pid: u32, child: &mut Child, grace_period: Duration) -> bool {
        #[cfg(unix)]
        {
            // Ask politely first; a worker that already exited makes kill(2)
            // fail with ESRCH, which the bounded wait below absorbs.
            unsafe {
                libc::kill(pid as libc::pid_t, libc::SIGTERM);
            }
            match tokio::time::timeout(grace_period, child.wait()).await {
                Ok(Ok(status)) => {
                    log::debug!("Worker {pid} exited: {status}");
                    return true;
                }
                Ok(Err(err)) => {
                    log::error!("Waiting on worker {pid} failed: {err}");
                    return false;
                }
                Err(_) => {
                    log::warn!("Worker {pid} ignored the termination signal for {grace_period:?}; killing");
                }
            }
        }

        match child.kill().await {
            Ok(()) => {
                log::debug!("Worker {pid} killed");
                true
            }
            Err(err) => {
                log::error!("Failed to kill worker {pid}: {err}");
                false
            }
        }
    }
}

/// [`Service`] implementation backed by a [`WorkerPool`].
pub struct WorkerService {
    name: String,
    pool: WorkerPool,
    running: bool,
}

impl WorkerService {
    pub fn new(name: impl Into<String>, pool: WorkerPool) -> Self {
        Self {
            name: name.into(),
            pool,
            running: false,
        }
    }

    pub fn pool(&self) -> &WorkerPool {
        &self.pool
    }
}

#[async_trait]
impl Service for WorkerService {
    fn name(&self) -> &str {
        &self.name
    }

    fn running(&self) -> bool {
        self.running
    }

    async fn start(&mut self) -> Result<bool> {
        if self.running {
            return Ok(true);
        }
        let spawned = self.pool.spawn_workers().await?;
        log::info!("Service '{}' started {spawned} workers", self.name);
        self.running = true;
        Ok(true)
    }

    async fn stop(&mut self) -> Result<bool> {
        if !self.running {
            // Never started (or already stopped): nothing to terminate.
            return Ok(true);
        }
        let all_exited = self.pool.shutdown().await;
        self.running = false;
        log::info!("Service '{}' stopped its workers", self.name);
        Ok(all_exited)
    }
}
