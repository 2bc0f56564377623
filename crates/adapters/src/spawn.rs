// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Process adapter for launching the Child Service Runtime (spec.md §4.3
//! "Launch contract", §4.4 "EnsureService").
//!
//! Mirrors the teacher's `subprocess::run_with_timeout` shape but spawns a
//! long-running server rather than waiting for an exit status — the
//! supervisor polls `/health` after spawn instead of collecting output.

use std::collections::HashMap;
use std::path::PathBuf;

use async_trait::async_trait;
use nix::sys::signal::{self, Signal};
use nix::unistd::Pid;
use thiserror::Error;
use tokio::process::{Child, Command};

#[derive(Debug, Error)]
pub enum SpawnError {
    #[error("failed to spawn child process: {0}")]
    Spawn(#[from] std::io::Error),
    #[error("failed to signal pid {pid}: {source}")]
    Signal { pid: u32, source: nix::Error },
}

/// Everything [`ChildSpawnSpec::child_env`] needs to launch one Child
/// Service Runtime instance (spec.md §4.3 launch contract, §6 identity vars).
#[derive(Debug, Clone)]
pub struct ChildSpawnSpec {
    pub binary_path: PathBuf,
    pub service_name: String,
    pub port: u16,
    pub company_name: String,
    pub domain: String,
    pub industry_type: String,
    pub journey_type: String,
    pub engine_base_url: String,
    /// Opaque observability-identity vars, forwarded unchanged
    /// (spec.md §6: "opaque to the system — pass-through").
    pub observability_env: Vec<(String, String)>,
}

impl ChildSpawnSpec {
    fn child_env(&self) -> HashMap<&str, String> {
        let mut env = HashMap::new();
        env.insert("SERVICE_NAME", self.service_name.clone());
        env.insert("PORT", self.port.to_string());
        env.insert("COMPANY_NAME", self.company_name.clone());
        env.insert("DOMAIN", self.domain.clone());
        env.insert("INDUSTRY_TYPE", self.industry_type.clone());
        env.insert("JOURNEY_TYPE", self.journey_type.clone());
        env.insert("BOS_ENGINE_BASE_URL", self.engine_base_url.clone());
        env
    }
}

/// A spawned, still-running child process.
pub struct SpawnedChild {
    pub pid: u32,
    handle: Child,
}

impl SpawnedChild {
    /// Take ownership of the underlying [`Child`], e.g. to `.wait()` on exit
    /// after a signal has been sent.
    pub fn into_handle(self) -> Child {
        self.handle
    }
}

/// Abstracts process spawning and signaling for testability — the
/// supervisor never calls `tokio::process::Command` directly.
#[async_trait]
pub trait ProcessAdapter: Send + Sync + 'static {
    async fn spawn(&self, spec: &ChildSpawnSpec) -> Result<SpawnedChild, SpawnError>;

    /// Send `SIGTERM` to `pid` (spec.md §9 "Graceful-vs-forceful teardown").
    fn terminate(&self, pid: u32) -> Result<(), SpawnError>;

    /// Send `SIGKILL` to `pid` — the escalation after a grace period elapses
    /// without the process exiting.
    fn kill(&self, pid: u32) -> Result<(), SpawnError>;
}

/// Production adapter: real `tokio::process::Command` + `nix` signals.
#[derive(Debug, Clone, Copy, Default)]
pub struct OsProcessAdapter;

#[async_trait]
impl ProcessAdapter for OsProcessAdapter {
    async fn spawn(&self, spec: &ChildSpawnSpec) -> Result<SpawnedChild, SpawnError> {
        let mut cmd = Command::new(&spec.binary_path);
        cmd.envs(spec.child_env());
        cmd.envs(spec.observability_env.iter().map(|(k, v)| (k.as_str(), v.as_str())));
        // Termination goes through `terminate`/`kill` (explicit signals on the
        // tracked pid) rather than handle-drop: the supervisor hands the
        // `Child` off to a reaper task right after spawn (see
        // `SpawnedChild::into_handle` callers), and a `kill_on_drop` handle
        // would SIGKILL the child the moment that task takes ownership.
        cmd.kill_on_drop(false);
        cmd.stdin(std::process::Stdio::null());
        // argv[0] becomes `serviceName` instead of the binary's real path
        // (spec.md §4.3 "launch args that set the process title to
        // serviceName"), so `ps`/`/proc/<pid>/cmdline` names the service
        // rather than the shared `bos-child` binary — this is what lets
        // `ServiceSupervisor::sweep_stray_processes` recognize a leaked child
        // by its title alone.
        {
            use std::os::unix::process::CommandExt;
            cmd.as_std_mut().arg0(&spec.service_name);
        }

        let child = cmd.spawn()?;
        let pid = child.id().unwrap_or_default();
        Ok(SpawnedChild { pid, handle: child })
    }

    fn terminate(&self, pid: u32) -> Result<(), SpawnError> {
        send_signal(pid, Signal::SIGTERM)
    }

    fn kill(&self, pid: u32) -> Result<(), SpawnError> {
        send_signal(pid, Signal::SIGKILL)
    }
}

fn send_signal(pid: u32, signal: Signal) -> Result<(), SpawnError> {
    signal::kill(Pid::from_raw(pid as i32), signal).map_err(|source| SpawnError::Signal { pid, source })
}

#[cfg(any(test, feature = "test-support"))]
pub mod fake {
    //! A deterministic [`ProcessAdapter`] for supervisor tests: no real
    //! processes are spawned, just bookkeeping of which pids were
    //! terminated/killed.
    use super::*;
    use parking_lot::Mutex;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    #[derive(Clone, Default)]
    pub struct FakeProcessAdapter {
        next_pid: Arc<AtomicU32>,
        pub terminated: Arc<Mutex<Vec<u32>>>,
        pub killed: Arc<Mutex<Vec<u32>>>,
        pub fail_spawn: Arc<Mutex<bool>>,
    }

    impl FakeProcessAdapter {
        pub fn new() -> Self {
            Self { next_pid: Arc::new(AtomicU32::new(1)), ..Default::default() }
        }
    }

    #[async_trait]
    impl ProcessAdapter for FakeProcessAdapter {
        async fn spawn(&self, _spec: &ChildSpawnSpec) -> Result<SpawnedChild, SpawnError> {
            if *self.fail_spawn.lock() {
                return Err(SpawnError::Spawn(std::io::Error::other("injected spawn failure")));
            }
            let pid = self.next_pid.fetch_add(1, Ordering::SeqCst);
            // `/bin/sleep` style idle command just so a real `Child` handle exists.
            let handle = Command::new("true").kill_on_drop(true).spawn()?;
            Ok(SpawnedChild { pid, handle })
        }

        fn terminate(&self, pid: u32) -> Result<(), SpawnError> {
            self.terminated.lock().push(pid);
            Ok(())
        }

        fn kill(&self, pid: u32) -> Result<(), SpawnError> {
            self.killed.lock().push(pid);
            Ok(())
        }
    }
}

#[cfg(test)]
#[path = "spawn_tests.rs"]
mod tests;
