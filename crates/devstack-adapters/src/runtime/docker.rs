//! `docker compose` adapter for the [`ContainerRuntime`] port.
//!
//! Every invocation is one child process with a bounded timeout: output is
//! drained on reader threads while the child is polled against a deadline;
//! on expiry the child is killed and [`RuntimeError::TimedOut`] surfaces
//! instead of a hang.

use std::collections::BTreeMap;
use std::io::Read;
use std::path::Path;
use std::process::{Command, Stdio};
use std::time::{Duration, Instant};

use devstack_core::{
    application::{
        RuntimeError,
        ports::{CapturedOutput, ContainerRuntime, StackRef},
    },
    domain::ServiceState,
};
use serde::Deserialize;
use tracing::{debug, trace};

const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Shells out to `docker compose` against the generated manifest.
#[derive(Debug, Clone)]
pub struct DockerComposeRuntime {
    binary: String,
}

impl DockerComposeRuntime {
    pub fn new() -> Self {
        Self {
            binary: "docker".into(),
        }
    }

    /// Use an alternate runtime binary (e.g. `podman`).
    pub fn with_binary(binary: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
        }
    }

    /// `compose -f <manifest> -p <project>` — the prefix of every call.
    fn compose_args(stack: &StackRef) -> Vec<String> {
        vec![
            "compose".into(),
            "-f".into(),
            stack.manifest_path.to_string_lossy().into_owned(),
            "-p".into(),
            stack.project.clone(),
        ]
    }

    /// Run `<binary> <args...>`, capture output, enforce the timeout.
    fn invoke(&self, args: &[String], timeout: Duration) -> Result<CapturedOutput, RuntimeError> {
        trace!(binary = %self.binary, ?args, "invoking runtime");

        let mut child = Command::new(&self.binary)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| match e.kind() {
                std::io::ErrorKind::NotFound => RuntimeError::Unavailable {
                    message: format!("'{}' not found on PATH", self.binary),
                },
                _ => RuntimeError::Io {
                    message: format!("failed to spawn '{}': {e}", self.binary),
                },
            })?;

        // Drain pipes on threads so a chatty child never fills a pipe and
        // deadlocks against our wait loop.
        let stdout_handle = child.stdout.take().map(spawn_reader);
        let stderr_handle = child.stderr.take().map(spawn_reader);

        let deadline = Instant::now() + timeout;
        let status = loop {
            match child.try_wait() {
                Ok(Some(status)) => break status,
                Ok(None) => {
                    if Instant::now() >= deadline {
                        let _ = child.kill();
                        let _ = child.wait();
                        return Err(RuntimeError::TimedOut {
                            seconds: timeout.as_secs(),
                        });
                    }
                    std::thread::sleep(POLL_INTERVAL);
                }
                Err(e) => {
                    return Err(RuntimeError::Io {
                        message: format!("failed to wait for '{}': {e}", self.binary),
                    });
                }
            }
        };

        let stdout = join_reader(stdout_handle);
        let stderr = join_reader(stderr_handle);
        let status = status.code().unwrap_or(-1);

        debug!(binary = %self.binary, status, "runtime call finished");
        Ok(CapturedOutput {
            stdout,
            stderr,
            status,
        })
    }
}

impl Default for DockerComposeRuntime {
    fn default() -> Self {
        Self::new()
    }
}

fn spawn_reader<R: Read + Send + 'static>(mut reader: R) -> std::thread::JoinHandle<String> {
    std::thread::spawn(move || {
        let mut buf = String::new();
        let _ = reader.read_to_string(&mut buf);
        buf
    })
}

fn join_reader(handle: Option<std::thread::JoinHandle<String>>) -> String {
    handle
        .and_then(|h| h.join().ok())
        .unwrap_or_default()
}

/// One line of `docker compose ps --format json` output.
#[derive(Debug, Deserialize)]
struct PsEntry {
    #[serde(rename = "Service")]
    service: String,
    #[serde(rename = "State")]
    state: String,
}

/// Parse `ps` output. Newer compose emits one JSON object per line, older
/// versions a single JSON array; both are accepted.
fn parse_ps_output(stdout: &str) -> Vec<PsEntry> {
    let trimmed = stdout.trim();
    if trimmed.is_empty() {
        return Vec::new();
    }
    if trimmed.starts_with('[') {
        return serde_json::from_str(trimmed).unwrap_or_default();
    }
    trimmed
        .lines()
        .filter_map(|line| serde_json::from_str(line).ok())
        .collect()
}

impl ContainerRuntime for DockerComposeRuntime {
    fn up(
        &self,
        stack: &StackRef,
        service: &str,
        timeout: Duration,
    ) -> Result<CapturedOutput, RuntimeError> {
        let mut args = Self::compose_args(stack);
        args.extend(["up".into(), "-d".into(), service.into()]);
        self.invoke(&args, timeout)
    }

    fn stop(
        &self,
        stack: &StackRef,
        service: &str,
        timeout: Duration,
    ) -> Result<CapturedOutput, RuntimeError> {
        let mut args = Self::compose_args(stack);
        args.extend(["stop".into(), service.into()]);
        self.invoke(&args, timeout)
    }

    fn states(
        &self,
        stack: &StackRef,
        timeout: Duration,
    ) -> Result<BTreeMap<String, ServiceState>, RuntimeError> {
        let mut args = Self::compose_args(stack);
        args.extend(["ps".into(), "--all".into(), "--format".into(), "json".into()]);
        let out = self.invoke(&args, timeout)?;
        if !out.success() {
            return Err(RuntimeError::Io {
                message: format!("'{} compose ps' failed: {}", self.binary, out.stderr.trim()),
            });
        }

        Ok(parse_ps_output(&out.stdout)
            .into_iter()
            .map(|entry| (entry.service, ServiceState::from_runtime_label(&entry.state)))
            .collect())
    }

    fn exec_capture(
        &self,
        stack: &StackRef,
        service: &str,
        command: &[String],
        timeout: Duration,
    ) -> Result<CapturedOutput, RuntimeError> {
        let mut args = Self::compose_args(stack);
        args.extend(["exec".into(), "-T".into(), service.into()]);
        args.extend(command.iter().cloned());
        self.invoke(&args, timeout)
    }

    fn copy_from(
        &self,
        stack: &StackRef,
        service: &str,
        container_path: &str,
        host_path: &Path,
        timeout: Duration,
    ) -> Result<CapturedOutput, RuntimeError> {
        let mut args = Self::compose_args(stack);
        args.extend([
            "cp".into(),
            format!("{service}:{container_path}"),
            host_path.to_string_lossy().into_owned(),
        ]);
        self.invoke(&args, timeout)
    }

    fn copy_into(
        &self,
        stack: &StackRef,
        service: &str,
        host_path: &Path,
        container_path: &str,
        timeout: Duration,
    ) -> Result<CapturedOutput, RuntimeError> {
        let mut args = Self::compose_args(stack);
        args.extend([
            "cp".into(),
            host_path.to_string_lossy().into_owned(),
            format!("{service}:{container_path}"),
        ]);
        self.invoke(&args, timeout)
    }

    fn logs(
        &self,
        stack: &StackRef,
        service: &str,
        tail: u32,
        timeout: Duration,
    ) -> Result<CapturedOutput, RuntimeError> {
        let mut args = Self::compose_args(stack);
        args.extend([
            "logs".into(),
            "--no-color".into(),
            "--tail".into(),
            tail.to_string(),
            service.into(),
        ]);
        self.invoke(&args, timeout)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn missing_binary_is_reported_unavailable() {
        let runtime = DockerComposeRuntime::with_binary("devstack-no-such-binary");
        let err = runtime
            .invoke(&args(&["ps"]), Duration::from_secs(1))
            .unwrap_err();
        assert!(matches!(err, RuntimeError::Unavailable { .. }));
    }

    #[cfg(unix)]
    #[test]
    fn invoke_captures_stdout_and_status() {
        let runtime = DockerComposeRuntime::with_binary("echo");
        let out = runtime
            .invoke(&args(&["hello"]), Duration::from_secs(5))
            .unwrap();
        assert!(out.success());
        assert_eq!(out.stdout.trim(), "hello");
    }

    #[cfg(unix)]
    #[test]
    fn slow_invocation_times_out_instead_of_hanging() {
        let runtime = DockerComposeRuntime::with_binary("sleep");
        let started = Instant::now();
        let err = runtime
            .invoke(&args(&["30"]), Duration::from_millis(200))
            .unwrap_err();
        assert!(matches!(err, RuntimeError::TimedOut { .. }));
        assert!(started.elapsed() < Duration::from_secs(5));
    }

    #[test]
    fn compose_args_address_the_stack() {
        let stack = StackRef {
            project: "myproj".into(),
            manifest_path: "compose.generated.yaml".into(),
        };
        let prefix = DockerComposeRuntime::compose_args(&stack);
        assert_eq!(
            prefix,
            args(&["compose", "-f", "compose.generated.yaml", "-p", "myproj"])
        );
    }

    #[test]
    fn ps_json_lines_parse() {
        let out = "{\"Service\":\"redis\",\"State\":\"running\"}\n{\"Service\":\"postgres\",\"State\":\"exited\"}\n";
        let entries = parse_ps_output(out);
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].service, "redis");
        assert_eq!(
            ServiceState::from_runtime_label(&entries[1].state),
            ServiceState::Stopped
        );
    }

    #[test]
    fn ps_json_array_parses() {
        let out = "[{\"Service\":\"redis\",\"State\":\"running\"}]";
        assert_eq!(parse_ps_output(out).len(), 1);
    }

    #[test]
    fn empty_ps_output_means_no_containers() {
        assert!(parse_ps_output("").is_empty());
        assert!(parse_ps_output("  \n").is_empty());
    }
}
