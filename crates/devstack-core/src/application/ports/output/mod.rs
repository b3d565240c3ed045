//! Driven (output) ports - implemented by infrastructure.
//!
//! These traits define what the application needs from external systems.
//! The `devstack-adapters` crate provides implementations.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::application::error::RuntimeError;
use crate::domain::{ComposeDocument, ServiceState};
use crate::error::DevstackResult;

// ── Filesystem ───────────────────────────────────────────────────────────────

/// Permission class for a written artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileMode {
    /// Regular file permissions.
    Standard,
    /// Owner-only (0600): the file may carry credentials.
    Secret,
}

/// Port for filesystem operations.
///
/// Implemented by:
/// - `devstack_adapters::filesystem::LocalFilesystem` (production)
/// - `devstack_adapters::filesystem::MemoryFilesystem` (testing)
///
/// ## Design Notes
///
/// - `write_atomic` must be all-or-nothing: a reader never observes a
///   truncated file, and a failed write leaves any previous content intact.
pub trait Filesystem: Send + Sync {
    /// Create a directory and all parent directories.
    fn create_dir_all(&self, path: &Path) -> DevstackResult<()>;

    /// Write content to a file atomically, with the given permission class.
    fn write_atomic(&self, path: &Path, content: &str, mode: FileMode) -> DevstackResult<()>;

    /// Read a file to a string.
    fn read_to_string(&self, path: &Path) -> DevstackResult<String>;

    /// Check if path exists.
    fn exists(&self, path: &Path) -> bool;

    /// Size of a file in bytes.
    fn file_size(&self, path: &Path) -> DevstackResult<u64>;
}

// ── ManifestRenderer ─────────────────────────────────────────────────────────

/// Port for rendering the manifest IR to text.
///
/// Implemented by:
/// - `devstack_adapters::renderer::ComposeRenderer` (serde_yaml)
///
/// The contract is deterministic: the same document must render to the same
/// bytes, every time.
pub trait ManifestRenderer: Send + Sync {
    fn render(&self, document: &ComposeDocument) -> DevstackResult<String>;
}

// ── ContainerRuntime ─────────────────────────────────────────────────────────

/// Everything an invocation needs to address one stack.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StackRef {
    /// Project name, used to namespace containers and volumes.
    pub project: String,
    /// Path to the generated manifest the runtime should act on.
    pub manifest_path: PathBuf,
}

/// Captured result of one runtime invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CapturedOutput {
    pub stdout: String,
    pub stderr: String,
    pub status: i32,
}

impl CapturedOutput {
    pub fn success(&self) -> bool {
        self.status == 0
    }
}

/// Port for the container runtime collaborator.
///
/// Implemented by:
/// - `devstack_adapters::runtime::DockerComposeRuntime` (production)
/// - `devstack_adapters::runtime::ScriptedRuntime` (testing)
///
/// ## Design Notes
///
/// The contract is deliberately narrow — command, arguments, timeout,
/// captured stdout/stderr/exit code — so the lifecycle controller can be
/// tested against a fake without a real runtime present. Every method must
/// honor its timeout: implementations kill the invocation and return
/// [`RuntimeError::TimedOut`] rather than hang.
pub trait ContainerRuntime: Send + Sync {
    /// Start one service (detached).
    fn up(
        &self,
        stack: &StackRef,
        service: &str,
        timeout: Duration,
    ) -> Result<CapturedOutput, RuntimeError>;

    /// Stop one service.
    fn stop(
        &self,
        stack: &StackRef,
        service: &str,
        timeout: Duration,
    ) -> Result<CapturedOutput, RuntimeError>;

    /// Observed state of every service the runtime knows for this stack.
    /// Services without a container are simply absent from the map.
    fn states(
        &self,
        stack: &StackRef,
        timeout: Duration,
    ) -> Result<BTreeMap<String, ServiceState>, RuntimeError>;

    /// Run a command inside a running service container, capturing output.
    fn exec_capture(
        &self,
        stack: &StackRef,
        service: &str,
        command: &[String],
        timeout: Duration,
    ) -> Result<CapturedOutput, RuntimeError>;

    /// Copy a file out of a service container.
    fn copy_from(
        &self,
        stack: &StackRef,
        service: &str,
        container_path: &str,
        host_path: &Path,
        timeout: Duration,
    ) -> Result<CapturedOutput, RuntimeError>;

    /// Copy a file into a service container.
    fn copy_into(
        &self,
        stack: &StackRef,
        service: &str,
        host_path: &Path,
        container_path: &str,
        timeout: Duration,
    ) -> Result<CapturedOutput, RuntimeError>;

    /// Fetch the trailing log lines of one service.
    fn logs(
        &self,
        stack: &StackRef,
        service: &str,
        tail: u32,
        timeout: Duration,
    ) -> Result<CapturedOutput, RuntimeError>;
}
