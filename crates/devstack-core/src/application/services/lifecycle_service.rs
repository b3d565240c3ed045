//! Lifecycle Service - drives the generated stack through the runtime.
//!
//! Operates strictly on the services named by the last-generated manifest:
//! the manifest is the source of truth for *what exists*, the runtime for
//! *what state it is in*. The service selects commands and orchestrates
//! invocation, timeout, and result capture; all database-specific work is
//! delegated to tools inside the containers.
//!
//! Batch operations (start/stop/logs) report one outcome per service and
//! never abort the batch because one service failed.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use tracing::{debug, info, instrument};

use crate::{
    application::{
        error::{ApplicationError, RuntimeError},
        ports::{CapturedOutput, ContainerRuntime, FileMode, Filesystem, StackRef},
    },
    domain::{ServiceCatalog, ServiceKind, ServiceState},
    error::{DevstackError, DevstackResult},
};

// ── Stack context ────────────────────────────────────────────────────────────

/// One service as read back from the generated manifest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestService {
    pub name: String,
    /// Container environment of the manifest entry; credentials for backup
    /// commands are read from here, never re-derived from configuration.
    pub environment: BTreeMap<String, String>,
}

/// The last-generated stack: where it lives and what it contains.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StackContext {
    pub stack: StackRef,
    pub services: Vec<ManifestService>,
}

impl StackContext {
    pub fn service(&self, name: &str) -> Option<&ManifestService> {
        self.services.iter().find(|s| s.name == name)
    }

    pub fn names(&self) -> Vec<String> {
        self.services.iter().map(|s| s.name.clone()).collect()
    }
}

// ── Reports ──────────────────────────────────────────────────────────────────

/// Per-service outcome of a batch lifecycle operation.
#[derive(Debug)]
pub struct OperationReport {
    pub service: String,
    pub outcome: Result<String, ApplicationError>,
}

impl OperationReport {
    pub fn is_ok(&self) -> bool {
        self.outcome.is_ok()
    }
}

/// Read-only projection of one service's runtime state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceStatus {
    pub name: String,
    pub state: ServiceState,
}

// ── LifecycleService ─────────────────────────────────────────────────────────

/// Drives start/stop/status/logs/backup/restore for one stack.
pub struct LifecycleService {
    runtime: Box<dyn ContainerRuntime>,
    filesystem: Box<dyn Filesystem>,
    catalog: ServiceCatalog,
    context: StackContext,
    timeout: Duration,
}

impl LifecycleService {
    pub fn new(
        runtime: Box<dyn ContainerRuntime>,
        filesystem: Box<dyn Filesystem>,
        catalog: ServiceCatalog,
        context: StackContext,
        timeout: Duration,
    ) -> Self {
        Self {
            runtime,
            filesystem,
            catalog,
            context,
            timeout,
        }
    }

    // ── Batch operations ──────────────────────────────────────────────────

    /// Start the requested services, or every manifest service when the
    /// request is empty.
    #[instrument(skip_all)]
    pub fn start(&self, requested: &[String]) -> DevstackResult<Vec<OperationReport>> {
        let states = self.observed_states();
        let reports = self
            .targets(requested)
            .into_iter()
            .map(|service| {
                let outcome = self.start_one(&service, &states);
                OperationReport { service, outcome }
            })
            .collect();
        Ok(reports)
    }

    /// Stop the requested services, or every manifest service.
    #[instrument(skip_all)]
    pub fn stop(&self, requested: &[String]) -> DevstackResult<Vec<OperationReport>> {
        let states = self.observed_states();
        let reports = self
            .targets(requested)
            .into_iter()
            .map(|service| {
                let outcome = self.stop_one(&service, &states);
                OperationReport { service, outcome }
            })
            .collect();
        Ok(reports)
    }

    /// Read-only state projection for every manifest service, manifest order.
    /// Never mutates runtime state.
    pub fn status(&self) -> DevstackResult<Vec<ServiceStatus>> {
        let states = self
            .observed_states()
            .map_err(ApplicationError::from)
            .map_err(DevstackError::from)?;

        Ok(self
            .context
            .services
            .iter()
            .map(|s| ServiceStatus {
                name: s.name.clone(),
                state: states
                    .get(&s.name)
                    .copied()
                    .unwrap_or(ServiceState::Undefined),
            })
            .collect())
    }

    /// Trailing log lines per requested service.
    #[instrument(skip_all)]
    pub fn logs(&self, requested: &[String], tail: u32) -> DevstackResult<Vec<OperationReport>> {
        let reports = self
            .targets(requested)
            .into_iter()
            .map(|service| {
                let outcome = self.logs_one(&service, tail);
                OperationReport { service, outcome }
            })
            .collect();
        Ok(reports)
    }

    // ── Backup / restore ──────────────────────────────────────────────────

    /// Produce a backup artifact for one service at `artifact`.
    ///
    /// Requires a backup-capable kind and a running service; command
    /// selection per kind, execution inside the container.
    #[instrument(skip_all, fields(service = service))]
    pub fn backup(&self, service: &str, artifact: &Path) -> DevstackResult<PathBuf> {
        self.require_member(service)?;
        let kind = self.kind_of(service);
        if !kind.supports_backup() {
            return Err(ApplicationError::BackupNotSupported {
                service: service.into(),
                kind: kind.to_string(),
            }
            .into());
        }
        self.require_running(service)?;

        match kind {
            ServiceKind::Postgres => {
                let user = self.manifest_env(service, "POSTGRES_USER", "postgres");
                let db = self.manifest_env(service, "POSTGRES_DB", &user);
                self.dump_via_stdout(
                    service,
                    vec!["pg_dump".into(), "-U".into(), user, db],
                    artifact,
                )?;
            }
            ServiceKind::Mysql => {
                let user = self.manifest_env(service, "MYSQL_USER", "root");
                let password = self.manifest_env(service, "MYSQL_PASSWORD", "");
                let db = self.manifest_env(service, "MYSQL_DATABASE", "mysql");
                self.dump_via_stdout(
                    service,
                    vec![
                        "mysqldump".into(),
                        "-u".into(),
                        user,
                        format!("--password={password}"),
                        db,
                    ],
                    artifact,
                )?;
            }
            ServiceKind::Redis => {
                // SAVE is synchronous, so the snapshot is complete before the
                // copy starts.
                self.dump_via_copy(
                    service,
                    vec!["redis-cli".into(), "SAVE".into()],
                    "/data/dump.rdb",
                    artifact,
                )?;
            }
            ServiceKind::Mongodb => {
                self.dump_via_copy(
                    service,
                    vec![
                        "mongodump".into(),
                        "--archive=/tmp/devstack-backup.archive".into(),
                        "--quiet".into(),
                    ],
                    "/tmp/devstack-backup.archive",
                    artifact,
                )?;
            }
            ServiceKind::Generic => unreachable!("capability checked above"),
        }

        info!(service, artifact = %artifact.display(), "backup completed");
        Ok(artifact.to_path_buf())
    }

    /// Restore one service from an artifact.
    ///
    /// Fails fast before touching the runtime: the artifact must exist and
    /// be non-empty, the target must be running.
    #[instrument(skip_all, fields(service = service))]
    pub fn restore(&self, service: &str, artifact: &Path) -> DevstackResult<String> {
        self.require_member(service)?;
        let kind = self.kind_of(service);
        if !kind.supports_backup() {
            return Err(ApplicationError::BackupNotSupported {
                service: service.into(),
                kind: kind.to_string(),
            }
            .into());
        }
        if !self.filesystem.exists(artifact) {
            return Err(ApplicationError::ArtifactMissing {
                path: artifact.to_path_buf(),
            }
            .into());
        }
        if self.filesystem.file_size(artifact)? == 0 {
            return Err(ApplicationError::ArtifactEmpty {
                path: artifact.to_path_buf(),
            }
            .into());
        }
        self.require_running(service)?;

        let message = match kind {
            ServiceKind::Postgres => {
                let user = self.manifest_env(service, "POSTGRES_USER", "postgres");
                let db = self.manifest_env(service, "POSTGRES_DB", &user);
                self.load_via_copy(
                    service,
                    artifact,
                    "/tmp/devstack-restore.sql",
                    vec![
                        "psql".into(),
                        "-U".into(),
                        user,
                        "-d".into(),
                        db,
                        "-f".into(),
                        "/tmp/devstack-restore.sql".into(),
                    ],
                )?;
                "restore completed".to_string()
            }
            ServiceKind::Mysql => {
                let user = self.manifest_env(service, "MYSQL_USER", "root");
                let password = self.manifest_env(service, "MYSQL_PASSWORD", "");
                let db = self.manifest_env(service, "MYSQL_DATABASE", "mysql");
                self.load_via_copy(
                    service,
                    artifact,
                    "/tmp/devstack-restore.sql",
                    vec![
                        "sh".into(),
                        "-c".into(),
                        format!(
                            "mysql -u{user} --password={password} {db} < /tmp/devstack-restore.sql"
                        ),
                    ],
                )?;
                "restore completed".to_string()
            }
            ServiceKind::Redis => {
                // The snapshot only becomes visible after a restart; staging
                // it is all the runtime allows without killing the container.
                let out = self.runtime.copy_into(
                    &self.context.stack,
                    service,
                    artifact,
                    "/data/dump.rdb",
                    self.timeout,
                )?;
                Self::ensure_success(service, &out)?;
                "snapshot staged; restart the service to load it".to_string()
            }
            ServiceKind::Mongodb => {
                self.load_via_copy(
                    service,
                    artifact,
                    "/tmp/devstack-restore.archive",
                    vec![
                        "mongorestore".into(),
                        "--archive=/tmp/devstack-restore.archive".into(),
                        "--drop".into(),
                    ],
                )?;
                "restore completed".to_string()
            }
            ServiceKind::Generic => unreachable!("capability checked above"),
        };

        info!(service, artifact = %artifact.display(), "restore completed");
        Ok(message)
    }

    // ── Per-service steps ─────────────────────────────────────────────────

    fn start_one(
        &self,
        service: &str,
        states: &Result<BTreeMap<String, ServiceState>, RuntimeError>,
    ) -> Result<String, ApplicationError> {
        self.member(service)?;
        let state = Self::state_of(service, states)?;

        if state.is_running() {
            return Ok("already running".into());
        }
        if state == ServiceState::Failed {
            return Err(ApplicationError::FailedServiceNeedsStop {
                service: service.into(),
            });
        }
        if !state.may_start() {
            return Err(ApplicationError::InvalidTransition {
                service: service.into(),
                operation: "start",
                state,
            });
        }

        debug!(service, from = %state, "starting");
        let out = self.runtime.up(&self.context.stack, service, self.timeout)?;
        Self::ensure_success(service, &out)?;
        Ok("started".into())
    }

    fn stop_one(
        &self,
        service: &str,
        states: &Result<BTreeMap<String, ServiceState>, RuntimeError>,
    ) -> Result<String, ApplicationError> {
        self.member(service)?;
        let state = Self::state_of(service, states)?;

        if matches!(state, ServiceState::Stopped | ServiceState::Undefined) {
            return Ok("already stopped".into());
        }
        if !state.may_stop() {
            return Err(ApplicationError::InvalidTransition {
                service: service.into(),
                operation: "stop",
                state,
            });
        }

        debug!(service, from = %state, "stopping");
        let out = self
            .runtime
            .stop(&self.context.stack, service, self.timeout)?;
        Self::ensure_success(service, &out)?;
        Ok("stopped".into())
    }

    fn logs_one(&self, service: &str, tail: u32) -> Result<String, ApplicationError> {
        self.member(service)?;
        let out = self
            .runtime
            .logs(&self.context.stack, service, tail, self.timeout)?;
        Self::ensure_success(service, &out)?;
        Ok(out.stdout)
    }

    // ── Helpers ───────────────────────────────────────────────────────────

    /// Requested services, or every manifest service when empty.
    fn targets(&self, requested: &[String]) -> Vec<String> {
        if requested.is_empty() {
            self.context.names()
        } else {
            requested.to_vec()
        }
    }

    fn member(&self, service: &str) -> Result<(), ApplicationError> {
        if self.context.service(service).is_some() {
            Ok(())
        } else {
            Err(ApplicationError::UnknownService {
                service: service.into(),
            })
        }
    }

    fn require_member(&self, service: &str) -> DevstackResult<()> {
        self.member(service).map_err(DevstackError::from)
    }

    fn require_running(&self, service: &str) -> DevstackResult<()> {
        let states = self.observed_states();
        let state = Self::state_of(service, &states)?;
        if state.is_running() {
            Ok(())
        } else {
            Err(ApplicationError::ServiceNotRunning {
                service: service.into(),
            }
            .into())
        }
    }

    fn observed_states(&self) -> Result<BTreeMap<String, ServiceState>, RuntimeError> {
        self.runtime.states(&self.context.stack, self.timeout)
    }

    fn state_of(
        service: &str,
        states: &Result<BTreeMap<String, ServiceState>, RuntimeError>,
    ) -> Result<ServiceState, ApplicationError> {
        match states {
            Ok(map) => Ok(map
                .get(service)
                .copied()
                .unwrap_or(ServiceState::Undefined)),
            // One unavailable runtime fails every service of the batch, but
            // each service still gets its own report.
            Err(e) => Err(ApplicationError::from(e.clone())),
        }
    }

    fn kind_of(&self, service: &str) -> ServiceKind {
        self.catalog
            .get(service)
            .map(|d| d.kind)
            .unwrap_or(ServiceKind::Generic)
    }

    fn manifest_env(&self, service: &str, key: &str, default: &str) -> String {
        self.context
            .service(service)
            .and_then(|s| s.environment.get(key))
            .cloned()
            .unwrap_or_else(|| default.to_string())
    }

    fn ensure_success(service: &str, out: &CapturedOutput) -> Result<(), ApplicationError> {
        if out.success() {
            Ok(())
        } else {
            Err(ApplicationError::CommandFailed {
                service: service.into(),
                status: out.status,
                stderr: out.stderr.trim().to_string(),
            })
        }
    }

    /// Run a dump command and write its stdout as the artifact.
    fn dump_via_stdout(
        &self,
        service: &str,
        command: Vec<String>,
        artifact: &Path,
    ) -> DevstackResult<()> {
        let out = self
            .runtime
            .exec_capture(&self.context.stack, service, &command, self.timeout)?;
        Self::ensure_success(service, &out)?;
        self.filesystem
            .write_atomic(artifact, &out.stdout, FileMode::Standard)
    }

    /// Run a prepare command, then copy the produced file out as the artifact.
    fn dump_via_copy(
        &self,
        service: &str,
        prepare: Vec<String>,
        container_path: &str,
        artifact: &Path,
    ) -> DevstackResult<()> {
        let out = self
            .runtime
            .exec_capture(&self.context.stack, service, &prepare, self.timeout)?;
        Self::ensure_success(service, &out)?;
        let out = self.runtime.copy_from(
            &self.context.stack,
            service,
            container_path,
            artifact,
            self.timeout,
        )?;
        Self::ensure_success(service, &out)?;
        Ok(())
    }

    /// Copy the artifact into the container, then run the load command.
    fn load_via_copy(
        &self,
        service: &str,
        artifact: &Path,
        container_path: &str,
        load: Vec<String>,
    ) -> DevstackResult<()> {
        let out = self.runtime.copy_into(
            &self.context.stack,
            service,
            artifact,
            container_path,
            self.timeout,
        )?;
        Self::ensure_success(service, &out)?;
        let out = self
            .runtime
            .exec_capture(&self.context.stack, service, &load, self.timeout)?;
        Self::ensure_success(service, &out)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::catalog::{ServiceDefinition, ServiceDocs};
    use std::sync::{Arc, Mutex};

    // ── Fakes ─────────────────────────────────────────────────────────────

    /// Scriptable runtime fake: a state table plus a call recorder.
    #[derive(Default)]
    struct FakeRuntime {
        states: Mutex<BTreeMap<String, ServiceState>>,
        calls: Mutex<Vec<String>>,
        unavailable: bool,
        exec_stdout: String,
    }

    impl FakeRuntime {
        fn with_state(self, service: &str, state: ServiceState) -> Self {
            self.states.lock().unwrap().insert(service.into(), state);
            self
        }

        fn record(&self, call: String) {
            self.calls.lock().unwrap().push(call);
        }

        fn ok(&self) -> CapturedOutput {
            CapturedOutput {
                stdout: self.exec_stdout.clone(),
                stderr: String::new(),
                status: 0,
            }
        }
    }

    impl ContainerRuntime for Arc<FakeRuntime> {
        fn up(
            &self,
            _stack: &StackRef,
            service: &str,
            _timeout: Duration,
        ) -> Result<CapturedOutput, RuntimeError> {
            self.record(format!("up {service}"));
            self.states
                .lock()
                .unwrap()
                .insert(service.into(), ServiceState::Running);
            Ok(self.ok())
        }

        fn stop(
            &self,
            _stack: &StackRef,
            service: &str,
            _timeout: Duration,
        ) -> Result<CapturedOutput, RuntimeError> {
            self.record(format!("stop {service}"));
            self.states
                .lock()
                .unwrap()
                .insert(service.into(), ServiceState::Stopped);
            Ok(self.ok())
        }

        fn states(
            &self,
            _stack: &StackRef,
            _timeout: Duration,
        ) -> Result<BTreeMap<String, ServiceState>, RuntimeError> {
            if self.unavailable {
                return Err(RuntimeError::Unavailable {
                    message: "docker not found".into(),
                });
            }
            Ok(self.states.lock().unwrap().clone())
        }

        fn exec_capture(
            &self,
            _stack: &StackRef,
            service: &str,
            command: &[String],
            _timeout: Duration,
        ) -> Result<CapturedOutput, RuntimeError> {
            self.record(format!("exec {service} {}", command.join(" ")));
            Ok(self.ok())
        }

        fn copy_from(
            &self,
            _stack: &StackRef,
            service: &str,
            container_path: &str,
            host_path: &Path,
            _timeout: Duration,
        ) -> Result<CapturedOutput, RuntimeError> {
            self.record(format!(
                "copy-from {service} {container_path} {}",
                host_path.display()
            ));
            Ok(self.ok())
        }

        fn copy_into(
            &self,
            _stack: &StackRef,
            service: &str,
            host_path: &Path,
            container_path: &str,
            _timeout: Duration,
        ) -> Result<CapturedOutput, RuntimeError> {
            self.record(format!(
                "copy-into {service} {} {container_path}",
                host_path.display()
            ));
            Ok(self.ok())
        }

        fn logs(
            &self,
            _stack: &StackRef,
            service: &str,
            tail: u32,
            _timeout: Duration,
        ) -> Result<CapturedOutput, RuntimeError> {
            self.record(format!("logs {service} {tail}"));
            Ok(CapturedOutput {
                stdout: format!("{service} log line"),
                stderr: String::new(),
                status: 0,
            })
        }
    }

    /// In-memory filesystem fake.
    #[derive(Default)]
    struct FakeFilesystem {
        files: Mutex<BTreeMap<PathBuf, String>>,
    }

    impl Filesystem for Arc<FakeFilesystem> {
        fn create_dir_all(&self, _path: &Path) -> DevstackResult<()> {
            Ok(())
        }
        fn write_atomic(&self, path: &Path, content: &str, _mode: FileMode) -> DevstackResult<()> {
            self.files
                .lock()
                .unwrap()
                .insert(path.to_path_buf(), content.to_string());
            Ok(())
        }
        fn read_to_string(&self, path: &Path) -> DevstackResult<String> {
            self.files
                .lock()
                .unwrap()
                .get(path)
                .cloned()
                .ok_or_else(|| DevstackError::Internal {
                    message: format!("no such file: {}", path.display()),
                })
        }
        fn exists(&self, path: &Path) -> bool {
            self.files.lock().unwrap().contains_key(path)
        }
        fn file_size(&self, path: &Path) -> DevstackResult<u64> {
            self.read_to_string(path).map(|c| c.len() as u64)
        }
    }

    // ── Fixtures ──────────────────────────────────────────────────────────

    fn catalog() -> ServiceCatalog {
        let def = |name: &str, kind: ServiceKind| ServiceDefinition {
            name: name.into(),
            kind,
            image: format!("{name}:latest"),
            ports: vec![],
            volumes: vec![],
            env: vec![],
            options: vec![],
            docs: ServiceDocs::default(),
        };
        ServiceCatalog::new(vec![
            def("postgres", ServiceKind::Postgres),
            def("redis", ServiceKind::Redis),
            def("kafka", ServiceKind::Generic),
        ])
        .unwrap()
    }

    fn context() -> StackContext {
        let mut pg_env = BTreeMap::new();
        pg_env.insert("POSTGRES_USER".to_string(), "app".to_string());
        pg_env.insert("POSTGRES_DB".to_string(), "app_db".to_string());

        StackContext {
            stack: StackRef {
                project: "devstack".into(),
                manifest_path: "compose.generated.yaml".into(),
            },
            services: vec![
                ManifestService {
                    name: "postgres".into(),
                    environment: pg_env,
                },
                ManifestService {
                    name: "redis".into(),
                    environment: BTreeMap::new(),
                },
                ManifestService {
                    name: "kafka".into(),
                    environment: BTreeMap::new(),
                },
            ],
        }
    }

    fn lifecycle(
        runtime: Arc<FakeRuntime>,
        filesystem: Arc<FakeFilesystem>,
    ) -> LifecycleService {
        LifecycleService::new(
            Box::new(runtime),
            Box::new(filesystem),
            catalog(),
            context(),
            Duration::from_secs(5),
        )
    }

    // ── start / stop ──────────────────────────────────────────────────────

    #[test]
    fn start_unknown_service_is_a_distinct_outcome() {
        let rt = Arc::new(FakeRuntime::default());
        let service = lifecycle(rt, Arc::new(FakeFilesystem::default()));

        let reports = service.start(&["ghost".to_string()]).unwrap();
        assert_eq!(reports.len(), 1);
        assert!(matches!(
            reports[0].outcome,
            Err(ApplicationError::UnknownService { .. })
        ));
    }

    #[test]
    fn start_batch_continues_past_failures() {
        let rt = Arc::new(FakeRuntime::default());
        let service = lifecycle(rt.clone(), Arc::new(FakeFilesystem::default()));

        let reports = service
            .start(&["ghost".to_string(), "redis".to_string()])
            .unwrap();
        assert!(!reports[0].is_ok());
        assert!(reports[1].is_ok());
        assert_eq!(rt.calls.lock().unwrap().as_slice(), ["up redis"]);
    }

    #[test]
    fn start_failed_service_requires_stop_first() {
        let rt = Arc::new(FakeRuntime::default().with_state("redis", ServiceState::Failed));
        let service = lifecycle(rt.clone(), Arc::new(FakeFilesystem::default()));

        let reports = service.start(&["redis".to_string()]).unwrap();
        assert!(matches!(
            reports[0].outcome,
            Err(ApplicationError::FailedServiceNeedsStop { .. })
        ));
        assert!(rt.calls.lock().unwrap().is_empty(), "no start attempted");
    }

    #[test]
    fn start_running_service_is_a_noop() {
        let rt = Arc::new(FakeRuntime::default().with_state("redis", ServiceState::Running));
        let service = lifecycle(rt.clone(), Arc::new(FakeFilesystem::default()));

        let reports = service.start(&["redis".to_string()]).unwrap();
        assert_eq!(reports[0].outcome.as_deref().unwrap(), "already running");
        assert!(rt.calls.lock().unwrap().is_empty());
    }

    #[test]
    fn stop_then_start_recovers_a_failed_service() {
        let rt = Arc::new(FakeRuntime::default().with_state("redis", ServiceState::Failed));
        let service = lifecycle(rt.clone(), Arc::new(FakeFilesystem::default()));

        let stop = service.stop(&["redis".to_string()]).unwrap();
        assert!(stop[0].is_ok());
        let start = service.start(&["redis".to_string()]).unwrap();
        assert!(start[0].is_ok());
    }

    #[test]
    fn empty_request_targets_every_manifest_service() {
        let rt = Arc::new(FakeRuntime::default());
        let service = lifecycle(rt.clone(), Arc::new(FakeFilesystem::default()));

        let reports = service.start(&[]).unwrap();
        let names: Vec<_> = reports.iter().map(|r| r.service.as_str()).collect();
        assert_eq!(names, vec!["postgres", "redis", "kafka"]);
    }

    #[test]
    fn unavailable_runtime_is_reported_per_service() {
        let rt = Arc::new(FakeRuntime {
            unavailable: true,
            ..Default::default()
        });
        let service = lifecycle(rt, Arc::new(FakeFilesystem::default()));

        let reports = service.start(&[]).unwrap();
        assert_eq!(reports.len(), 3);
        for report in &reports {
            assert!(matches!(
                report.outcome,
                Err(ApplicationError::Runtime {
                    source: RuntimeError::Unavailable { .. }
                })
            ));
        }
    }

    // ── status ────────────────────────────────────────────────────────────

    #[test]
    fn status_projects_manifest_order_with_undefined_default() {
        let rt = Arc::new(FakeRuntime::default().with_state("redis", ServiceState::Running));
        let service = lifecycle(rt.clone(), Arc::new(FakeFilesystem::default()));

        let statuses = service.status().unwrap();
        assert_eq!(statuses[0].name, "postgres");
        assert_eq!(statuses[0].state, ServiceState::Undefined);
        assert_eq!(statuses[1].state, ServiceState::Running);
        // status never mutates: no up/stop/exec calls recorded.
        assert!(rt.calls.lock().unwrap().is_empty());
    }

    // ── backup ────────────────────────────────────────────────────────────

    #[test]
    fn backup_of_stopped_service_fails_with_not_running() {
        let rt = Arc::new(FakeRuntime::default().with_state("postgres", ServiceState::Stopped));
        let service = lifecycle(rt, Arc::new(FakeFilesystem::default()));

        let err = service
            .backup("postgres", Path::new("backups/pg.sql"))
            .unwrap_err();
        assert!(err.to_string().contains("not running"));
    }

    #[test]
    fn backup_of_generic_kind_is_refused() {
        let rt = Arc::new(FakeRuntime::default().with_state("kafka", ServiceState::Running));
        let service = lifecycle(rt, Arc::new(FakeFilesystem::default()));

        let err = service
            .backup("kafka", Path::new("backups/kafka.bak"))
            .unwrap_err();
        assert!(err.to_string().contains("does not support backup"));
    }

    #[test]
    fn backup_of_unknown_service_is_refused() {
        let rt = Arc::new(FakeRuntime::default());
        let service = lifecycle(rt, Arc::new(FakeFilesystem::default()));

        let err = service.backup("ghost", Path::new("x.sql")).unwrap_err();
        assert!(err.to_string().contains("unknown service"));
    }

    #[test]
    fn postgres_backup_dumps_with_manifest_credentials() {
        let rt = Arc::new(FakeRuntime {
            exec_stdout: "-- dump".into(),
            ..Default::default()
        });
        rt.states
            .lock()
            .unwrap()
            .insert("postgres".into(), ServiceState::Running);
        let fs = Arc::new(FakeFilesystem::default());
        let service = lifecycle(rt.clone(), fs.clone());

        let artifact = service
            .backup("postgres", Path::new("backups/pg.sql"))
            .unwrap();
        assert_eq!(artifact, PathBuf::from("backups/pg.sql"));

        let calls = rt.calls.lock().unwrap();
        assert_eq!(calls.as_slice(), ["exec postgres pg_dump -U app app_db"]);
        assert_eq!(
            fs.files.lock().unwrap().get(Path::new("backups/pg.sql")).unwrap(),
            "-- dump"
        );
    }

    #[test]
    fn redis_backup_saves_then_copies_the_snapshot() {
        let rt = Arc::new(FakeRuntime::default().with_state("redis", ServiceState::Running));
        let service = lifecycle(rt.clone(), Arc::new(FakeFilesystem::default()));

        service.backup("redis", Path::new("backups/r.rdb")).unwrap();
        let calls = rt.calls.lock().unwrap();
        assert_eq!(
            calls.as_slice(),
            [
                "exec redis redis-cli SAVE",
                "copy-from redis /data/dump.rdb backups/r.rdb"
            ]
        );
    }

    // ── restore ───────────────────────────────────────────────────────────

    #[test]
    fn restore_with_missing_artifact_fails_before_any_runtime_call() {
        let rt = Arc::new(FakeRuntime::default().with_state("postgres", ServiceState::Running));
        let service = lifecycle(rt.clone(), Arc::new(FakeFilesystem::default()));

        let err = service
            .restore("postgres", Path::new("missing.sql"))
            .unwrap_err();
        assert!(err.to_string().contains("not found"));
        assert!(rt.calls.lock().unwrap().is_empty());
    }

    #[test]
    fn restore_with_empty_artifact_fails_fast() {
        let rt = Arc::new(FakeRuntime::default().with_state("postgres", ServiceState::Running));
        let fs = Arc::new(FakeFilesystem::default());
        fs.files
            .lock()
            .unwrap()
            .insert("empty.sql".into(), String::new());
        let service = lifecycle(rt.clone(), fs);

        let err = service
            .restore("postgres", Path::new("empty.sql"))
            .unwrap_err();
        assert!(err.to_string().contains("empty"));
        assert!(rt.calls.lock().unwrap().is_empty());
    }

    #[test]
    fn restore_requires_a_running_target() {
        let rt = Arc::new(FakeRuntime::default());
        let fs = Arc::new(FakeFilesystem::default());
        fs.files
            .lock()
            .unwrap()
            .insert("pg.sql".into(), "-- dump".into());
        let service = lifecycle(rt, fs);

        let err = service.restore("postgres", Path::new("pg.sql")).unwrap_err();
        assert!(err.to_string().contains("not running"));
    }

    #[test]
    fn postgres_restore_copies_then_loads() {
        let rt = Arc::new(FakeRuntime::default().with_state("postgres", ServiceState::Running));
        let fs = Arc::new(FakeFilesystem::default());
        fs.files
            .lock()
            .unwrap()
            .insert("pg.sql".into(), "-- dump".into());
        let service = lifecycle(rt.clone(), fs);

        service.restore("postgres", Path::new("pg.sql")).unwrap();
        let calls = rt.calls.lock().unwrap();
        assert_eq!(
            calls.as_slice(),
            [
                "copy-into postgres pg.sql /tmp/devstack-restore.sql",
                "exec postgres psql -U app -d app_db -f /tmp/devstack-restore.sql"
            ]
        );
    }

    // ── logs ──────────────────────────────────────────────────────────────

    #[test]
    fn logs_report_per_service_output() {
        let rt = Arc::new(FakeRuntime::default());
        let service = lifecycle(rt, Arc::new(FakeFilesystem::default()));

        let reports = service.logs(&["redis".to_string()], 50).unwrap();
        assert_eq!(reports[0].outcome.as_deref().unwrap(), "redis log line");
    }
}
