use crate::config::APP_NAME;
use crate::core::language::ActiveLocale;
use crate::core::shell::Shell;
use crate::models::error::SError;
use crate::models::gate::{GateCheck, RESERVED_PORTS};
use crate::utils::lock::InstanceLock;
use crate::utils::process::ProcessChecker;
use camino::{Utf8Path, Utf8PathBuf};
use std::io::ErrorKind;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, TcpListener};
use std::path::PathBuf;
use sysinfo::System;
use tracing::{debug, error, info, instrument, warn};

pub const WEB_RUNTIME_DOWNLOAD_URL: &str = "https://go.microsoft.com/fwlink/p/?LinkId=2124703";

pub trait WebRuntimeProbe: Send + Sync {
    fn is_installed(&self) -> bool;
}

pub trait PortProbe: Send + Sync {
    fn is_listening(&self, port: u16) -> bool;
}

pub trait ProcessIdentity: Send + Sync {
    fn current_name(&self) -> Option<String>;
}

/// Looks for the embedded web runtime in its known install locations.
pub struct InstalledWebRuntime {
    candidates: Vec<PathBuf>,
}

impl InstalledWebRuntime {
    pub fn new(candidates: Vec<PathBuf>) -> Self {
        Self { candidates }
    }
}

impl Default for InstalledWebRuntime {
    #[cfg(target_os = "windows")]
    fn default() -> Self {
        let suffix = "Microsoft\\EdgeWebView\\Application";
        let candidates = ["ProgramFiles(x86)", "ProgramFiles", "LOCALAPPDATA"]
            .iter()
            .filter_map(|var| std::env::var(var).ok())
            .map(|root| PathBuf::from(root).join(suffix))
            .collect();
        Self::new(candidates)
    }

    #[cfg(target_os = "macos")]
    fn default() -> Self {
        Self::new(vec![PathBuf::from("/System/Library/Frameworks/WebKit.framework")])
    }

    #[cfg(not(any(target_os = "windows", target_os = "macos")))]
    fn default() -> Self {
        let candidates = [
            "/usr/lib/x86_64-linux-gnu/libwebkit2gtk-4.1.so.0",
            "/usr/lib/aarch64-linux-gnu/libwebkit2gtk-4.1.so.0",
            "/usr/lib64/libwebkit2gtk-4.1.so.0",
            "/usr/lib/libwebkit2gtk-4.1.so.0",
        ]
        .iter()
        .map(PathBuf::from)
        .collect();
        Self::new(candidates)
    }
}

impl WebRuntimeProbe for InstalledWebRuntime {
    fn is_installed(&self) -> bool {
        self.candidates.iter().any(|p| p.exists())
    }
}

/// Detects listeners by trying to bind the port ourselves on every IPv4 and
/// IPv6 address a listener could sit on.
pub struct TcpBindProbe;

const PROBE_ADDRS: [IpAddr; 4] = [
    IpAddr::V4(Ipv4Addr::UNSPECIFIED),
    IpAddr::V4(Ipv4Addr::LOCALHOST),
    IpAddr::V6(Ipv6Addr::UNSPECIFIED),
    IpAddr::V6(Ipv6Addr::LOCALHOST),
];

impl PortProbe for TcpBindProbe {
    fn is_listening(&self, port: u16) -> bool {
        PROBE_ADDRS
            .into_iter()
            .any(|ip| match TcpListener::bind((ip, port)) {
                Ok(_) => false,
                Err(e) if matches!(e.kind(), ErrorKind::AddrInUse | ErrorKind::PermissionDenied) => true,
                // no IPv6 stack, or the address is not configured here
                Err(e) if e.kind() == ErrorKind::AddrNotAvailable => false,
                Err(e) => {
                    debug!("Probe bind {ip}:{port} failed: {e}");
                    false
                }
            })
    }
}

pub struct SysinfoIdentity;

impl ProcessIdentity for SysinfoIdentity {
    fn current_name(&self) -> Option<String> {
        ProcessChecker::current_name(&mut System::new())
    }
}

/// Ordered preflight checks. The first failure is terminal.
pub struct EnvironmentGate {
    lock_path: Utf8PathBuf,
    runtime: Box<dyn WebRuntimeProbe>,
    ports: Box<dyn PortProbe>,
    reserved_ports: Vec<u16>,
    identity: Box<dyn ProcessIdentity>,
    /// `None` skips the host identity check (development builds).
    expected_host: Option<String>,
}

impl EnvironmentGate {
    pub fn new(lock_path: &Utf8Path) -> Self {
        Self {
            lock_path: lock_path.to_owned(),
            runtime: Box::new(InstalledWebRuntime::default()),
            ports: Box::new(TcpBindProbe),
            reserved_ports: RESERVED_PORTS.to_vec(),
            identity: Box::new(SysinfoIdentity),
            expected_host: (!cfg!(debug_assertions)).then(|| APP_NAME.to_string()),
        }
    }

    pub fn with_runtime_probe(mut self, probe: impl WebRuntimeProbe + 'static) -> Self {
        self.runtime = Box::new(probe);
        self
    }

    pub fn with_port_probe(mut self, probe: impl PortProbe + 'static) -> Self {
        self.ports = Box::new(probe);
        self
    }

    pub fn with_reserved_ports(mut self, ports: Vec<u16>) -> Self {
        self.reserved_ports = ports;
        self
    }

    pub fn with_identity(mut self, identity: impl ProcessIdentity + 'static) -> Self {
        self.identity = Box::new(identity);
        self
    }

    pub fn with_expected_host(mut self, host: Option<String>) -> Self {
        self.expected_host = host;
        self
    }

    /// Runs every check in order. On success the instance lock is returned and
    /// must be held until the process exits.
    #[instrument(skip_all)]
    pub fn run(&self, shell: &dyn Shell, locale: &ActiveLocale) -> Result<InstanceLock, SError> {
        let lock = self.check_single_instance(shell, locale)?;
        self.check_web_runtime(shell, locale)?;
        self.check_reserved_ports(shell, locale)?;
        self.check_host_identity(shell, locale)?;
        info!("Environment checks passed");
        Ok(lock)
    }

    fn check_single_instance(&self, shell: &dyn Shell, locale: &ActiveLocale) -> Result<InstanceLock, SError> {
        match InstanceLock::acquire(&self.lock_path) {
            Ok(Some(lock)) => Ok(lock),
            Ok(None) => {
                let message = locale.text("App.DuplicateWarn");
                warn!("{message}");
                shell.warn(APP_NAME, &message);
                Err(SError::GateFailed {
                    check: GateCheck::SingleInstance,
                    message,
                })
            }
            Err(e) => {
                error!("Could not create instance lock: {e}");
                shell.error(APP_NAME, &e.to_string());
                Err(SError::GateFailed {
                    check: GateCheck::SingleInstance,
                    message: e.to_string(),
                })
            }
        }
    }

    fn check_web_runtime(&self, shell: &dyn Shell, locale: &ActiveLocale) -> Result<(), SError> {
        info!("Checking web runtime");
        if self.runtime.is_installed() {
            info!("Web runtime found");
            return Ok(());
        }

        let message = locale.text("App.WebRuntimeNotFound");
        warn!("{message}");
        if shell.confirm(&locale.text("App.WebRuntimeTitle"), &message) {
            shell.open_link(WEB_RUNTIME_DOWNLOAD_URL);
        }
        Err(SError::GateFailed {
            check: GateCheck::WebRuntime,
            message,
        })
    }

    fn check_reserved_ports(&self, shell: &dyn Shell, locale: &ActiveLocale) -> Result<(), SError> {
        info!("Checking reserved TCP ports");
        match self.reserved_ports.iter().find(|&&port| self.ports.is_listening(port)) {
            Some(port) => {
                let message = locale.format("App.PortInUse", &[port]);
                error!("{message}");
                shell.error(&locale.text("App.PortCheckErrorTitle"), &message);
                Err(SError::GateFailed {
                    check: GateCheck::ReservedPorts,
                    message,
                })
            }
            None => {
                info!("Reserved ports are free");
                Ok(())
            }
        }
    }

    fn check_host_identity(&self, shell: &dyn Shell, locale: &ActiveLocale) -> Result<(), SError> {
        let Some(expected) = &self.expected_host else {
            debug!("Host identity check skipped");
            return Ok(());
        };

        let actual = self.identity.current_name();
        match actual.as_deref() {
            Some(name) if ProcessChecker::name_matches(name, expected) => Ok(()),
            _ => {
                let message = locale.text("App.ErrorFileName");
                error!("{message} (running as {actual:?})");
                shell.error(APP_NAME, &message);
                Err(SError::GateFailed {
                    check: GateCheck::HostIdentity,
                    message,
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::shell::{Notice, WindowKind};

    struct SilentShell;

    impl Shell for SilentShell {
        fn warn(&self, _: &str, _: &str) {}
        fn error(&self, _: &str, _: &str) {}
        fn confirm(&self, _: &str, _: &str) -> bool {
            false
        }
        fn open_link(&self, _: &str) {}
        fn show_window(&self, _: WindowKind) {}
        fn notify(&self, _: Notice) {}
        fn show_update_badge(&self, _: &str) {}
        fn shutdown(&self) {}
    }

    struct Runtime(bool);

    impl WebRuntimeProbe for Runtime {
        fn is_installed(&self) -> bool {
            self.0
        }
    }

    struct Ports(Vec<u16>);

    impl PortProbe for Ports {
        fn is_listening(&self, port: u16) -> bool {
            self.0.contains(&port)
        }
    }

    struct Named(&'static str);

    impl ProcessIdentity for Named {
        fn current_name(&self) -> Option<String> {
            Some(self.0.to_string())
        }
    }

    fn gate(tmp: &tempfile::TempDir) -> EnvironmentGate {
        let lock = Utf8PathBuf::from_path_buf(tmp.path().join("app.lock")).unwrap();
        EnvironmentGate::new(&lock)
            .with_runtime_probe(Runtime(true))
            .with_port_probe(Ports(vec![]))
            .with_identity(Named("EADesktop.exe"))
            .with_expected_host(Some(APP_NAME.into()))
    }

    fn failed_check(result: Result<InstanceLock, SError>) -> GateCheck {
        match result {
            Err(SError::GateFailed { check, .. }) => check,
            other => panic!("expected gate failure, got {other:?}"),
        }
    }

    #[test]
    fn passes_when_environment_is_clean() {
        let tmp = tempfile::tempdir().unwrap();
        let lock = gate(&tmp).run(&SilentShell, &ActiveLocale::default()).unwrap();
        assert!(lock.path().exists());
    }

    #[test]
    fn missing_runtime_fails_even_when_declined() {
        let tmp = tempfile::tempdir().unwrap();
        let gate = gate(&tmp).with_runtime_probe(Runtime(false));
        let check = failed_check(gate.run(&SilentShell, &ActiveLocale::default()));
        assert_eq!(check, GateCheck::WebRuntime);
    }

    #[test]
    fn each_reserved_port_is_fatal() {
        for port in RESERVED_PORTS {
            let tmp = tempfile::tempdir().unwrap();
            let gate = gate(&tmp).with_port_probe(Ports(vec![port]));
            let check = failed_check(gate.run(&SilentShell, &ActiveLocale::default()));
            assert_eq!(check, GateCheck::ReservedPorts);
        }
    }

    #[test]
    fn wrong_host_name_is_fatal_only_when_checked() {
        let tmp = tempfile::tempdir().unwrap();
        let strict = gate(&tmp).with_identity(Named("renamed.exe"));
        assert_eq!(
            failed_check(strict.run(&SilentShell, &ActiveLocale::default())),
            GateCheck::HostIdentity
        );

        let relaxed = gate(&tmp)
            .with_identity(Named("renamed.exe"))
            .with_expected_host(None);
        assert!(relaxed.run(&SilentShell, &ActiveLocale::default()).is_ok());
    }

    #[test]
    fn bind_probe_sees_a_live_listener() {
        let listener = TcpListener::bind((Ipv4Addr::LOCALHOST, 0)).unwrap();
        let port = listener.local_addr().unwrap().port();
        assert!(TcpBindProbe.is_listening(port));
    }

    #[test]
    fn bind_probe_sees_an_ipv6_only_listener() {
        // hosts without IPv6 loopback have nothing to detect
        let Ok(listener) = TcpListener::bind((Ipv6Addr::LOCALHOST, 0)) else {
            return;
        };
        let port = listener.local_addr().unwrap().port();
        assert!(TcpBindProbe.is_listening(port));
    }
}
