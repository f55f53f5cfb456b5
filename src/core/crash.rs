use crate::models::error::SError;
use crate::utils::host::HostInfo;
use camino::{Utf8Path, Utf8PathBuf};
use chrono::{DateTime, Local};
use std::backtrace::Backtrace;
use std::fmt::Write as _;
use std::fs::OpenOptions;
use std::future::Future;
use std::io::{ErrorKind, Write as _};
use std::panic::PanicHookInfo;
use std::sync::{Arc, OnceLock};
use std::thread::ThreadId;
use tokio::task::JoinHandle;
use tracing::{debug, error};

/// Where an uncaught fault surfaced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display)]
pub enum FaultContext {
    /// The thread that drives the UI, the one that installed the reporter.
    Foreground,
    Thread,
    /// A fire-and-forget task nobody awaits.
    BackgroundTask,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FaultKind {
    Panic,
    Error,
    /// Pending I/O torn down by thread exit or shutdown. Known false positive
    /// when it escapes a background task.
    IoAborted,
}

#[derive(Debug, Clone)]
pub struct Fault {
    pub kind: FaultKind,
    pub type_name: String,
    pub message: String,
    pub stack_trace: String,
}

impl Fault {
    pub fn from_error(err: &SError) -> Self {
        let kind = match err {
            SError::IOAborted(_) => FaultKind::IoAborted,
            _ => FaultKind::Error,
        };
        let variant: &'static str = err.into();
        Self {
            kind,
            type_name: format!("SError::{variant}"),
            message: err.to_string(),
            stack_trace: Backtrace::force_capture().to_string(),
        }
    }
}

/// What the reporter gets handed: a structured fault, or only a raw description.
#[derive(Debug, Clone)]
pub enum FaultInput {
    Structured(Fault),
    Raw(String),
}

pub struct CrashReporter {
    crash_dir: Utf8PathBuf,
    host: HostInfo,
}

static INSTALLED: OnceLock<Arc<CrashReporter>> = OnceLock::new();

impl CrashReporter {
    pub fn new(crash_dir: &Utf8Path, host: HostInfo) -> Self {
        Self {
            crash_dir: crash_dir.to_owned(),
            host,
        }
    }

    /// Registers the process-wide panic hook once. The calling thread becomes the
    /// foreground thread. Later calls return the first reporter unchanged.
    pub fn install(self) -> Arc<CrashReporter> {
        INSTALLED
            .get_or_init(|| {
                let reporter = Arc::new(self);
                let foreground = std::thread::current().id();
                let hook_reporter = reporter.clone();
                let default_hook = std::panic::take_hook();
                std::panic::set_hook(Box::new(move |info| {
                    let context = classify_thread(foreground);
                    hook_reporter.report_fault(context, panic_input(info));
                    default_hook(info);
                }));
                debug!("Crash reporter installed, log dir {}", reporter.crash_dir);
                reporter
            })
            .clone()
    }

    pub fn installed() -> Option<Arc<CrashReporter>> {
        INSTALLED.get().cloned()
    }

    pub fn crash_dir(&self) -> &Utf8Path {
        &self.crash_dir
    }

    /// Single entry point for every fault surface. Returns the written report,
    /// `None` when suppressed or when writing failed (failures are swallowed).
    pub fn report_fault(&self, context: FaultContext, input: FaultInput) -> Option<Utf8PathBuf> {
        if let (FaultContext::BackgroundTask, FaultInput::Structured(fault)) = (context, &input) {
            if fault.kind == FaultKind::IoAborted {
                error!("Background task I/O aborted: {}", fault.message);
                return None;
            }
        }

        let now = Local::now();
        let report = self.render(context, &input, &now);
        match self.write(&report, &now) {
            Ok(path) => {
                error!("Unhandled fault ({context}), crash report written to {path}");
                Some(path)
            }
            Err(e) => {
                error!("Unhandled fault ({context}), crash report could not be written: {e}");
                None
            }
        }
    }

    fn render(&self, context: FaultContext, input: &FaultInput, now: &DateTime<Local>) -> String {
        let h = &self.host;
        let mut out = String::new();
        let _ = writeln!(out, "Version: {}", h.version);
        let _ = writeln!(out, "User: {}", h.user_name);
        let _ = writeln!(out, "Machine: {}", h.machine_name);
        let _ = writeln!(out, "OS: {}", h.os_version);
        let _ = writeln!(out, "System directory: {}", h.system_directory);
        let _ = writeln!(out, "Architecture: {}", h.architecture);
        let _ = writeln!(out, "Runtime: {}", h.runtime_identifier);
        let _ = writeln!(out, "------------------------------");
        let _ = writeln!(out, "Time: {}", now.format("%Y-%m-%d %H:%M:%S%.3f"));
        let _ = writeln!(out, "Context: {context}");
        match input {
            FaultInput::Structured(fault) => {
                let _ = writeln!(out, "Fault type: {}", fault.type_name);
                let _ = writeln!(out, "Message: {}", fault.message);
                let _ = writeln!(out, "Stack trace:\n{}", fault.stack_trace);
            }
            FaultInput::Raw(raw) => {
                let _ = writeln!(out, "Unhandled fault: {raw}");
            }
        }
        out
    }

    fn write(&self, report: &str, now: &DateTime<Local>) -> Result<Utf8PathBuf, SError> {
        std::fs::create_dir_all(&self.crash_dir)?;
        let stem = format!(
            "CrashReport-{}_{:04}",
            now.format("%Y%m%d_%H%M%S"),
            now.timestamp_subsec_micros() / 100
        );

        // two faults inside the same tick get a numeric suffix
        for n in 0..100 {
            let name = match n {
                0 => format!("{stem}.log"),
                n => format!("{stem}-{n}.log"),
            };
            let path = self.crash_dir.join(name);
            match OpenOptions::new().write(true).create_new(true).open(&path) {
                Ok(mut file) => {
                    file.write_all(report.as_bytes())?;
                    return Ok(path);
                }
                Err(e) if e.kind() == ErrorKind::AlreadyExists => continue,
                Err(e) => return Err(e.into()),
            }
        }
        Err(SError::IOError(format!("no free crash report name for {stem}")))
    }
}

fn classify_thread(foreground: ThreadId) -> FaultContext {
    if std::thread::current().id() == foreground {
        FaultContext::Foreground
    } else {
        FaultContext::Thread
    }
}

fn panic_input(info: &PanicHookInfo<'_>) -> FaultInput {
    let message = if let Some(s) = info.payload().downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = info.payload().downcast_ref::<String>() {
        s.clone()
    } else {
        return FaultInput::Raw(info.to_string());
    };

    let location = info
        .location()
        .map(|l| format!("{}:{}:{}", l.file(), l.line(), l.column()))
        .unwrap_or_else(|| "unknown".to_string());
    let thread = std::thread::current()
        .name()
        .map(|s| s.to_string())
        .unwrap_or_else(|| "unnamed".to_string());

    FaultInput::Structured(Fault {
        kind: FaultKind::Panic,
        type_name: "panic".into(),
        message,
        stack_trace: format!(
            "at {location} (thread {thread})\n{}",
            Backtrace::force_capture()
        ),
    })
}

/// Spawns a fire-and-forget task whose error, if any, is reported instead of
/// being dropped. Panics inside the task reach the panic hook.
pub fn spawn_supervised<F>(reporter: Option<Arc<CrashReporter>>, name: &'static str, task: F) -> JoinHandle<()>
where
    F: Future<Output = Result<(), SError>> + Send + 'static,
{
    tokio::spawn(async move {
        match task.await {
            Ok(()) => debug!("Background task {name} finished"),
            Err(e) => match &reporter {
                Some(reporter) => {
                    reporter.report_fault(
                        FaultContext::BackgroundTask,
                        FaultInput::Structured(Fault::from_error(&e)),
                    );
                }
                None => error!("Background task {name} failed: {e}"),
            },
        }
    })
}
