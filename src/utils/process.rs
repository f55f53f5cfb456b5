use sysinfo::System;

pub struct ProcessChecker;

impl ProcessChecker {
    /// Executable name of the current process as the OS reports it.
    /// Takes a mutable ref to System to allow sysinfo to reuse internal buffers.
    pub fn current_name(sys: &mut System) -> Option<String> {
        let pid = sysinfo::get_current_pid().ok()?;
        sys.refresh_process(pid);
        sys.process(pid).map(|p| p.name().to_string())
    }

    /// `EADesktop.exe` and `eadesktop` both match `EADesktop`.
    pub fn name_matches(actual: &str, expected: &str) -> bool {
        let stem = match actual.len().checked_sub(4) {
            Some(cut) if actual.is_char_boundary(cut) && actual[cut..].eq_ignore_ascii_case(".exe") => {
                &actual[..cut]
            }
            _ => actual,
        };
        stem.eq_ignore_ascii_case(expected)
    }
}
