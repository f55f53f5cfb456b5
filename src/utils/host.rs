use sysinfo::System;

/// Identity of the running program and the machine it runs on.
#[derive(Clone, Debug)]
pub struct HostInfo {
    pub version: String,
    pub user_name: String,
    pub machine_name: String,
    pub os_version: String,
    pub system_directory: String,
    pub architecture: String,
    pub runtime_identifier: String,
}

impl HostInfo {
    pub fn collect() -> Self {
        let user_name = std::env::var("USERNAME")
            .or_else(|_| std::env::var("USER"))
            .unwrap_or_else(|_| "unknown".into());
        let system_directory = std::env::var("SystemRoot")
            .map(|root| format!("{root}\\system32"))
            .unwrap_or_else(|_| "/".into());

        Self {
            version: env!("CARGO_PKG_VERSION").to_string(),
            user_name,
            machine_name: System::host_name().unwrap_or_else(|| "unknown".into()),
            os_version: System::long_os_version().unwrap_or_else(|| std::env::consts::OS.into()),
            system_directory,
            architecture: std::env::consts::ARCH.to_string(),
            runtime_identifier: format!("{}-{}", std::env::consts::OS, std::env::consts::ARCH),
        }
    }
}
