use derive_more::Display;

/// Startup preconditions, in the order they are checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum GateCheck {
    #[display("single-instance")]
    SingleInstance,
    #[display("web-runtime")]
    WebRuntime,
    #[display("reserved-port")]
    ReservedPorts,
    #[display("host-identity")]
    HostIdentity,
}

/// Ports bound later by the emulator's own local services.
pub const RESERVED_PORTS: [u16; 3] = [3216, 3215, 4219];
