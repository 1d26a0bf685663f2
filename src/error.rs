use thiserror::Error;

/// Errors raised by the modeling and simulation layers.
///
/// Every failure is local and synchronous: the operation that raised it is
/// terminated without partial mutation, and nothing is retried.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SimulationError {
    /// A value (or a coupling endpoint) disagrees with a port's declared
    /// element type.
    #[error("type mismatch on port '{port}': expected {expected}, found {found}")]
    TypeMismatch {
        port: String,
        expected: &'static str,
        found: &'static str,
    },

    /// A coupling references a port that no component has claimed yet.
    #[error("port '{0}' does not have a parent component")]
    DetachedPort(String),

    /// A coupling whose endpoints cannot form a directed edge.
    #[error("invalid coupling: {0}")]
    InvalidCoupling(String),

    /// Port lookup by name found no match.
    #[error("component '{component}' has no port named '{port}'")]
    UnknownPort { component: String, port: String },

    /// Child lookup by name found no match.
    #[error("coupled model '{parent}' has no child component named '{child}'")]
    UnknownComponent { parent: String, child: String },

    /// A single-value read on a port with an empty bag.
    #[error("port '{0}' is empty")]
    EmptyPort(String),

    /// An external event was scheduled past the coordinator's next event.
    #[error(
        "input rejected at t = {t_last}: elapsed time {elapsed} is not in bounds (next event at {t_next})"
    )]
    InjectionOutOfBounds {
        t_last: f64,
        elapsed: f64,
        t_next: f64,
    },

    /// `initialize` called on an already-initialized coordinator.
    #[error("coordinator is already initialized")]
    AlreadyInitialized,

    /// The coordinator was driven before `initialize`.
    #[error("coordinator has not been initialized")]
    NotInitialized,

    /// `exit` called twice on the same coordinator.
    #[error("coordinator has already exited")]
    AlreadyExited,
}
