use std::cell::RefCell;
use std::fmt;

/// A sink for the diagnostics produced while preparing a test environment.
///
/// Passed explicitly to every operation that reports, so that messages are attributable to a
/// single invocation.
pub trait Reporter {
    /// Label an installer sub-step (e.g., `inst-nodeps`) with the target it acts on.
    fn activity(&self, env: &str, name: &str, detail: &str);

    /// Report a non-fatal anomaly.
    fn warning(&self, message: &str);

    /// Report a problem that doesn't abort the run.
    fn error(&self, message: &str);
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    Activity {
        env: String,
        name: String,
        detail: String,
    },
    Warning(String),
    Error(String),
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Activity { env, name, detail } => write!(f, "{env} {name}: {detail}"),
            Self::Warning(message) => write!(f, "WARNING: {message}"),
            Self::Error(message) => write!(f, "ERROR: {message}"),
        }
    }
}

/// A [`Reporter`] that records every diagnostic, in order.
#[derive(Debug, Default)]
pub struct Diagnostics(RefCell<Vec<Diagnostic>>);

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the recorded diagnostics, leaving the recorder empty.
    pub fn take(&self) -> Vec<Diagnostic> {
        self.0.take()
    }

    pub fn warnings(&self) -> Vec<String> {
        self.0
            .borrow()
            .iter()
            .filter_map(|diagnostic| match diagnostic {
                Diagnostic::Warning(message) => Some(message.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn errors(&self) -> Vec<String> {
        self.0
            .borrow()
            .iter()
            .filter_map(|diagnostic| match diagnostic {
                Diagnostic::Error(message) => Some(message.clone()),
                _ => None,
            })
            .collect()
    }

    /// The `(name, detail)` of each recorded activity.
    pub fn activities(&self) -> Vec<(String, String)> {
        self.0
            .borrow()
            .iter()
            .filter_map(|diagnostic| match diagnostic {
                Diagnostic::Activity { name, detail, .. } => Some((name.clone(), detail.clone())),
                _ => None,
            })
            .collect()
    }
}

impl Reporter for Diagnostics {
    fn activity(&self, env: &str, name: &str, detail: &str) {
        self.0.borrow_mut().push(Diagnostic::Activity {
            env: env.to_string(),
            name: name.to_string(),
            detail: detail.to_string(),
        });
    }

    fn warning(&self, message: &str) {
        self.0
            .borrow_mut()
            .push(Diagnostic::Warning(message.to_string()));
    }

    fn error(&self, message: &str) {
        self.0
            .borrow_mut()
            .push(Diagnostic::Error(message.to_string()));
    }
}
