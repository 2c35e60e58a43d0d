use std::cell::RefCell;
use std::fmt;

/// Defines the severity of a diagnostic message
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum Severity {
    /// Informative message; the computation continues normally
    Notification,

    /// Something went wrong or accuracy was given up; the caller must inspect the returned flag
    Warning,
}

/// Holds a diagnostic message emitted by a substepper or material wrapper
#[derive(Clone, Debug, PartialEq)]
pub struct Diagnostic {
    /// Name of the emitting component
    pub name: &'static str,

    /// Severity of the message
    pub severity: Severity,

    /// Message
    pub message: String,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let tag = match self.severity {
            Severity::Notification => "notification",
            Severity::Warning => "warning",
        };
        write!(f, "{} ({}): {}", self.name, tag, self.message)
    }
}

/// Specifies the sink receiving diagnostic messages
///
/// A journal is handed to each substepper at construction; the host application
/// decides where the messages go.
pub trait Journal {
    /// Records a diagnostic message
    fn record(&self, diagnostic: Diagnostic);

    /// Records a notification
    fn notify(&self, name: &'static str, message: &str) {
        self.record(Diagnostic {
            name,
            severity: Severity::Notification,
            message: message.to_string(),
        });
    }

    /// Records a warning
    fn warn(&self, name: &'static str, message: &str) {
        self.record(Diagnostic {
            name,
            severity: Severity::Warning,
            message: message.to_string(),
        });
    }
}

impl<J: Journal + ?Sized> Journal for &J {
    fn record(&self, diagnostic: Diagnostic) {
        (**self).record(diagnostic)
    }
}

/// Forwards diagnostic messages to the `log` facade
#[derive(Clone, Copy, Debug, Default)]
pub struct LogJournal;

impl Journal for LogJournal {
    fn record(&self, diagnostic: Diagnostic) {
        match diagnostic.severity {
            Severity::Notification => log::info!("{}: {}", diagnostic.name, diagnostic.message),
            Severity::Warning => log::warn!("{}: {}", diagnostic.name, diagnostic.message),
        }
    }
}

/// Keeps diagnostic messages in memory (e.g., for testing)
#[derive(Debug, Default)]
pub struct RecordingJournal {
    all: RefCell<Vec<Diagnostic>>,
}

impl RecordingJournal {
    /// Allocates a new instance
    pub fn new() -> Self {
        RecordingJournal {
            all: RefCell::new(Vec::new()),
        }
    }

    /// Returns a copy of all recorded messages
    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        self.all.borrow().clone()
    }

    /// Returns the number of recorded messages with the given severity
    pub fn count(&self, severity: Severity) -> usize {
        self.all.borrow().iter().filter(|d| d.severity == severity).count()
    }

    /// Indicates whether some recorded message contains the given text
    pub fn contains(&self, text: &str) -> bool {
        self.all.borrow().iter().any(|d| d.message.contains(text))
    }

    /// Clears all recorded messages
    pub fn clear(&self) {
        self.all.borrow_mut().clear();
    }
}

impl Journal for RecordingJournal {
    fn record(&self, diagnostic: Diagnostic) {
        self.all.borrow_mut().push(diagnostic);
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
