//! Fault records
//!
//! A fault record describes one abnormal termination of a suite method,
//! either captured from a real panic or synthesized by the runner.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::panic::Location;
use std::path::Path;

/// Message attached to the record of a test that a fixture panic prevented
/// from running normally.
pub const CASCADE_MESSAGE: &str = "Fixture has panicked (see related PANIC)";

/// A source position
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Site {
    pub file: String,
    pub line: u32,
}

impl Site {
    pub fn new(file: impl Into<String>, line: u32) -> Self {
        Self {
            file: file.into(),
            line,
        }
    }

    pub fn from_location(location: &Location<'_>) -> Self {
        Self::new(location.file(), location.line())
    }

    /// Placeholder for frames without debug information
    pub fn unknown() -> Self {
        Self::new("???", 0)
    }

    /// Last path component of the file
    pub fn file_name(&self) -> &str {
        Path::new(&self.file)
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or(&self.file)
    }
}

impl fmt::Display for Site {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.file, self.line)
    }
}

/// One entry of a captured call stack
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Frame {
    pub site: Site,
    pub function: String,
}

impl Frame {
    pub fn new(site: Site, function: impl Into<String>) -> Self {
        Self {
            site,
            function: function.into(),
        }
    }
}

/// How a fault record came to exist
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FaultKind {
    /// Captured from a panic; `token` is the address of the raising frame.
    Raised { token: usize },
    /// A method with the wrong parameter shape.
    Signature,
    /// A test that could not run because a fixture panicked.
    Cascade,
}

impl FaultKind {
    pub fn is_synthetic(&self) -> bool {
        !matches!(self, FaultKind::Raised { .. })
    }
}

/// Structured description of a fault
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FaultRecord {
    pub kind: FaultKind,
    /// Declaration site of the method the fault is attributed to
    pub site: Site,
    /// Where the panic was raised, when known
    pub origin: Option<Site>,
    pub qualified_name: String,
    pub message: String,
    /// Innermost first; empty for synthetic records
    pub frames: Vec<Frame>,
}

impl FaultRecord {
    pub fn raised(
        site: Site,
        qualified_name: impl Into<String>,
        message: impl Into<String>,
        token: usize,
        origin: Option<Site>,
        frames: Vec<Frame>,
    ) -> Self {
        Self {
            kind: FaultKind::Raised { token },
            site,
            origin,
            qualified_name: qualified_name.into(),
            message: message.into(),
            frames,
        }
    }

    pub fn signature(
        site: Site,
        qualified_name: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::synthetic(FaultKind::Signature, site, qualified_name, message)
    }

    pub fn cascade(site: Site, qualified_name: impl Into<String>) -> Self {
        Self::synthetic(FaultKind::Cascade, site, qualified_name, CASCADE_MESSAGE)
    }

    fn synthetic(
        kind: FaultKind,
        site: Site,
        qualified_name: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            site,
            origin: None,
            qualified_name: qualified_name.into(),
            message: message.into(),
            frames: Vec::new(),
        }
    }

    pub fn token(&self) -> Option<usize> {
        match self.kind {
            FaultKind::Raised { token } => Some(token),
            _ => None,
        }
    }
}

impl fmt::Display for FaultRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}: {}: {}",
            self.site.file_name(),
            self.site.line,
            self.qualified_name,
            self.message
        )
    }
}
