//! Stack trimming
//!
//! A backtrace taken inside the panic hook starts with the hook itself and
//! the panic runtime, and ends with the runner and whatever called it. Only
//! the span from the raising primitive (`core::panicking::panic_fmt` and
//! friends) out to the outermost suite frame is kept.

use backtrace::Backtrace;

use super::capture::DISPATCH_FRAME;
use crate::models::{Frame, Site};

/// Frames leading up to and including the raising primitive
const PANIC_MACHINERY: &[&str] = &[
    "backtrace::",
    "suitecheck::fault::capture::",
    "alloc::boxed::Box",
    "std::panicking::",
    "std::panic::",
    "core::panicking::",
    "std::sys::backtrace::",
    "std::sys_common::backtrace::",
    "rust_begin_unwind",
    "__rustc::rust_begin_unwind",
];

/// Runner frames sitting between the dispatch boundary and suite code
const TRAMPOLINE: &[&str] = &[
    "suitecheck::fault::",
    "suitecheck::suite::",
    "suitecheck::executor::",
    "core::ops::function::",
    "core::panic::unwind_safe::",
    "std::panicking::",
    "std::panic::",
    "alloc::boxed::Box",
    "__rust_try",
];

/// One resolved symbol of the raw backtrace
#[derive(Clone, Debug)]
pub(crate) struct RawFrame {
    pub(crate) ip: usize,
    pub(crate) function: Option<String>,
    pub(crate) site: Option<Site>,
}

impl RawFrame {
    fn matches(&self, patterns: &[&str]) -> bool {
        self.function
            .as_deref()
            .map(|name| name_matches(name, patterns))
            .unwrap_or(false)
    }

    fn into_frame(self) -> Frame {
        Frame::new(
            self.site.unwrap_or_else(Site::unknown),
            self.function.unwrap_or_else(|| "???".to_string()),
        )
    }
}

/// Trimmed stack plus the address of the raising frame
#[derive(Debug)]
pub(crate) struct Trimmed {
    pub(crate) token: usize,
    pub(crate) frames: Vec<Frame>,
}

/// Resolve symbols, flattening inlined frames innermost first
pub(crate) fn resolve(mut backtrace: Backtrace) -> Vec<RawFrame> {
    backtrace.resolve();

    let mut frames = Vec::new();
    for frame in backtrace.frames() {
        let ip = frame.ip() as usize;
        let symbols = frame.symbols();
        if symbols.is_empty() {
            frames.push(RawFrame {
                ip,
                function: None,
                site: None,
            });
            continue;
        }
        for symbol in symbols {
            let function = symbol.name().map(|name| format!("{name:#}"));
            let site = match (symbol.filename(), symbol.lineno()) {
                (Some(file), Some(line)) => Some(Site::new(file.display().to_string(), line)),
                _ => None,
            };
            frames.push(RawFrame { ip, function, site });
        }
    }
    frames
}

/// Cut the panic machinery and the runner's own frames
pub(crate) fn trim(frames: Vec<RawFrame>) -> Trimmed {
    let start = raising_primitive(&frames).unwrap_or(0);
    let boundary = frames
        .iter()
        .skip(start)
        .position(|frame| frame.matches(&[DISPATCH_FRAME]))
        .map(|offset| start + offset);

    let mut end = boundary.unwrap_or(frames.len());
    if boundary.is_some() {
        while end > start + 1 && frames[end - 1].matches(TRAMPOLINE) {
            end -= 1;
        }
    }

    let token = frames.get(start).map(|frame| frame.ip).unwrap_or(0);
    let frames = frames
        .into_iter()
        .skip(start)
        .take(end.saturating_sub(start))
        .map(RawFrame::into_frame)
        .collect();

    Trimmed { token, frames }
}

/// Last frame of the leading run of panic machinery
fn raising_primitive(frames: &[RawFrame]) -> Option<usize> {
    let mut primitive = None;
    for (index, frame) in frames.iter().enumerate() {
        if frame.matches(PANIC_MACHINERY) {
            primitive = Some(index);
        } else if frame.function.is_some() {
            break;
        }
    }
    primitive
}

/// Prefix match that also looks through `<X as Trait>` wrappers
fn name_matches(name: &str, patterns: &[&str]) -> bool {
    let name = name.trim_start_matches('<');
    let implemented = name.split_once(" as ").map(|(_, rest)| rest);
    patterns.iter().any(|pattern| {
        name.starts_with(pattern) || implemented.is_some_and(|rest| rest.starts_with(pattern))
    })
}
