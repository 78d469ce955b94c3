//! A parser for the GDB Machine Interface (GDB/MI) output stream.
//!
//! Converts byte chunks arriving in arbitrary sizes into a sequence of
//! strongly-typed [`record::Record`]s. The core is synchronous,
//! single-threaded, and performs no I/O: it is meant to sit behind whatever
//! transport (pipe, PTY, socket) a debugger front-end uses to talk to a
//! GDB `--interpreter=mi` process.
//!
//! ```
//! use gdbmi_parser::LineFramer;
//!
//! // A consumer normally installs one subscriber at process start; wiring
//! // one up here makes the trace/debug/warn calls in `LineFramer::parse`
//! // visible when this example is run with `cargo test --doc -- --nocapture`.
//! tracing_subscriber::fmt()
//!     .with_env_filter("gdbmi_parser=trace")
//!     .try_init()
//!     .ok();
//!
//! let mut framer = LineFramer::new();
//! let record = framer.parse(b"~\"Hello\\n\"\n").unwrap().unwrap();
//! assert!(record.is_stream());
//! ```

pub mod error;
pub mod framer;
pub mod native;
pub mod record;
pub mod result;
pub mod rewrite;
pub mod value;

pub use error::{ParsingError, ParsingErrorKind, UsageError};
pub use framer::LineFramer;
pub use native::{Filter, Native, Termination};
pub use record::{AsyncKind, AsyncRecord, Record, ResultRecord, StreamKind, StreamRecord};
pub use result::MiResult;
pub use value::{ListItems, Value};

impl Record {
    /// Project this record into the canonical dictionary/list/string form.
    pub fn as_native(&self) -> Native {
        native::as_native(self)
    }

    pub fn is_stream(&self) -> bool {
        native::is_stream(self, Filter::Any).expect("Filter::Any never misuses a predicate")
    }

    pub fn is_stream_of(&self, kind: &str) -> Result<bool, UsageError> {
        native::is_stream(self, Filter::One(kind))
    }

    pub fn is_async(&self) -> bool {
        native::is_async(self, Filter::Any).expect("Filter::Any never misuses a predicate")
    }

    pub fn is_async_of(&self, kind: &str) -> Result<bool, UsageError> {
        native::is_async(self, Filter::One(kind))
    }

    pub fn is_result(&self) -> bool {
        native::is_result(self, Filter::Any).expect("Filter::Any never misuses a predicate")
    }

    pub fn is_result_of(&self, class: &str) -> Result<bool, UsageError> {
        native::is_result(self, Filter::One(class))
    }
}
