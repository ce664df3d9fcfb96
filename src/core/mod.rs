pub mod error;
pub mod events;
pub mod materializer;
pub mod parser;
pub mod path_stack;
pub mod sanitizer;
pub mod tree_generator;

pub use error::{BuildError, CoreError, ErrorKind, ParseError};
pub use events::{BuildEvent, ProgressEvent, ProgressMessage};
pub use materializer::{RunSummary, TreeMaterializer};
pub use parser::{classify_line, InputLine, ParsedEntry};
pub use path_stack::PathStack;
pub use sanitizer::sanitize_name;
pub use tree_generator::TreeGenerator;
