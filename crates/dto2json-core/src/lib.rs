//! # dto2json-core
//!
//! Converts the text form of an object literal (the `toString()` dump of a Java or
//! Kotlin object, or a C# object/collection initializer) into a JSON tree.
//!
//! Parsing is a pure function of `(language, text)`: the caller names the dialect,
//! the [`Registry`] checks that the input looks like that dialect and then decomposes
//! it recursively. Nothing is compiled or evaluated, and there is no fallback to
//! another dialect.
//!
//! ## Quick start
//!
//! ```rust
//! use dto2json_core::dispatch;
//!
//! let value = dispatch("JAVA", r#"Person(name="Alice", age=30)"#).unwrap();
//! assert_eq!(value.to_json().to_string(), r#"{"name":"Alice","age":30}"#);
//!
//! let value = dispatch("CSHARP", r#"new Person { Name = "Eve", Age = 25 }"#).unwrap();
//! assert_eq!(
//!     value.to_json().to_string(),
//!     r#"{"__class":"Person","Name":"Eve","Age":25}"#
//! );
//! ```
//!
//! ## Modules
//!
//! - [`registry`]: language tags, the [`DialectParser`] trait, dispatch
//! - [`java`], [`kotlin`], [`csharp`]: the dialect parsers
//! - [`splitter`]: bracket- and quote-aware comma splitting
//! - [`numeric`]: numeric literal conversion
//! - [`value`]: the [`Value`] tree and its JSON mapping
//! - [`request`]: `{language, inputTxt}` request handling
//! - [`options`]: [`ParseOptions`]
//! - [`error`]: [`ParseError`] and [`DispatchError`]

pub mod csharp;
pub mod error;
mod grammar;
pub mod java;
pub mod kotlin;
pub mod numeric;
pub mod options;
pub mod registry;
pub mod request;
pub mod splitter;
pub mod value;

pub use csharp::CSharpParser;
pub use error::{DispatchError, ErrorKind, ParseError};
pub use java::JavaParser;
pub use kotlin::KotlinParser;
pub use options::{BracketMode, ParseOptions, DEFAULT_MAX_DEPTH};
pub use registry::{detect, dispatch, DialectParser, Language, Registry};
pub use request::{handle, ErrorBody, ParseRequest};
pub use value::{Integer, Object, ScalarRaw, ScalarTag, TypedScalar, Value};
