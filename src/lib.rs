//! Translate mongodb insert oplog entries into sql insert statements.
//!
//! The core is [Translator], a pure function from one oplog entry (json text or a bson document)
//! to one `INSERT` statement.  [Runner] embeds it to translate a stream of oplog lines concurrently.
//!
//! # Translator example:
//! ```
//! use oplog2sql::translate;
//! let sql = translate(r#"{"op": "i", "ns": "test.student", "o": {"name": "O'Neil", "roll_no": 51}}"#).unwrap();
//! assert_eq!(sql, "INSERT INTO test.student (name, roll_no) VALUES ('O''Neil', 51);");
//! ```
//!
//! # Bson oplog example:
//! ```
//! use bson::doc;
//! use oplog2sql::Translator;
//! let oplog = doc! {"op": "i", "ns": "test.student", "o": {"is_graduated": false}};
//! let sql = Translator::default().translate_doc(&oplog).unwrap();
//! assert_eq!(sql, "INSERT INTO test.student (is_graduated) VALUES (false);");
//! ```

#![warn(missing_docs)]

mod config;
mod error;
pub mod literal;
pub mod oplog;
mod runner;
mod translator;

/// oplog namespace key name.
const NAMESPACE_KEY: &str = "ns";
/// oplog operation key name.
const OP_KEY: &str = "op";
/// oplog operated object key name.
const OBJ_KEY: &str = "o";
/// insert operation.
const INSERT_OP: &str = "i";

pub use config::{EmptyDocument, TranslateConf, TranslatorConfig};
pub use error::{Result, RunError, TranslateError};
pub use runner::{RunSummary, Runner};
pub use translator::{translate, Translator};
