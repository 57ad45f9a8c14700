//! oplog2sql basic configuration, express in toml.
//!
//! Basic configuration file example:
//! ```toml
//! [translate]
//! # what to do with an insert oplog whose document has no fields.
//! # "emit" makes `INSERT INTO db.coll () VALUES ();`, "reject" makes it a schema error.
//! empty_document = "emit"
//!
//! [run]
//! # how many threads will be used to translate oplogs concurrently.
//! concurrent = 4
//! # stop at the first oplog which can't be translated.
//! fail_fast = false
//!
//! [log]
//! # log file path, log to stderr if it's not specified.
//! path = "/var/log/oplog2sql/oplog2sql.log"
//! ```
//!
//! All tables and keys are optional.
use serde::Deserialize;

/// Global oplog2sql configuration.
#[derive(Deserialize, Debug, Default)]
pub struct TranslatorConfig {
    #[serde(default)]
    translate: TranslateConf,
    #[serde(default)]
    run: RunConf,
    #[serde(default)]
    log: LogConf,
}

impl TranslatorConfig {
    /// get translation configuration.
    pub fn get_translate_conf(&self) -> &TranslateConf {
        &self.translate
    }

    /// get how many threads to translate oplogs.
    pub fn get_concurrent(&self) -> usize {
        self.run.concurrent
    }

    /// should we stop at the first failed oplog?
    pub fn is_fail_fast(&self) -> bool {
        self.run.fail_fast
    }

    /// get log file path.
    pub fn get_log_path(&self) -> Option<&str> {
        self.log.path.as_deref()
    }
}

/// Policy for insert oplog with an empty document.
#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum EmptyDocument {
    /// make `INSERT INTO db.coll () VALUES ();`.
    Emit,
    /// reject it as a schema error.
    Reject,
}

impl Default for EmptyDocument {
    fn default() -> Self {
        EmptyDocument::Emit
    }
}

/// Translation configuration.
#[derive(Deserialize, Debug, Default, Clone, Copy)]
pub struct TranslateConf {
    #[serde(default)]
    empty_document: EmptyDocument,
}

impl TranslateConf {
    /// create translation configuration with given empty document policy.
    pub fn new(empty_document: EmptyDocument) -> Self {
        TranslateConf { empty_document }
    }

    /// get empty document policy.
    pub fn get_empty_document(&self) -> EmptyDocument {
        self.empty_document
    }
}

/// Runtime configuration of oplog stream translation.
#[derive(Deserialize, Debug)]
pub(crate) struct RunConf {
    /// how many threads will be used to translate oplogs concurrently.
    #[serde(default = "number_of_cpus")]
    concurrent: usize,
    /// stop at the first oplog which can't be translated.
    #[serde(default)]
    fail_fast: bool,
}

impl Default for RunConf {
    fn default() -> Self {
        RunConf {
            concurrent: number_of_cpus(),
            fail_fast: false,
        }
    }
}

/// Logger config.
#[derive(Deserialize, Debug, Default)]
pub(crate) struct LogConf {
    /// log file path, a daily rolling file is created from it.
    path: Option<String>,
}

fn number_of_cpus() -> usize {
    num_cpus::get()
}
