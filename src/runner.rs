use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};
use std::io::{BufRead, Write};
use tracing::{error, info, warn};

use crate::error::RunError;
use crate::Translator;

/// how many oplog lines are buffered before they are translated concurrently.
const BATCH_SIZE: usize = 10000;

/// Count of oplogs handled by [Runner::run].
#[derive(Debug, Default, PartialEq, Eq, Clone, Copy)]
pub struct RunSummary {
    /// oplogs translated and written.
    pub translated: usize,
    /// oplogs which can't be translated, and are skipped.
    pub failed: usize,
}

/// Translate a stream of json oplogs, one oplog per line, into sql statements, one per line.
///
/// Lines are translated concurrently inside a thread pool, output keeps input order.
pub struct Runner {
    translator: Translator,
    pool: ThreadPool,
    fail_fast: bool,
}

impl Runner {
    /// create a new runner with `concurrent` translate threads.
    pub fn new(translator: Translator, concurrent: usize, fail_fast: bool) -> Result<Self, RunError> {
        Ok(Runner {
            translator,
            pool: ThreadPoolBuilder::new().num_threads(concurrent).build()?,
            fail_fast,
        })
    }

    /// Read oplogs from `input` until EOF, and write sql statements to `output`.
    ///
    /// Blank lines are skipped.  Failed oplogs are logged and skipped, except in fail fast mode,
    /// where the first failed oplog stops the run and is returned as [RunError::Translate].
    pub fn run<R: BufRead, W: Write>(&self, mut input: R, mut output: W) -> Result<RunSummary, RunError> {
        let mut summary = RunSummary::default();
        let mut buffer = Vec::with_capacity(BATCH_SIZE);
        let mut line_no = 0;

        loop {
            // lines are kept as raw bytes, so a line which is not utf-8 only fails itself.
            let mut line = vec![];
            match input.read_until(b'\n', &mut line) {
                Ok(0) => break,
                Ok(_) => {}
                Err(e) => {
                    error!(line = line_no + 1, %e, "Read oplog failed, translate pending oplogs and stop.");
                    self.run_batch(&buffer, &mut output, &mut summary)?;
                    output.flush()?;
                    return Err(RunError::Io(e));
                }
            }
            line_no += 1;
            if line.iter().all(u8::is_ascii_whitespace) {
                continue;
            }
            buffer.push((line_no, line));
            if buffer.len() == BATCH_SIZE {
                self.run_batch(&buffer, &mut output, &mut summary)?;
                buffer.clear();
            }
        }
        self.run_batch(&buffer, &mut output, &mut summary)?;
        output.flush()?;

        info!(
            translated = summary.translated,
            failed = summary.failed,
            "Translate oplog stream complete."
        );
        Ok(summary)
    }

    fn run_batch<W: Write>(
        &self,
        lines: &[(usize, Vec<u8>)],
        output: &mut W,
        summary: &mut RunSummary,
    ) -> Result<(), RunError> {
        let translator = &self.translator;
        let results: Vec<_> = self.pool.install(|| {
            lines
                .par_iter()
                .map(|(line_no, line)| (*line_no, translator.translate_slice(line)))
                .collect()
        });

        for (line_no, result) in results {
            match result {
                Ok(sql) => {
                    writeln!(output, "{}", sql)?;
                    summary.translated += 1;
                }
                Err(e) if self.fail_fast => {
                    error!(line = line_no, %e, "Translate oplog failed, stop now.");
                    return Err(RunError::Translate {
                        line: line_no,
                        source: e,
                    });
                }
                Err(e) => {
                    warn!(line = line_no, %e, "Translate oplog failed, so the oplog will be ignored.");
                    summary.failed += 1;
                }
            }
        }
        Ok(())
    }
}
