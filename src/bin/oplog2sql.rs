use clap::Parser;
use oplog2sql::{Runner, Translator, TranslatorConfig};
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;
use tracing::info;

#[derive(Parser, Debug)]
#[clap(version = env!("CARGO_PKG_VERSION"))]
struct Opts {
    /// configuration file path.
    #[clap(short, long)]
    conf: Option<String>,
    /// oplog file, one json oplog per line, if not specified, oplogs are read from stdin.
    #[clap(short, long)]
    input: Option<String>,
    /// log file path, if not specified, all log information will be output to stderr.
    #[clap(long)]
    log_path: Option<String>,
    /// how many threads will be used to translate oplogs.
    #[clap(long)]
    concurrent: Option<usize>,
    /// stop at the first oplog which can't be translated.
    #[clap(long)]
    fail_fast: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let opts: Opts = Opts::parse();
    let conf: TranslatorConfig = match &opts.conf {
        Some(path) => toml::from_slice(&std::fs::read(path)?)?,
        None => TranslatorConfig::default(),
    };

    let collector = tracing_subscriber::fmt();
    let log_path = opts.log_path.as_deref().or_else(|| conf.get_log_path());
    let (non_blocking, _guard) = match log_path {
        Some(path) => {
            let path = Path::new(path);
            let dir_name = path.parent().unwrap_or_else(|| Path::new("."));
            let file_name = path.file_name().ok_or("log path should point to a file")?;
            let file_appender = tracing_appender::rolling::daily(dir_name, file_name);
            tracing_appender::non_blocking(file_appender)
        }
        // stdout is kept for sql statements.
        None => tracing_appender::non_blocking(io::stderr()),
    };
    collector.with_writer(non_blocking).init();

    let concurrent = opts.concurrent.unwrap_or_else(|| conf.get_concurrent());
    let fail_fast = opts.fail_fast || conf.is_fail_fast();
    info!(?conf, concurrent, fail_fast, "Use the following config to translate oplogs.");

    let runner = Runner::new(
        Translator::new(*conf.get_translate_conf()),
        concurrent,
        fail_fast,
    )?;
    let input: Box<dyn BufRead> = match &opts.input {
        Some(path) => Box::new(BufReader::new(File::open(path)?)),
        None => Box::new(BufReader::new(io::stdin())),
    };
    let stdout = io::stdout();
    runner.run(input, stdout.lock())?;
    Ok(())
}
