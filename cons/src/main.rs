use std::env;
use std::fs::File;
use std::io::{self, BufReader, IsTerminal};
use std::path::PathBuf;
use std::process;
use std::thread;

use cellar::{BufReadSource, Config, GcPolicy, LineSource, Runtime};
use log::{debug, warn};
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;

/// Evaluation recurses on the native stack, so sessions run on a thread with
/// room for `SESSION_MAX_DEPTH` levels.
const STACK_SIZE: usize = 256 * 1024 * 1024;

/// Nesting allowed by default on the session thread.
const SESSION_MAX_DEPTH: usize = 10_000;

const HISTORY_FILE: &str = ".cellar_history";

// ============================================================================
// Interactive line source
// ============================================================================

struct EditorSource {
    editor: DefaultEditor,
    history: Option<PathBuf>,
}

impl EditorSource {
    fn new() -> Result<Self, ReadlineError> {
        let mut editor = DefaultEditor::new()?;
        let history = dirs::home_dir().map(|home| home.join(HISTORY_FILE));
        if let Some(path) = &history {
            // Missing on first run.
            let _ = editor.load_history(path);
        }
        Ok(EditorSource { editor, history })
    }
}

impl LineSource for EditorSource {
    fn next_line(&mut self) -> io::Result<Option<String>> {
        match self.editor.readline("* ") {
            Ok(line) => {
                if !line.trim().is_empty() {
                    let _ = self.editor.add_history_entry(line.as_str());
                }
                Ok(Some(line))
            }
            Err(ReadlineError::Eof | ReadlineError::Interrupted) => Ok(None),
            Err(ReadlineError::Io(e)) => Err(e),
            Err(e) => Err(io::Error::other(e.to_string())),
        }
    }
}

impl Drop for EditorSource {
    fn drop(&mut self) {
        if let Some(path) = &self.history {
            if let Err(e) = self.editor.save_history(path) {
                warn!("could not save history to {}: {e}", path.display());
            }
        }
    }
}

// ============================================================================
// Sessions
// ============================================================================

fn run_session<S: LineSource>(source: S, config: Config) -> cellar::Result<()> {
    let stdout = io::stdout().lock();
    let mut runtime = Runtime::with_config(source, stdout, config);
    let result = runtime.run();
    debug!("session stats: {:?}, peak pairs {}", runtime.stats(), runtime.heap().peak());
    result
}

fn repl(config: Config) -> cellar::Result<()> {
    if io::stdin().is_terminal() {
        let source = EditorSource::new().map_err(|e| io::Error::other(e.to_string()))?;
        run_session(source, config)
    } else {
        run_session(BufReadSource::new(io::stdin().lock()), config)
    }
}

fn run_file(filename: &str, config: Config) -> cellar::Result<()> {
    let file = File::open(filename)?;
    // Files separate forms with blank lines freely.
    let config = config.with_blank_line_ends_input(false);
    run_session(BufReadSource::new(BufReader::new(file)), config)
}

// ============================================================================
// Command line
// ============================================================================

struct Options {
    config: Config,
    file: Option<String>,
}

fn parse_args(args: &[String]) -> Result<Option<Options>, String> {
    let mut options = Options {
        config: Config::default().with_max_depth(SESSION_MAX_DEPTH),
        file: None,
    };
    let mut iter = args.iter();

    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--help" | "-h" => return Ok(None),
            "--gc-every-eval" => options.config = options.config.with_gc(GcPolicy::EveryEval),
            "--keep-blank-lines" => {
                options.config = options.config.with_blank_line_ends_input(false)
            }
            "--max-pairs" => {
                let n = numeric_arg(arg, iter.next())?;
                options.config = options.config.with_max_pairs(Some(n));
            }
            "--max-depth" => {
                let n = numeric_arg(arg, iter.next())?;
                options.config = options.config.with_max_depth(n);
            }
            flag if flag.starts_with('-') => return Err(format!("Unknown option: {flag}")),
            file => {
                if options.file.is_some() {
                    return Err("Too many arguments".to_string());
                }
                options.file = Some(file.to_string());
            }
        }
    }

    Ok(Some(options))
}

fn numeric_arg(flag: &str, value: Option<&String>) -> Result<usize, String> {
    value
        .ok_or_else(|| format!("{flag} needs a value"))?
        .parse()
        .map_err(|e| format!("{flag}: {e}"))
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  cellar [options]              Start interactive REPL (or read stdin)");
    eprintln!("  cellar [options] <file.lisp>  Run a Lisp file");
    eprintln!("  cellar --help                 Show this help message");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --gc-every-eval     Collect after every evaluation, not just top level");
    eprintln!("  --max-pairs N       Fail once more than N pairs are live");
    eprintln!("  --max-depth N       Fail once evaluation nests deeper than N");
    eprintln!("  --keep-blank-lines  Do not treat a blank line as end of input");
}

fn main() {
    env_logger::init();

    let args: Vec<String> = env::args().skip(1).collect();
    let options = match parse_args(&args) {
        Ok(Some(options)) => options,
        Ok(None) => {
            print_usage();
            return;
        }
        Err(e) => {
            eprintln!("{e}");
            print_usage();
            process::exit(2);
        }
    };
    debug!("config: {:?}", options.config);

    let session = thread::Builder::new()
        .name("cellar".to_string())
        .stack_size(STACK_SIZE)
        .spawn(move || match &options.file {
            Some(file) => run_file(file, options.config),
            None => repl(options.config),
        });

    let outcome = match session {
        Ok(handle) => handle.join(),
        Err(e) => {
            eprintln!("error: could not start session: {e}");
            process::exit(1);
        }
    };

    match outcome {
        Ok(Ok(())) => {}
        Ok(Err(e)) => {
            eprintln!("error: {e}");
            process::exit(1);
        }
        Err(_) => {
            eprintln!("error: session panicked");
            process::exit(1);
        }
    }
}
