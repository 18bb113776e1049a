use clap::Parser;
use segbf::cli_util::print_translate_error;
use segbf::config::{self, Settings};
use segbf::logging::init_logging;
use segbf::{Engine, EofPolicy, Program};
use std::fs;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

fn usage_and_exit(program: &str, code: i32) -> ! {
    eprintln!(
        r#"Usage:
  {0} [--eof <POLICY>] [--dump] <FILE>

Options:
  --eof <POLICY>  What `,` stores on end of input: zero, unchanged or all-ones
                  (fallback BF_EOF, then [interpreter] eof in bf.toml; default zero)
  --dump          Print the translated instruction listing instead of running
  --help,  -h     Show this help

Notes:
- Characters outside of Brainfuck's ><+-.,[] are ignored.
- Unbalanced brackets are reported before anything runs.
- Set RUST_LOG=segbf=debug for translation and run statistics on stderr.
"#,
        program
    );
    let _ = io::stderr().flush();
    std::process::exit(code);
}

#[derive(Parser, Debug)]
#[command(name = "segbf", disable_help_flag = true, disable_version_flag = true)]
struct Cli {
    /// Brainfuck source file
    #[arg(value_name = "FILE")]
    file: Option<PathBuf>,

    /// What `,` stores on end of input
    #[arg(long = "eof", value_name = "POLICY")]
    eof: Option<EofPolicy>,

    /// Print the translated instruction listing instead of running
    #[arg(long = "dump")]
    dump: bool,

    /// Show this help
    #[arg(short = 'h', long = "help", action = clap::ArgAction::SetTrue)]
    help: bool,
}

fn main() {
    let program = std::env::args().next().unwrap_or_else(|| "segbf".to_string());
    init_logging();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            eprintln!("{program}: {}", e.kind());
            usage_and_exit(&program, 2);
        }
    };

    std::process::exit(run(&program, cli));
}

fn run(program: &str, cli: Cli) -> i32 {
    if cli.help {
        usage_and_exit(program, 0);
    }

    let Some(path) = cli.file else {
        usage_and_exit(program, 2);
    };

    let source = match fs::read(&path) {
        Ok(bytes) => bytes,
        Err(e) => {
            eprintln!("{program}: failed to read {}: {e}", path.display());
            let _ = io::stderr().flush();
            return 1;
        }
    };

    let code = match Program::from_bytes(&source) {
        Ok(code) => code,
        Err(err) => {
            print_translate_error(program, &source, &err);
            return 1;
        }
    };

    if cli.dump {
        print!("{code}");
        let _ = io::stdout().flush();
        return 0;
    }

    let env_eof = std::env::var(config::EOF_ENV).ok();
    let eof = config::resolve_eof(cli.eof, env_eof.as_deref(), Settings::load);
    tracing::debug!(%eof, path = %path.display(), "running program");

    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut input = stdin.lock();
    let mut output = BufWriter::new(stdout.lock());

    let mut engine = Engine::new(eof);
    match engine.run(&code, &mut input, &mut output) {
        Ok(()) => 0,
        Err(err) => {
            eprintln!("{program}: {err}");
            let _ = io::stderr().flush();
            1
        }
    }
}
