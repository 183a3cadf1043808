mod logging;

use clap::Parser;
use js2sh::context::{Indent, TargetShell, TranslateOptions};
use js2sh::driver::{self, CompileOptions, DriverError, Mode};
use js2sh::project;
use std::path::PathBuf;
use std::process;

#[derive(Parser, Debug)]
#[command(name = "js2sh")]
#[command(version, about = "Translate a small subset of JavaScript into shell scripts", long_about = None)]
struct Cli {
    /// Script to translate, or a directory of scripts (with --out-dir)
    input: PathBuf,

    /// Write output to file instead of stdout
    #[arg(short, long, value_name = "FILE")]
    out: Option<PathBuf>,

    /// Output directory when INPUT is a directory
    #[arg(long, value_name = "DIR")]
    out_dir: Option<PathBuf>,

    /// Output shell dialect
    #[arg(long, default_value_t = TargetShell::Bash)]
    target: TargetShell,

    /// Indentation unit: a number of spaces (1-8) or `tab`
    #[arg(long, default_value = "2", value_name = "N|tab")]
    indent: Indent,

    /// Do not start the script with a shebang line
    #[arg(long)]
    no_shebang: bool,

    /// Translate without emitting code
    #[arg(long, conflicts_with_all = ["emit_ast", "out"])]
    check: bool,

    /// Print the parsed syntax tree (debug)
    #[arg(long, conflicts_with = "out_dir")]
    emit_ast: bool,

    /// Set the executable bit on written scripts (default)
    #[arg(long)]
    chmod_x: bool,

    /// Do not set the executable bit on written scripts
    #[arg(long, conflicts_with = "chmod_x")]
    no_chmod_x: bool,

    /// Increase logging verbosity (-v for DEBUG, -vv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let code = if e.use_stderr() { 1 } else { 0 };
            let _ = e.print();
            process::exit(code);
        }
    };
    logging::init(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("{}", e.msg);
        process::exit(e.code);
    }
}

fn usage(msg: &str) -> DriverError {
    DriverError {
        code: 1,
        msg: format!("error: {msg}"),
    }
}

fn run(cli: Cli) -> Result<(), DriverError> {
    let writes = cli.out.is_some() || cli.out_dir.is_some();
    if (cli.chmod_x || cli.no_chmod_x) && !writes {
        return Err(usage("--no-chmod-x/--chmod-x require --out or --out-dir"));
    }

    let mode = if cli.emit_ast {
        Mode::EmitAst
    } else if cli.check {
        Mode::Check
    } else {
        Mode::Emit
    };
    let options = CompileOptions {
        translate: TranslateOptions {
            target: cli.target,
            indent: cli.indent,
            shebang: !cli.no_shebang,
        },
        mode,
        out_path: cli.out.clone(),
        chmod_x: !cli.no_chmod_x,
    };

    if cli.input.is_dir() {
        if cli.out.is_some() {
            return Err(usage("--out takes a file; use --out-dir for a directory"));
        }
        let out_dir = match (&cli.out_dir, mode) {
            (Some(dir), _) => dir.clone(),
            (None, Mode::Check) => cli.input.clone(),
            (None, _) => return Err(usage("a directory input requires --out-dir")),
        };
        let built = project::build_project(&cli.input, &out_dir, &options)?;
        match mode {
            Mode::Check => println!("OK"),
            _ => {
                for module in built {
                    println!("{}", module.output.display());
                }
            }
        }
        return Ok(());
    }

    if cli.out_dir.is_some() {
        return Err(usage("--out-dir requires a directory input"));
    }

    let out = driver::compile_file(&cli.input, &options)?;
    match mode {
        Mode::Emit if options.out_path.is_some() => {}
        Mode::Emit => print!("{out}"),
        _ => println!("{out}"),
    }
    Ok(())
}
