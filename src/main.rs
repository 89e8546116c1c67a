use rusty_monkey::frontend::errors::ParserError;
use rusty_monkey::frontend::grammar::{Program, Statement};
use rusty_monkey::frontend::{Lexer, Parser};
use rusty_monkey::treewalk_interpreter::{Interpreter, Object, DEFAULT_MAX_DEPTH};

use clap::Parser as CliParser;
use std::io::{self, BufRead, Write};
use std::{fs, process};

const PROMPT: &str = ">> ";

/// Interpreter for the Monkey programming language. Starts a REPL when no
/// script is given.
#[derive(CliParser, Debug)]
#[clap(version, about)]
struct Args {
    /// Script to run.
    script: Option<String>,

    /// Maximum nesting of function calls before evaluation fails.
    #[clap(long, default_value_t = DEFAULT_MAX_DEPTH)]
    max_depth: usize,

    /// Log filter, e.g. `debug` or `rusty_monkey::frontend=trace`. Falls back
    /// to RUST_LOG.
    #[clap(long)]
    log: Option<String>,
}

fn main() {
    let args = Args::parse();
    init_tracing(args.log.as_deref());

    let interpreter = Interpreter::new().with_max_depth(args.max_depth);
    let result = match &args.script {
        Some(script) => run_file(interpreter, script),
        None => run_prompt(interpreter),
    };

    if let Err(e) = result {
        eprintln!("{}", e);
        process::exit(74);
    }
}

fn init_tracing(filter: Option<&str>) {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = match filter {
        Some(filter) => EnvFilter::new(filter),
        None if std::env::var("RUST_LOG").is_ok() => EnvFilter::from_default_env(),
        None => return,
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr).with_target(true))
        .with(filter)
        .init();
}

fn run_prompt(mut interpreter: Interpreter) -> io::Result<()> {
    let stdin = io::stdin();
    let mut input = String::new();

    loop {
        print!("{}", PROMPT);
        io::stdout().flush()?;

        input.clear();
        if stdin.lock().read_line(&mut input)? == 0 {
            return Ok(());
        }

        let program = match parse(&input) {
            Ok(program) => program,
            Err(errors) => {
                print_parser_errors(&errors);
                continue;
            }
        };

        let result = interpreter.eval_program(&program);
        if should_print(&program, &result) {
            println!("{}", result);
        }
    }
}

/// Errors always surface. Otherwise the null left by a trailing `let`, or by
/// an empty line, is not echoed.
fn should_print(program: &Program, result: &Object) -> bool {
    if let Object::Error(_) = result {
        return true;
    }

    match program.statements.last() {
        Some(Statement::Let { .. }) | None => false,
        Some(_) => true,
    }
}

fn run_file(mut interpreter: Interpreter, filename: &str) -> io::Result<()> {
    let contents = fs::read_to_string(filename)?;

    let program = match parse(&contents) {
        Ok(program) => program,
        Err(errors) => {
            print_parser_errors(&errors);
            process::exit(65);
        }
    };

    if let Object::Error(e) = interpreter.eval_program(&program) {
        eprintln!("ERROR: {}", e);
        process::exit(70);
    }

    Ok(())
}

fn parse(source: &str) -> Result<Program, Vec<ParserError>> {
    Parser::new(Lexer::new(source)).parse()
}

fn print_parser_errors(errors: &[ParserError]) {
    eprintln!("Woops! We ran into some monkey business here!");
    eprintln!(" parser errors:");
    for error in errors.iter() {
        eprintln!("\t{}", error);
    }
}
