// Use the library crate (whose name is defined in Cargo.toml)
use fourfold::Session;
use std::io::{self, Read};
use std::process::ExitCode;

/// Runs each file named on the command line (or stdin when there are none)
/// through one prelude-loaded session, then prints the final stack.
fn main() -> ExitCode {
    let paths: Vec<String> = std::env::args().skip(1).collect();
    let mut session = Session::with_prelude();

    let sources = if paths.is_empty() {
        let mut input = String::new();
        if let Err(e) = io::stdin().read_to_string(&mut input) {
            eprintln!("Error reading stdin: {}", e);
            return ExitCode::FAILURE;
        }
        vec![("<stdin>".to_string(), input)]
    } else {
        let mut sources = Vec::with_capacity(paths.len());
        for path in paths {
            match std::fs::read_to_string(&path) {
                Ok(text) => sources.push((path, text)),
                Err(e) => {
                    eprintln!("Error reading {}: {}", path, e);
                    return ExitCode::FAILURE;
                }
            }
        }
        sources
    };

    for (name, text) in &sources {
        if let Err(e) = session.eval_str(text) {
            if e.pretty_print(name, text).is_err() {
                eprintln!("{}: {}", name, e);
            }
            return ExitCode::FAILURE;
        }
    }

    println!("{}", session.stack());
    ExitCode::SUCCESS
}
