use std::{env, process};

use loxwalk::loxwalk;

fn main() {
    let args: Vec<String> = env::args().collect();
    let mut lox = loxwalk::new();

    match args.len() {
        n if n > 2 => {
            println!("Usage: loxwalk [script]");
            process::exit(64);
        }
        2 => lox.run_file(&args[1]),
        _ => lox.run_prompt(),
    }
}
