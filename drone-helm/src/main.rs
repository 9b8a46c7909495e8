use libdronehelmcmd::main_with_args;
use log::error;
use std::{env, process};

fn main() {
    let args: Vec<String> = env::args().collect();

    if let Err(err) = main_with_args(args.iter().map(|arg| arg.as_str()).collect(), true) {
        error!("{}", err);
        process::exit(1);
    }
}
