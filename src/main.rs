//! Prints the version and the advertised methods of the rig-control daemon at
//! `127.0.0.1:12345`. Set `RUST_LOG=debug` to see the calls being made.

use rigprobe::probe;
use rigprobe::Endpoint;

use std::error::Error;
use std::io;
use std::process;

fn main() {
    env_logger::init();

    let stdout = io::stdout();
    if let Err(err) = probe::run(&Endpoint::default(), &mut stdout.lock()) {
        eprintln!("error: {}", err);

        let mut source = err.source();
        while let Some(cause) = source {
            eprintln!("  caused by: {}", cause);
            source = cause.source();
        }

        process::exit(1);
    }
}
