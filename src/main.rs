use std::env;
use std::process;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use sigsh::cli::Cli;
use sigsh::config::{Config, USAGE};
use sigsh::reader::LineReader;
use sigsh::sigsh::{Sigsh, BANNER};
use sigsh::Session;

fn main() {
    let config = Config::load(env::args().skip(1)).unwrap_or_else(|e| {
        eprintln!("sigsh: {}", e);
        eprint!("{}", USAGE);
        process::exit(1);
    });
    if config.show_help {
        print!("{}", USAGE);
        return;
    }

    let filter = env::var("RUST_LOG").unwrap_or_else(|_| config.default_log_filter().to_owned());
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();

    let session = Session::init().unwrap_or_else(|e| {
        error!("{}", e);
        process::exit(1);
    });
    info!(
        pgid = session.shell_pgid().as_raw(),
        interactive = session.is_interactive(),
        "session ready"
    );

    if config.banner {
        println!("{}", BANNER);
    }

    let sh = Sigsh::new(&config, session);
    let mut client = Cli::new(Box::new(sh));
    client.go(&mut LineReader::stdin());
}
