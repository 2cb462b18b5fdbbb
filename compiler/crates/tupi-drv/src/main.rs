use clap::Parser;

use tupi_drv::{init_logging, run, Cli};

fn main() {
    let cli = Cli::parse();
    init_logging();

    match run(&cli.source, cli.memory_limit) {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            eprintln!("error: {e}");
            std::process::exit(1);
        }
    }
}
