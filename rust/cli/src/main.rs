use evohold_arena::logging::{init_logging, DEFAULT_FILTER};

fn main() {
    let _ = init_logging(DEFAULT_FILTER);
    let mut out = std::io::stdout();
    let mut err = std::io::stderr();
    let code = evohold_cli::run(std::env::args(), &mut out, &mut err);
    std::process::exit(code);
}
