use error_chain::ChainedError;

fn main() {
    if let Err(err) = savings_goals::run() {
        eprintln!("{}", err.display_chain());
        std::process::exit(1);
    }
}
