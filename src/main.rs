fn main() {
    if let Err(e) = sahayak::cli::main() {
        eprintln!("{e}");
        std::process::exit(1);
    }
}
