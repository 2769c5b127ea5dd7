fn main() {
    if let Err(err) = docchat::cli::main() {
        eprintln!("❌ {err}");
        std::process::exit(1);
    }
}
