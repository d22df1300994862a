fn main() {
    if let Err(err) = puku::cli::main() {
        eprintln!("❌ Error: {err}");
        std::process::exit(1);
    }
}
