fn main() {
    if let Err(err) = l2::cli::run() {
        eprintln!("Error: {err:?}");
        std::process::exit(1);
    }
}
