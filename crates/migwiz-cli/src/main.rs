fn main() {
    if let Err(error) = migwiz_cli::run() {
        eprintln!("Error: {error:#}");
        std::process::exit(1);
    }
}
