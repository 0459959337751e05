fn main() {
    if let Err(err) = process_network::run() {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}
