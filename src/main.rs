fn main() {
    if let Err(err) = vehicle_state::app::run() {
        eprintln!("vehicle state report failed: {err}");
        std::process::exit(1);
    }
}
