//! Version command

/// Run the version command.
pub fn run() {
    println!("esx {}", env!("CARGO_PKG_VERSION"));
}
