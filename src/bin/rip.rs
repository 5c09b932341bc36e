fn main() {
    rip::cli::run();
}
