fn main() {
    create_conjoon::app::cli::run();
}
