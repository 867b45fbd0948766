fn main() {
    rsyntax::cli::run();
}
