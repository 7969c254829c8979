fn main() {
    workshop_manager::run_cli();
}
