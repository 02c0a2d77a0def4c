fn main() {
    energy_counter::run();
}
