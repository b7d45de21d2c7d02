fn main() {
    // ESP-IDF link arguments are only needed for the firmware build; the host
    // simulation and test builds have no native dependencies.
    #[cfg(feature = "espidf")]
    embuild::espidf::sysenv::output();
}
