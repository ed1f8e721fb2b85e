fn main() {
    // Only the device build needs the ESP-IDF environment; host test builds
    // compile without the optional embuild dependency.
    #[cfg(feature = "espidf")]
    embuild::espidf::sysenv::output();
}
