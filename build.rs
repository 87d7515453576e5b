fn main() {
    // ESP-IDF link arguments are only meaningful for device builds; host
    // builds (tests, simulation) must not inherit them.
    if std::env::var("CARGO_FEATURE_ESPIDF").is_ok() {
        embuild::espidf::sysenv::output();
    }
}
