use std::env;

/// FlexTimer settings read from the build environment, with their defaults.
///
/// Teensy 3.5/3.6 run the FTM modules from a 60 MHz bus clock. The clock timer
/// counts every bus cycle; the deadline timer divides by 16 so one overflow is
/// roughly 17.5 ms.
const SETTINGS: &[(&str, &str)] = &[
    ("FLEXTICK_BUS_CLOCK_HZ", "60000000"),
    ("FLEXTICK_CLOCK_PRESCALE", "1"),
    ("FLEXTICK_CLOCK_MODULO", "65535"),
    ("FLEXTICK_DEADLINE_PRESCALE", "16"),
    ("FLEXTICK_DEADLINE_MODULO", "65535"),
];

fn main() {
    for (name, default) in SETTINGS {
        if let Ok(value) = env::var(name) {
            println!("cargo:rustc-env={}={}", name, value);
            println!("cargo:warning=Using {} from environment: {}", name, value);
        } else {
            println!("cargo:rustc-env={}={}", name, default);
        }

        // Rerun if environment variables change
        println!("cargo:rerun-if-env-changed={}", name);
    }
}
