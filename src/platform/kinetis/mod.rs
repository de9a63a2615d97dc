//! Kinetis K-series (Teensy 3.5/3.6) platform implementation

pub mod ftm;

pub use ftm::{FlexTimer, FtmInstance};
