//! Pure peripheral logic shared by the adapters.

pub mod button;
