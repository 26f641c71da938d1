//! Low-level peripheral bring-up shared by the sensor drivers.

pub mod hw_init;
