//! Adapters: concrete implementations of the hexagonal port traits.
//!
//! | Adapter    | Implements         | Connects to              |
//! |------------|--------------------|--------------------------|
//! | `http`     | (driving)          | ESP-IDF httpd            |
//! | `log_sink` | EventSink          | Serial log output        |
//! | `nvs`      | ConfigPort         | NVS / in-memory store    |
//! | `time`     | TimePort           | ESP32 system timer       |
//! | `wifi`     | ConnectivityPort   | ESP-IDF WiFi STA         |

pub mod http;
pub mod log_sink;
pub mod nvs;
pub mod time;
pub mod wifi;
