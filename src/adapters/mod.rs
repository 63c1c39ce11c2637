//! Adapters: concrete implementations of the hexagonal port traits.
//!
//! | Adapter        | Implements                     | Connects to                 |
//! |----------------|--------------------------------|-----------------------------|
//! | `hardware`     | InputPort, IndicatorPort,      | Simulated GPIO, ADC, buzzer |
//! |                | TonePort, DrawSurface, DelayNs | and SSD1306 page buffer     |
//! |                | SmartLedsWrite (`SimLedBus`)   | Simulated LED strip         |
//! | `log_sink`     | EventSink                      | `log` facade                |
//! | `config_file`  | ConfigPort                     | JSON file on disk           |
//! | `time`         | ClockPort                      | Host monotonic + wall clock |

pub mod config_file;
pub mod hardware;
pub mod log_sink;
pub mod time;
