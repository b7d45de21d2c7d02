//! Adapters: concrete implementations of the hexagonal port traits.
//!
//! | Adapter       | Implements         | Connects to                    |
//! |---------------|--------------------|--------------------------------|
//! | `hardware`    | SensorPort         | HC-SR04, LDR (or sim drivers)  |
//! |               | IlluminationPort   | LED strip enable + LEDC PWM    |
//! | `imaging`     | ImagingPort        | nothing (camera-less board)    |
//! | `log_sink`    | EventSink          | Serial / stderr log            |
//! |               | StatusSink         | Serial / stderr log            |
//! | `config_file` | ConfigPort         | Built-in defaults, JSON file   |
//! | `time`        | TimePort           | esp_timer / std Instant        |
//! | `sim`         | sensor drivers     | Scripted host simulation       |
//! |               | ImagingPort        |                                |

pub mod config_file;
pub mod hardware;
pub mod imaging;
pub mod log_sink;
pub mod sim;
pub mod time;
