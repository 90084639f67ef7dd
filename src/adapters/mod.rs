//! Adapters: concrete implementations of the hexagonal port traits.
//!
//! | Adapter       | Implements        | Connects to                  |
//! |---------------|-------------------|------------------------------|
//! | `hardware`    | LightSensorPort   | Photodiode driver            |
//! |               | IndicatorPort     | Status LED driver            |
//! | `sysfs_gpio`  | GpioBank          | `/sys/class/gpio`            |
//! | `iio_adc`     | AdcChannel        | IIO `in_voltageN_raw` file   |
//! | `log_sink`    | EventSink         | Console log output           |
//! | `csv_sink`    | EventSink         | `photodiode.csv` in run dir  |
//! | `time`        | Clock, DelayNs    | `std::time`, thread sleep    |
//! | `config_file` | ConfigPort        | JSON file                    |
//! | `run_dir`     | (none)            | Timestamped output folder    |

pub mod config_file;
pub mod csv_sink;
pub mod hardware;
pub mod iio_adc;
pub mod log_sink;
pub mod run_dir;
pub mod sysfs_gpio;
pub mod time;
