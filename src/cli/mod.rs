//! CLI command implementations.
//!
//! Each submodule implements one group of commands. Output is written to a
//! caller-supplied writer so commands can be exercised in tests.
//!
//! # Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `serve` | Run the HTML UI |
//! | `init` | Create the backing store |
//! | `list` | List forecasts by date |
//! | `get` | Show one forecast |
//! | `add` | Create a forecast |
//! | `update` | Replace a forecast |
//! | `delete` | Delete a forecast |
//! | `summaries` | List suggested summary labels |
//! | `config` | Show the effective configuration |
//!
//! # Example Usage
//!
//! ```bash
//! forecasts add --date 2024-01-01 --temp 20 --summary Mild
//! forecasts list --json
//! forecasts serve --port 8080
//! ```

mod config;
mod forecast;
mod serve;

pub use config::{cmd_config, cmd_init};
pub use forecast::{
    OutputFormat, cmd_add, cmd_delete, cmd_get, cmd_list, cmd_summaries, cmd_update, write_detail,
    write_json, write_table,
};
pub use serve::cmd_serve;

use crate::Error;

/// Maps an output failure to a crate error.
#[allow(clippy::needless_pass_by_value)]
fn write_failed(e: std::io::Error) -> Error {
    Error::OperationFailed {
        operation: "write_output".to_string(),
        cause: e.to_string(),
    }
}
