//! Default configuration values

use serde::{Deserialize, Serialize};

/// Default configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigDefaults {
    pub buffers: BufferDefaults,
    pub logging: LoggingDefaults,
}

/// Default buffer sizing per query category.
///
/// Each hint is the initial allocation for that category; the growable
/// adapter expands from there. `max_capacity` caps every category.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BufferDefaults {
    pub token_information: usize,
    pub object_types: usize,
    pub handle_table: usize,
    pub max_capacity: usize,
}

/// Default logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingDefaults {
    pub level: String,
    pub file: String,
}

/// Returns the default configuration
pub fn default_config() -> ConfigDefaults {
    ConfigDefaults {
        buffers: BufferDefaults {
            token_information: 4096,
            object_types: 65536,     // 64KB, typically enough for one shot
            handle_table: 1048576,   // 1MB, the table is large on busy systems
            max_capacity: 536870912, // 512MB hard cap
        },
        logging: LoggingDefaults {
            level: "info".to_string(),
            file: "ntquery.log".to_string(),
        },
    }
}
