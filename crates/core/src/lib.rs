pub mod config;
pub mod error;
pub mod item;
pub mod timer;

pub use config::{load_dotenv, HttpConfig, PoolConfig, MAX_WORKERS};
pub use error::*;
pub use item::{Numeric, WorkItem};
pub use timer::{format_secs, Timer};
