//! Persistent named cooldown timers.
//!
//! ```no_run
//! use cooldowns::{CooldownStore, JsonFileAttributes};
//!
//! let mut attributes = JsonFileAttributes::open("griselda.json")?;
//! let mut store = CooldownStore::new(&mut attributes)?;
//! if store.ready(["attack"]) {
//!     store.set("attack", 5)?;
//! }
//! # Ok::<(), cooldowns::Error>(())
//! ```

pub mod attributes;
pub mod clock;
pub mod cooldowns;
pub mod error;

pub use attributes::{AttributeStorage, JsonFileAttributes, MemoryAttributes};
pub use clock::{Clock, ManualClock, SystemClock};
pub use cooldowns::{CooldownStore, DEFAULT_ATTRIBUTE};
pub use error::{Error, Result};
