pub mod log_sink;
pub mod roster;
pub mod store;

pub use log_sink::{write_battle_log, LogSinkError};
pub use roster::{load_roster, RosterError, RosterFile};
pub use store::{CharacterStore, StoreError, StoredCharacter};
