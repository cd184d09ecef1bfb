//! One module per `driveseal` subcommand.

pub mod completions;
pub mod digest;
pub mod inspect;
pub mod open;
pub mod seal;
pub mod verify;
pub mod version;
