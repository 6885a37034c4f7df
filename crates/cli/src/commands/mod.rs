pub mod inspect;
pub mod split;
pub mod verify;

pub use inspect::{info_command, layout_command};
pub use split::split_command;
pub use verify::verify_command;
