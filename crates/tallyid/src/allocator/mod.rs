mod file_lock;
mod interface;
mod lock;
mod mutex;
mod reservation;

pub use file_lock::*;
pub use interface::*;
pub use lock::*;
pub use mutex::*;
pub use reservation::*;
