pub mod detach;
pub mod dispatch;
pub mod history;
pub mod show;

pub use dispatch::dispatch;
