pub mod history;

pub use history::{FileHistoryStore, HistoryError};
