pub mod storage;
pub mod types;

pub use storage::{get_history_path, load_history, save_history};
pub use types::{CalculationRecord, CalculationSubject, HistoryState};
