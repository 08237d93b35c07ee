pub mod sheet;
pub mod types;

pub use sheet::{add_pairs, build_selection, load_sheet, parse_subject_arg, SelectionSheet, SheetEntry};
pub use types::{
    validate_raw_score, Selection, SelectionEntry, SelectionError, MAX_RAW_SCORE, MIN_RAW_SCORE,
};
