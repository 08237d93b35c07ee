pub mod formatter;
pub mod report;

pub use formatter::{
    display_bonuses, format_atar, format_breakdown, format_catalog_table, format_history_table,
    format_record_detail, format_recommendations, format_result, format_tsv, should_use_colors,
};
pub use report::{render_report, report_date, report_file_name, write_report, ReportContext};
