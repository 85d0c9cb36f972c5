pub mod score_report;
pub mod scouting_form;
