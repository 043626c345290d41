pub mod club_coefficient;
pub mod dataset;
pub mod nation_coefficient;
pub mod ranking_export;
pub mod rankings;
pub mod state;
