pub mod availability;
pub mod table_search;
