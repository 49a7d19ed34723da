pub mod pdf;
pub mod percentiles_txt;
pub mod svg;
