pub mod artist;
pub mod panels;
pub mod plot;
pub mod tables;
