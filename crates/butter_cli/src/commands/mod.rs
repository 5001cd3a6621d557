pub mod design;
pub mod filter;
pub mod generate;
