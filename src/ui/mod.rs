pub mod legend;
pub mod map;
pub mod panels;
