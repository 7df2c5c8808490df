pub mod boxes;
pub mod dataset;
pub mod derived;
pub mod point_color;
pub mod providers;
pub mod selection;
