pub mod data;

pub use data::color::CellColor;
pub use data::position::Position;
