mod line;
mod product;

pub use line::*;
pub use product::*;
