mod brew;
mod drink;

pub use brew::{Brew, BrewPatch, FreshnessBand, PressurePhase};
pub use drink::{load_image_data_uri, Drink, DrinkPatch, ImageError};
