pub mod black_box;
pub mod colorize;
pub mod cpu_effect_engine;
pub mod emoji;
mod gaussian;
pub mod pixelate;
mod roi;
pub mod witness_protection;
