pub mod grid;
pub mod noise;
pub mod rules;
pub mod seed;
pub mod stats;
pub mod sweep;
pub mod trial;
