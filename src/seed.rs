//! 演示和压测数据的生成

mod fixtures;
mod generator;
mod profile;

pub use self::{
    generator::Seeder,
    profile::{Profile, SeedConfig},
};
