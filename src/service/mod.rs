pub mod backup;
pub mod hash;
pub mod locator;
pub mod replace;
pub mod resources;
