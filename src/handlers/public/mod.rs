pub mod media;
pub mod proxy;
