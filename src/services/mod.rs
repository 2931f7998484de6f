pub mod media_host;
pub mod proxy;

pub use media_host::{CloudinaryHost, MediaError, MediaHost, UploadFile, UploadedAsset};
pub use proxy::{BackendClient, ProxyError};
