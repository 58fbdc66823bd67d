mod upload_config;

pub use upload_config::{
    MinTlsVersion,
    UploadConfig,
    load_or_default_config,
};
