use std::path::Path;

pub mod connect;
pub mod log;
pub mod service;

const SERVICE_CONFIG_PATH: &str = "service";

pub fn service_config_dir_path() -> &'static Path {
    Path::new(SERVICE_CONFIG_PATH)
}
