use crate::config::service_config_dir_path;
use serde::{Deserialize, Serialize};
use std::fs;
use std::marker::PhantomData;
use std::path::PathBuf;
use tracing::error;

/// `service/<name>.toml` 中的配置
///
/// 文件不存在或无法解析时, 备份原文件并写入默认配置
pub struct ServiceConfig<T> {
    path: PathBuf,
    service_name: &'static str,
    default_config: &'static [u8],
    _mark: PhantomData<T>,
}

impl<T> ServiceConfig<T>
where
    for<'a> T: Serialize + Deserialize<'a>,
    T: Default,
{
    pub fn new(name: &'static str, default: &'static [u8]) -> Self {
        Self::with_dir(service_config_dir_path().into(), name, default)
    }

    pub fn with_dir(dir: PathBuf, name: &'static str, default: &'static [u8]) -> Self {
        Self {
            path: dir.join(format!("{name}.toml")),
            default_config: default,
            service_name: name,
            _mark: PhantomData,
        }
    }

    pub fn read(&self) -> T {
        if self.path.is_file() {
            match fs::read(&self.path) {
                Ok(file) => toml::from_slice(&file).unwrap_or_else(|e| {
                    error!("读取配置文件({:?})失败: {e}", self.path);
                    let mut path = self.path.clone();
                    path.pop();
                    path.push(format!("{}.toml.bak", self.service_name));
                    let _ = fs::copy(&self.path, path);
                    self.write_default()
                }),
                Err(e) => {
                    error!("{e}");
                    self.write_default()
                }
            }
        } else {
            self.write_default()
        }
    }

    fn write_default(&self) -> T {
        if let Some(dir) = self.path.parent() {
            let _ = fs::create_dir_all(dir);
        }
        let _ = fs::write(&self.path, self.default_config);
        T::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::connect::{self, ConnectConfig};
    use std::env;

    fn temp_dir(name: &str) -> PathBuf {
        let dir = env::temp_dir().join(format!("atri_red_{name}_{}", std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        dir
    }

    #[test]
    fn writes_default_when_missing() {
        let dir = temp_dir("missing");
        let service = ServiceConfig::<ConnectConfig>::with_dir(
            dir.clone(),
            "connect",
            connect::DEFAULT_CONFIG,
        );

        let conf = service.read();
        assert!(conf.clients.is_empty());
        assert_eq!(
            fs::read(dir.join("connect.toml")).unwrap(),
            connect::DEFAULT_CONFIG
        );

        let _ = fs::remove_dir_all(dir);
    }

    #[test]
    fn backs_up_broken_file() {
        let dir = temp_dir("broken");
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("connect.toml"), "auto_reconnect = [").unwrap();

        let service = ServiceConfig::<ConnectConfig>::with_dir(
            dir.clone(),
            "connect",
            connect::DEFAULT_CONFIG,
        );
        let conf = service.read();

        assert!(conf.auto_reconnect);
        assert_eq!(
            fs::read_to_string(dir.join("connect.toml.bak")).unwrap(),
            "auto_reconnect = ["
        );

        let _ = fs::remove_dir_all(dir);
    }
}
