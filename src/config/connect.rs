use std::path::PathBuf;

use serde::{Deserialize, Serialize};

pub const DEFAULT_CONFIG: &[u8] = include_bytes!("../../default_config/connect.toml");

/// 连接配置
#[derive(Deserialize, Serialize, Debug)]
pub struct ConnectConfig {
    /// 是否自动重连
    #[serde(default = "true_bool")]
    pub auto_reconnect: bool,
    /// 重连间隔, 单位为秒
    #[serde(default = "default_reconnect_interval")]
    pub reconnect_interval: u64,
    /// 表情数据文件
    #[serde(default)]
    pub face_table: Option<PathBuf>,
    #[serde(default)]
    pub cache: CacheConfig,
    /// 所有配置进行连接的客户端
    #[serde(default, rename = "client")]
    pub clients: Vec<ClientConfig>,
}

impl Default for ConnectConfig {
    fn default() -> Self {
        Self {
            auto_reconnect: true,
            reconnect_interval: default_reconnect_interval(),
            face_table: None,
            cache: CacheConfig::default(),
            clients: vec![],
        }
    }
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct CacheConfig {
    /// 最多保留的记录数
    #[serde(default = "default_capacity")]
    pub capacity: usize,
    /// 记录存活时间, 单位为秒, 为 0 时不过期
    #[serde(default = "default_ttl")]
    pub ttl: Option<u64>,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            capacity: default_capacity(),
            ttl: default_ttl(),
        }
    }
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct ClientConfig {
    /// 账号, 需与连接上的账号一致
    pub account: String,
    /// HTTP 接口地址, WebSocket 地址由其 host 推导
    pub endpoint: String,
    /// 鉴权 token
    #[serde(default)]
    pub token: String,
    /// 事件中标注的平台名
    #[serde(default = "default_platform")]
    pub platform: String,
    /// 是否进行连接
    #[serde(default = "true_bool")]
    pub auto_connect: bool,
    /// 是否额外广播未经处理的消息
    #[serde(default)]
    pub forward_raw: bool,
}

const fn true_bool() -> bool {
    true
}

const fn default_reconnect_interval() -> u64 {
    5
}

const fn default_capacity() -> usize {
    10000
}

const fn default_ttl() -> Option<u64> {
    Some(86400)
}

fn default_platform() -> String {
    "red".into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_parses() {
        let conf: ConnectConfig = toml::from_slice(DEFAULT_CONFIG).unwrap();
        let default = ConnectConfig::default();

        assert_eq!(conf.auto_reconnect, default.auto_reconnect);
        assert_eq!(conf.reconnect_interval, default.reconnect_interval);
        assert_eq!(conf.cache.capacity, default.cache.capacity);
        assert_eq!(conf.cache.ttl, default.cache.ttl);
        assert!(conf.clients.is_empty());
    }

    #[test]
    fn client_defaults() {
        let conf: ConnectConfig = toml::from_str(
            r#"
            [[client]]
            account = "10001"
            endpoint = "http://127.0.0.1:16530/api"
            "#,
        )
        .unwrap();

        let client = &conf.clients[0];
        assert_eq!(client.account, "10001");
        assert_eq!(client.platform, "red");
        assert!(client.auto_connect);
        assert!(!client.forward_raw);
        assert!(client.token.is_empty());
    }
}
