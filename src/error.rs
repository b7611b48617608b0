use std::fmt::{Display, Formatter};
use std::io;

use tokio_tungstenite::tungstenite;

pub type RedResult<T> = Result<T, RedError>;

#[derive(Debug)]
pub enum RedError {
    IO(io::Error),
    Json(serde_json::Error),
    Http(reqwest::Error),
    WebSocket(tungstenite::Error),
    /// 拉取富媒体时服务端返回了非 2xx 状态码
    FetchStatus(u16),
    /// 配置的账号与连接上的账号不一致
    IdentityMismatch {
        configured: String,
        connected: String,
    },
    InvalidEndpoint(String),
}

impl Display for RedError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::IO(e) => write!(f, "IO错误: {e}"),
            Self::Json(e) => write!(f, "JSON解析错误: {e}"),
            Self::Http(e) => write!(f, "HTTP请求错误: {e}"),
            Self::WebSocket(e) => write!(f, "WebSocket错误: {e}"),
            Self::FetchStatus(code) => write!(f, "拉取富媒体失败, 状态码: {code}"),
            Self::IdentityMismatch {
                configured,
                connected,
            } => write!(
                f,
                "configured selfId is {configured}, but the currently connected account is {connected}"
            ),
            Self::InvalidEndpoint(ep) => write!(f, "无效的地址: {ep}"),
        }
    }
}

impl std::error::Error for RedError {}

impl From<io::Error> for RedError {
    fn from(err: io::Error) -> Self {
        Self::IO(err)
    }
}

impl From<serde_json::Error> for RedError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err)
    }
}

impl From<reqwest::Error> for RedError {
    fn from(err: reqwest::Error) -> Self {
        Self::Http(err)
    }
}

impl From<tungstenite::Error> for RedError {
    fn from(err: tungstenite::Error) -> Self {
        Self::WebSocket(err)
    }
}
