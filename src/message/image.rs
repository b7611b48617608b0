use bytes::Bytes;
use serde::{Deserialize, Serialize};

/// 语音统一以此类型交付
pub const OCTET_STREAM: &str = "application/octet-stream";

/// 拉取到的图片或语音
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct Media {
    pub data: Bytes,
    pub mime: String,
}

impl Media {
    pub fn new<M: Into<String>>(data: Bytes, mime: M) -> Self {
        Self {
            data,
            mime: mime.into(),
        }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}
