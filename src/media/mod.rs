use async_trait::async_trait;
use bytes::Bytes;
use serde::Serialize;
use tracing::debug;

use crate::error::{RedError, RedResult};

pub mod sniff;

pub const FETCH_RICH_MEDIA: &str = "/message/fetchRichMedia";

/// 定位一个富媒体元素
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct MediaRequest {
    pub msg_id: String,
    pub chat_type: i32,
    pub peer_uid: String,
    pub element_id: String,
}

/// 拉取图片, 语音等富媒体的原始数据
#[async_trait]
pub trait MediaFetcher: Send + Sync {
    async fn fetch(&self, request: &MediaRequest) -> RedResult<Bytes>;
}

/// 通过 `POST /message/fetchRichMedia` 拉取
#[derive(Debug, Clone)]
pub struct HttpMediaFetcher {
    client: reqwest::Client,
    url: String,
    token: String,
}

impl HttpMediaFetcher {
    pub fn new(client: reqwest::Client, endpoint: &str, token: &str) -> Self {
        Self {
            client,
            url: format!("{}{}", endpoint.trim_end_matches('/'), FETCH_RICH_MEDIA),
            token: token.to_owned(),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl MediaFetcher for HttpMediaFetcher {
    async fn fetch(&self, request: &MediaRequest) -> RedResult<Bytes> {
        debug!("拉取富媒体: {:?}", request);

        let resp = self
            .client
            .post(&self.url)
            .bearer_auth(&self.token)
            .json(request)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            return Err(RedError::FetchStatus(status.as_u16()));
        }

        Ok(resp.bytes().await?)
    }
}
