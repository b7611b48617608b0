pub mod info;

use std::fmt::{Debug, Display, Formatter};
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Duration;

use futures::{SinkExt, StreamExt};
use reqwest::Url;
use tokio_tungstenite::tungstenite::protocol::frame::coding::CloseCode;
use tokio_tungstenite::tungstenite::protocol::CloseFrame;
use tokio_tungstenite::tungstenite::Message as WsMessage;
use tracing::{error, info, warn};

use crate::adapter::Adapter;
use crate::cache::SequenceIndex;
use crate::client::info::AccountInfo;
use crate::config::connect::{ClientConfig, ConnectConfig};
use crate::error::{RedError, RedResult};
use crate::event::{global_sender, Event, EventKind, InternalEvent};
use crate::global_status;
use crate::media::HttpMediaFetcher;
use crate::message::face::FaceLookup;
use crate::protocol::{connect_request, Frame, MetaConnect, RawFrame, MESSAGE_RECV};

#[derive(Clone)]
pub struct Client(Arc<imp::Client>);

impl Client {
    pub fn new(
        config: ClientConfig,
        connect: &ConnectConfig,
        faces: Arc<dyn FaceLookup>,
    ) -> RedResult<Self> {
        let ws_url = ws_url(&config.endpoint)?;
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;
        let fetcher = HttpMediaFetcher::new(http, &config.endpoint, &config.token);

        let imp = imp::Client {
            ws_url,
            fetcher: Arc::new(fetcher),
            faces,
            cache: connect.cache.clone(),
            auto_reconnect: connect.auto_reconnect,
            reconnect_interval: Duration::from_secs(connect.reconnect_interval),
            online: false.into(),
            info: Default::default(),
            config,
        };

        Ok(Self(Arc::new(imp)))
    }

    pub fn find(id: &str) -> Option<Self> {
        global_status().clients.get(id).map(|c| c.clone())
    }

    #[inline]
    pub fn id(&self) -> &str {
        &self.0.config.account
    }

    pub fn platform(&self) -> &str {
        &self.0.config.platform
    }

    pub fn ws_url(&self) -> &str {
        &self.0.ws_url
    }

    pub fn is_online(&self) -> bool {
        self.0.online.load(Ordering::Relaxed)
    }

    pub fn account_info(&self) -> Option<AccountInfo> {
        self.0.info.read().ok().and_then(|info| info.clone())
    }

    /// 每次连接使用新的适配器, 引用索引随之重建
    fn new_adapter(&self) -> Adapter {
        Adapter::new(
            self.id().to_owned(),
            self.platform().to_owned(),
            SequenceIndex::from_config(&self.0.cache),
            self.0.fetcher.clone(),
            self.0.faces.clone(),
        )
    }

    fn dispatch(&self, event: Event) {
        // 没有接收者时发送失败, 无需处理
        let _ = global_sender().send(event);
    }

    fn set_online(&self, connect: &MetaConnect) {
        let info = AccountInfo::from(connect);
        info!(
            "{}已上线, 昵称: {}, 协议端: {} {}",
            self, info.nickname, info.implementation, info.version
        );

        if let Ok(mut lock) = self.0.info.write() {
            *lock = Some(info);
        }
        self.0.online.store(true, Ordering::Relaxed);
    }

    /// 连接并处理事件, 直到账号不一致或不再重连
    pub async fn start(&self) -> RedResult<()> {
        loop {
            let result = self.connect().await;
            self.0.online.store(false, Ordering::Relaxed);

            match result {
                Err(e @ RedError::IdentityMismatch { .. }) => return Err(e),
                Err(e) => error!("{}连接断开: {}", self, e),
                Ok(()) => warn!("{}下线", self),
            }

            if !self.0.auto_reconnect {
                return Ok(());
            }

            tokio::time::sleep(self.0.reconnect_interval).await;
            info!("{}尝试重连", self);
        }
    }

    async fn connect(&self) -> RedResult<()> {
        let (stream, _) = tokio_tungstenite::connect_async(self.ws_url()).await?;
        info!("{}已连接至{}", self, self.ws_url());

        let (mut sink, mut stream) = stream.split();
        sink.send(WsMessage::Text(connect_request(&self.0.config.token)?))
            .await?;

        let mut adapter = self.new_adapter();

        while let Some(msg) = stream.next().await {
            let text = match msg? {
                WsMessage::Text(text) => text,
                WsMessage::Close(frame) => {
                    warn!("{}连接被关闭: {:?}", self, frame);
                    break;
                }
                _ => continue,
            };

            let raw = match RawFrame::from_json(&text) {
                Ok(raw) => raw,
                Err(e) => {
                    warn!("{}收到无法解析的数据: {}", self, e);
                    continue;
                }
            };

            if self.0.config.forward_raw && raw.kind == MESSAGE_RECV {
                self.dispatch(Event::new(
                    self.id(),
                    self.platform(),
                    EventKind::Internal(InternalEvent::message(raw.first_payload())),
                ));
            }

            let frame = match raw.parse() {
                Ok(frame) => frame,
                Err(e) => {
                    error!("{}解析消息失败: {}", self, e);
                    continue;
                }
            };

            if let Frame::Connect(connect) = &frame {
                if let Err(e) = adapter.verify_connect(connect) {
                    error!("{}: {}", self, e);
                    sink.send(WsMessage::Close(Some(CloseFrame {
                        code: CloseCode::Policy,
                        reason: e.to_string().into(),
                    })))
                    .await?;
                    return Err(e);
                }

                self.set_online(connect);
                continue;
            }

            match adapter.adapt(&frame).await {
                Ok(Some(event)) => self.dispatch(event),
                Ok(None) => {}
                Err(e) => error!("{}处理消息失败: {}", self, e),
            }
        }

        Ok(())
    }
}

/// 由 HTTP 地址推导 WebSocket 地址, 只保留 host 与端口
pub fn ws_url(endpoint: &str) -> RedResult<String> {
    let invalid = || RedError::InvalidEndpoint(endpoint.to_owned());

    let url = Url::parse(endpoint).map_err(|_| invalid())?;
    let scheme = if url.scheme() == "https" { "wss" } else { "ws" };
    let host = url.host_str().ok_or_else(invalid)?;

    let ws = match url.port() {
        Some(port) => format!("{scheme}://{host}:{port}"),
        None => format!("{scheme}://{host}"),
    };

    Ok(ws)
}

impl Debug for Client {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client")
            .field("id", &self.id())
            .field("ws_url", &self.ws_url())
            .field("online", &self.is_online())
            .finish()
    }
}

impl Display for Client {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "Client({})", self.id())
    }
}

mod imp {
    use std::sync::atomic::AtomicBool;
    use std::sync::{Arc, RwLock};
    use std::time::Duration;

    use crate::client::info::AccountInfo;
    use crate::config::connect::{CacheConfig, ClientConfig};
    use crate::media::HttpMediaFetcher;
    use crate::message::face::FaceLookup;

    pub struct Client {
        pub config: ClientConfig,
        pub ws_url: String,
        pub fetcher: Arc<HttpMediaFetcher>,
        pub faces: Arc<dyn FaceLookup>,
        pub cache: CacheConfig,
        pub auto_reconnect: bool,
        pub reconnect_interval: Duration,
        pub online: AtomicBool,
        pub info: RwLock<Option<AccountInfo>>,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::face::FaceTable;

    #[test]
    fn ws_url_from_endpoint() {
        assert_eq!(
            ws_url("http://127.0.0.1:16530/api").unwrap(),
            "ws://127.0.0.1:16530"
        );
        assert_eq!(
            ws_url("https://red.example.com/api/").unwrap(),
            "wss://red.example.com"
        );
        assert!(matches!(
            ws_url("not a url"),
            Err(RedError::InvalidEndpoint(_))
        ));
    }

    #[test]
    fn registry() {
        let config = ClientConfig {
            account: "registry-test".into(),
            endpoint: "http://127.0.0.1:16530/api".into(),
            token: String::new(),
            platform: "red".into(),
            auto_connect: true,
            forward_raw: false,
        };
        let client = Client::new(
            config,
            &ConnectConfig::default(),
            Arc::new(FaceTable::builtin()),
        )
        .unwrap();

        assert!(!client.is_online());
        assert_eq!(client.to_string(), "Client(registry-test)");

        global_status().add_client(client);
        assert!(Client::find("registry-test").is_some());
        assert!(global_status().remove_client("registry-test").is_some());
        assert!(Client::find("registry-test").is_none());
    }
}
