//! Red 协议的 WebSocket 帧

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::RedResult;
use crate::protocol::message::RawMessage;

mod de;
pub mod message;

pub const META_CONNECT: &str = "meta::connect";
pub const MESSAGE_RECV: &str = "message::recv";
pub const MESSAGE_POKE: &str = "message::poke";

/// 未经解析的帧: `{ type, payload }`
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct RawFrame {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub payload: Value,
}

impl RawFrame {
    pub fn from_json(s: &str) -> RedResult<Self> {
        Ok(serde_json::from_str(s)?)
    }

    /// 第一条 payload, 用于透传
    pub fn first_payload(&self) -> Value {
        match &self.payload {
            Value::Array(arr) => arr.first().cloned().unwrap_or(Value::Null),
            or => or.clone(),
        }
    }

    pub fn parse(self) -> RedResult<Frame> {
        let frame = match self.kind.as_str() {
            META_CONNECT => Frame::Connect(serde_json::from_value(self.payload)?),
            MESSAGE_RECV => Frame::MessageRecv(RecvBatch::from_payload(self.payload)),
            MESSAGE_POKE => Frame::Poke(self.first_payload()),
            _ => Frame::Unknown(self.kind),
        };

        Ok(frame)
    }
}

#[derive(Debug, Clone)]
pub enum Frame {
    Connect(MetaConnect),
    MessageRecv(RecvBatch),
    Poke(Value),
    Unknown(String),
}

/// `message::recv` 的 payload, 只解析第一条记录, 其余记录只计数
#[derive(Debug, Clone, Default)]
pub struct RecvBatch {
    first: Option<Value>,
    extra: usize,
}

impl RecvBatch {
    pub fn from_payload(payload: Value) -> Self {
        match payload {
            Value::Array(records) => {
                let extra = records.len().saturating_sub(1);
                Self {
                    first: records.into_iter().next(),
                    extra,
                }
            }
            _ => Self::default(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.first.is_none()
    }

    /// 未被处理的记录数
    pub fn extra(&self) -> usize {
        self.extra
    }

    /// 第一条记录的索引键, 即使记录的其余字段无法解析
    pub fn key(&self) -> Option<MessageKey> {
        self.first
            .as_ref()
            .and_then(|v| MessageKey::deserialize(v).ok())
    }

    pub fn message(&self) -> RedResult<Option<RawMessage>> {
        match &self.first {
            Some(v) => Ok(Some(RawMessage::deserialize(v)?)),
            None => Ok(None),
        }
    }
}

/// 写入 seq 索引所需的字段
#[derive(Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(default, rename_all = "camelCase")]
pub struct MessageKey {
    #[serde(deserialize_with = "de::string")]
    pub msg_id: String,
    #[serde(deserialize_with = "de::string")]
    pub msg_seq: String,
    #[serde(deserialize_with = "de::string")]
    pub peer_uin: String,
}

/// `meta::connect` 的响应
#[derive(Deserialize, Debug, Clone, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct MetaConnect {
    #[serde(deserialize_with = "de::string")]
    pub version: String,
    #[serde(deserialize_with = "de::string")]
    pub name: String,
    pub auth_data: AuthData,
}

#[derive(Deserialize, Debug, Clone, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct AuthData {
    #[serde(deserialize_with = "de::string")]
    pub uin: String,
    #[serde(deserialize_with = "de::string")]
    pub uid: String,
    #[serde(deserialize_with = "de::string")]
    pub nick_name: String,
}

#[derive(Serialize)]
struct OutboundFrame<'a, T> {
    #[serde(rename = "type")]
    kind: &'a str,
    payload: T,
}

#[derive(Serialize)]
struct ConnectRequest<'a> {
    token: &'a str,
}

pub fn gen_pack<T: Serialize>(kind: &str, payload: T) -> RedResult<String> {
    Ok(serde_json::to_string(&OutboundFrame { kind, payload })?)
}

/// 建立连接后发送的握手帧
pub fn connect_request(token: &str) -> RedResult<String> {
    gen_pack(META_CONNECT, ConnectRequest { token })
}
