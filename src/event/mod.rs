use std::fmt::{Display, Formatter};
use std::sync::OnceLock;

use serde::Serialize;
use serde_json::Value;
use tokio::sync::broadcast::{channel, Receiver, Sender};

use crate::contact::group::{resolve_guild_channel, Channel, Guild};
use crate::contact::member::Member;
use crate::contact::User;
use crate::message::assemble::timestamp_millis;
use crate::message::Message;
use crate::protocol::message::RawMessage;

pub mod classify;

pub const UNSAFE_NOTIFY: &str = "red/unsafe-notify";
pub const UNSAFE_MESSAGE: &str = "red/unsafe-message";

static GLOBAL_EVENT_CHANNEL: OnceLock<Sender<Event>> = OnceLock::new();

pub fn global_sender() -> &'static Sender<Event> {
    GLOBAL_EVENT_CHANNEL.get_or_init(|| {
        let channel = channel(128);

        channel.0
    })
}

pub fn global_receiver() -> Receiver<Event> {
    global_sender().subscribe()
}

/// 归一化后的事件
#[derive(Serialize, Debug, Clone)]
pub struct Event {
    pub self_id: String,
    pub platform: String,
    #[serde(flatten)]
    pub kind: EventKind,
}

#[derive(Serialize, Debug, Clone)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum EventKind {
    Message(MessageEvent),
    GuildMemberAdded(GuildMemberAddedEvent),
    GuildFileAdded(GuildFileAddedEvent),
    Internal(InternalEvent),
}

impl Event {
    pub fn new(self_id: &str, platform: &str, kind: EventKind) -> Self {
        Self {
            self_id: self_id.to_owned(),
            platform: platform.to_owned(),
            kind,
        }
    }

    pub fn as_message(&self) -> Option<&MessageEvent> {
        match &self.kind {
            EventKind::Message(e) => Some(e),
            _ => None,
        }
    }
}

#[derive(Serialize, Debug, Clone)]
pub struct MessageEvent {
    pub direct: bool,
    pub message: Message,
    pub user: User,
    pub member: Member,
    /// 毫秒
    pub timestamp: i64,
    pub guild: Option<Guild>,
    pub channel: Channel,
}

impl MessageEvent {
    pub fn subtype(&self) -> &'static str {
        if self.direct {
            "private"
        } else {
            "group"
        }
    }
}

/// 通知类事件共有的字段
#[derive(Serialize, Debug, Clone)]
pub struct NoticeMeta {
    pub message_id: String,
    pub timestamp: i64,
    pub user_id: String,
    pub direct: bool,
    pub guild: Option<Guild>,
    pub channel: Channel,
}

impl NoticeMeta {
    pub fn from_message(data: &RawMessage) -> Self {
        let (guild, channel) = resolve_guild_channel(data);

        Self {
            message_id: data.msg_id.clone(),
            timestamp: timestamp_millis(data.msg_time),
            user_id: data.sender_uin.clone(),
            direct: guild.is_none(),
            guild,
            channel,
        }
    }
}

#[derive(Serialize, Debug, Clone)]
pub struct GuildMemberAddedEvent {
    #[serde(flatten)]
    pub meta: NoticeMeta,
    pub operator_id: String,
    pub user: User,
}

#[derive(Serialize, Debug, Clone)]
pub struct GuildFileAddedEvent {
    #[serde(flatten)]
    pub meta: NoticeMeta,
}

/// 未经归一化, 原样透传的数据
#[derive(Serialize, Debug, Clone)]
pub struct InternalEvent {
    pub kind: String,
    pub data: Value,
}

impl InternalEvent {
    pub fn notify(data: Value) -> Self {
        Self {
            kind: UNSAFE_NOTIFY.into(),
            data,
        }
    }

    pub fn message(data: Value) -> Self {
        Self {
            kind: UNSAFE_MESSAGE.into(),
            data,
        }
    }
}

impl Display for Event {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] ", self.self_id)?;

        match &self.kind {
            EventKind::Message(e) => match &e.guild {
                Some(guild) => write!(
                    f,
                    "群 {}({}) {}({}): {}",
                    guild.name, guild.id, e.member.name, e.user.id, e.message
                ),
                None => write!(f, "私聊 {}: {}", e.user, e.message),
            },
            EventKind::GuildMemberAdded(e) => write!(
                f,
                "{} 加入了 {} (操作者: {})",
                e.user, e.meta.channel.id, e.operator_id
            ),
            EventKind::GuildFileAdded(e) => write!(
                f,
                "{} 在 {} 上传了文件",
                e.meta.user_id, e.meta.channel.id
            ),
            EventKind::Internal(e) => write!(f, "{}: {}", e.kind, e.data),
        }
    }
}
