use serde::{Deserialize, Serialize};

use crate::protocol::message::{ChatType, RawMessage};

pub const PRIVATE_PREFIX: &str = "private:";

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Guild {
    pub id: String,
    pub name: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ChannelKind {
    Text,
    Direct,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Channel {
    pub id: String,
    pub kind: ChannelKind,
}

/// 群聊中 guild 与 channel 的 id 都是群号;
/// 其余情况下没有 guild, channel 为 `private:<peer>`
pub fn resolve_guild_channel(data: &RawMessage) -> (Option<Guild>, Channel) {
    match data.chat_type() {
        ChatType::Group => (
            Some(Guild {
                id: data.peer_uin.clone(),
                name: data.peer_name.clone(),
            }),
            Channel {
                id: data.peer_uin.clone(),
                kind: ChannelKind::Text,
            },
        ),
        ChatType::Friend | ChatType::Other(_) => (
            None,
            Channel {
                id: format!("{PRIVATE_PREFIX}{}", data.peer_uin),
                kind: ChannelKind::Direct,
            },
        ),
    }
}
