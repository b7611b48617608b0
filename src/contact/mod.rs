use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

use crate::protocol::message::RawMessage;

pub mod group;
pub mod member;

pub fn avatar_url(uin: &str) -> String {
    format!("http://q.qlogo.cn/headimg_dl?dst_uin={uin}&spec=640")
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: String,
    pub name: Option<String>,
    pub avatar: String,
}

impl User {
    /// 只知道 id 的用户
    pub fn from_id(id: &str) -> Self {
        Self {
            id: id.to_owned(),
            name: None,
            avatar: avatar_url(id),
        }
    }

    /// 消息的发送者
    pub fn sender_of(data: &RawMessage) -> Self {
        Self {
            id: data.sender_uin.clone(),
            name: Some(data.send_nick_name.clone()),
            avatar: avatar_url(&data.sender_uin),
        }
    }
}

impl Display for User {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match &self.name {
            Some(name) => write!(f, "{}({})", name, self.id),
            None => write!(f, "User({})", self.id),
        }
    }
}
