use serde::{Deserialize, Serialize};

use crate::contact::User;
use crate::protocol::message::RawMessage;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Member,
    Admin,
    Owner,
}

impl Role {
    pub fn from_code(code: i32) -> Option<Self> {
        match code {
            2 => Some(Self::Member),
            3 => Some(Self::Admin),
            4 => Some(Self::Owner),
            _ => None,
        }
    }
}

/// 群成员身份下的发送者
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Member {
    pub user: User,
    /// 群名片, 为空时为昵称
    pub name: String,
    pub roles: Vec<Role>,
}

impl Member {
    pub fn sender_of(data: &RawMessage) -> Self {
        Self {
            user: User::sender_of(data),
            name: data.display_name().to_owned(),
            roles: Role::from_code(data.role_type).into_iter().collect(),
        }
    }
}
