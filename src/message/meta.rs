use crate::message::{render, MessageElement};
use serde::{Deserialize, Serialize};

/// 引用块
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Quote {
    pub message_id: String,
    pub user: QuoteUser,
    pub elements: Vec<MessageElement>,
    pub content: String,
}

impl Quote {
    pub fn new(message_id: String, user: QuoteUser, elements: Vec<MessageElement>) -> Self {
        let content = render(&elements);
        Self {
            message_id,
            user,
            elements,
            content,
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct QuoteUser {
    pub id: String,
    pub name: Option<String>,
}
