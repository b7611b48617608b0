use crate::message::MessageElement;
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct At {
    pub target: String,
    pub display: String,
}

impl From<At> for MessageElement {
    fn from(at: At) -> Self {
        Self::At(at)
    }
}
