pub mod assemble;
pub mod at;
pub mod decode;
pub mod face;
pub mod image;
pub mod meta;

use crate::message::at::At;
use crate::message::face::Face;
use crate::message::image::Media;
use crate::message::meta::Quote;
use core::slice;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::vec;

/// 归一化后的消息
#[derive(Serialize, Deserialize, Clone, Default, Debug, PartialEq)]
pub struct Message {
    id: String,
    elements: Vec<MessageElement>,
    content: String,
    quote: Option<Quote>,
}

impl Message {
    pub fn new(id: String, elements: Vec<MessageElement>, quote: Option<Quote>) -> Self {
        let content = render(&elements);
        Self {
            id,
            elements,
            content,
            quote,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn iter(&self) -> slice::Iter<'_, MessageElement> {
        self.into_iter()
    }

    pub fn elements(&self) -> &[MessageElement] {
        &self.elements
    }

    /// 所有元素拼接而成的文本
    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn quote(&self) -> Option<&Quote> {
        self.quote.as_ref()
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    pub fn from_json(s: &str) -> serde_json::Result<Self> {
        serde_json::from_str(s)
    }
}

pub(crate) fn render(elements: &[MessageElement]) -> String {
    elements.iter().map(ToString::to_string).collect()
}

impl Display for Message {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.content)
    }
}

impl IntoIterator for Message {
    type Item = MessageElement;
    type IntoIter = vec::IntoIter<Self::Item>;

    fn into_iter(self) -> Self::IntoIter {
        self.elements.into_iter()
    }
}

impl<'a> IntoIterator for &'a Message {
    type Item = &'a MessageElement;
    type IntoIter = slice::Iter<'a, MessageElement>;

    fn into_iter(self) -> Self::IntoIter {
        self.elements.iter()
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(tag = "type", content = "data")]
#[serde(rename_all = "snake_case")]
pub enum MessageElement {
    Text(String),
    At(At),
    AtAll,
    Image(Media),
    Audio(Media),
    Face(Face),
}

impl Display for MessageElement {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Text(t) => f.write_str(t),
            Self::At(At { target, display }) => write!(f, "$[At:{}({})]", display, target),
            Self::AtAll => f.write_str("$[AtAll]"),
            Self::Image(img) => write!(f, "$[Image:{}]", img.mime),
            Self::Audio(audio) => write!(f, "$[Audio:{}]", audio.mime),
            Self::Face(face) => write!(f, "$[Face:{}]", face.name),
        }
    }
}

impl From<String> for MessageElement {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<&str> for MessageElement {
    fn from(s: &str) -> Self {
        Self::Text(s.to_owned())
    }
}
