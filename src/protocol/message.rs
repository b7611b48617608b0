use serde::Deserialize;

use crate::protocol::de;

pub const ELEMENT_TEXT: i32 = 1;
pub const ELEMENT_PIC: i32 = 2;
pub const ELEMENT_PTT: i32 = 4;
pub const ELEMENT_FACE: i32 = 6;
pub const ELEMENT_REPLY: i32 = 7;
pub const ELEMENT_GRAY_TIP: i32 = 8;

/// 一条收到的消息记录
#[derive(Deserialize, Debug, Clone, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct RawMessage {
    #[serde(deserialize_with = "de::string")]
    pub msg_id: String,
    #[serde(deserialize_with = "de::string")]
    pub msg_seq: String,
    /// 秒级时间戳
    #[serde(deserialize_with = "de::int")]
    pub msg_time: i64,
    #[serde(deserialize_with = "de::int")]
    pub chat_type: i32,
    #[serde(deserialize_with = "de::int")]
    pub msg_type: i32,
    #[serde(deserialize_with = "de::int")]
    pub sub_msg_type: i32,
    #[serde(deserialize_with = "de::string")]
    pub peer_uin: String,
    #[serde(deserialize_with = "de::string")]
    pub peer_name: String,
    #[serde(deserialize_with = "de::string")]
    pub sender_uin: String,
    #[serde(deserialize_with = "de::string")]
    pub send_nick_name: String,
    #[serde(deserialize_with = "de::string")]
    pub send_member_name: String,
    #[serde(deserialize_with = "de::int")]
    pub role_type: i32,
    #[serde(deserialize_with = "de::or_default")]
    pub elements: Vec<RawElement>,
    /// 被引用的消息
    #[serde(deserialize_with = "de::or_default")]
    pub records: Vec<RawMessage>,
}

impl RawMessage {
    pub fn chat_type(&self) -> ChatType {
        ChatType::from(self.chat_type)
    }

    pub fn msg_type(&self) -> MsgType {
        MsgType::from(self.msg_type)
    }

    /// 群名片优先, 否则为昵称
    pub fn display_name(&self) -> &str {
        if self.send_member_name.is_empty() {
            &self.send_nick_name
        } else {
            &self.send_member_name
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatType {
    Friend,
    Group,
    Other(i32),
}

impl From<i32> for ChatType {
    fn from(code: i32) -> Self {
        match code {
            1 => Self::Friend,
            2 => Self::Group,
            or => Self::Other(or),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MsgType {
    Normal,
    File,
    GrayTip,
    Voice,
    Struct,
    Reply,
    Unknown(i32),
}

impl From<i32> for MsgType {
    fn from(code: i32) -> Self {
        match code {
            2 => Self::Normal,
            3 => Self::File,
            5 => Self::GrayTip,
            6 => Self::Voice,
            8 => Self::Struct,
            9 => Self::Reply,
            or => Self::Unknown(or),
        }
    }
}

/// `msgType == 5` 时的子类型
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GrayTipType {
    GroupNotice,
    XmlNotice,
    Unknown(i32),
}

impl From<i32> for GrayTipType {
    fn from(code: i32) -> Self {
        match code {
            8 => Self::GroupNotice,
            12 => Self::XmlNotice,
            or => Self::Unknown(or),
        }
    }
}

#[derive(Deserialize, Debug, Clone, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct RawElement {
    #[serde(deserialize_with = "de::int")]
    pub element_type: i32,
    #[serde(deserialize_with = "de::string")]
    pub element_id: String,
    pub text_element: Option<TextElement>,
    pub face_element: Option<FaceElement>,
    pub reply_element: Option<ReplyElement>,
    pub gray_tip_element: Option<GrayTipElement>,
}

/// 按 `elementType` 区分后的元素视图
#[derive(Debug, Clone, Copy)]
pub enum ElementKind<'a> {
    Text(&'a TextElement),
    Image,
    Audio,
    Face(&'a FaceElement),
    Reply(&'a ReplyElement),
    GrayTip(&'a GrayTipElement),
    Unknown(i32),
}

impl RawElement {
    pub fn kind(&self) -> ElementKind<'_> {
        match self.element_type {
            ELEMENT_TEXT => self.text_element.as_ref().map(ElementKind::Text),
            ELEMENT_PIC => Some(ElementKind::Image),
            ELEMENT_PTT => Some(ElementKind::Audio),
            ELEMENT_FACE => self.face_element.as_ref().map(ElementKind::Face),
            ELEMENT_REPLY => self.reply_element.as_ref().map(ElementKind::Reply),
            ELEMENT_GRAY_TIP => self.gray_tip_element.as_ref().map(ElementKind::GrayTip),
            _ => None,
        }
        .unwrap_or(ElementKind::Unknown(self.element_type))
    }
}

#[derive(Deserialize, Debug, Clone, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct TextElement {
    #[serde(deserialize_with = "de::string")]
    pub content: String,
    #[serde(deserialize_with = "de::int")]
    pub at_type: i32,
    #[serde(deserialize_with = "de::string")]
    pub at_uid: String,
    #[serde(deserialize_with = "de::string")]
    pub at_nt_uin: String,
}

#[derive(Deserialize, Debug, Clone, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct FaceElement {
    #[serde(deserialize_with = "de::int")]
    pub face_index: i32,
    pub face_text: Option<String>,
    #[serde(deserialize_with = "de::int")]
    pub face_type: i32,
}

#[derive(Deserialize, Debug, Clone, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct ReplyElement {
    #[serde(rename = "replayMsgSeq", deserialize_with = "de::string")]
    pub reply_seq: String,
    #[serde(rename = "replayMsgId", deserialize_with = "de::string")]
    pub reply_msg_id: String,
    #[serde(deserialize_with = "de::string")]
    pub sender_uin: String,
    #[serde(deserialize_with = "de::string")]
    pub sender_uid: String,
}

impl ReplyElement {
    /// `"0"` 表示服务端没有给出被引用消息的 id
    pub fn explicit_msg_id(&self) -> Option<&str> {
        match self.reply_msg_id.as_str() {
            "" | "0" => None,
            id => Some(id),
        }
    }

    pub fn sender_id(&self) -> &str {
        if self.sender_uin.is_empty() || self.sender_uin == "0" {
            &self.sender_uid
        } else {
            &self.sender_uin
        }
    }
}

#[derive(Deserialize, Debug, Clone, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct GrayTipElement {
    #[serde(deserialize_with = "de::int")]
    pub sub_element_type: i32,
    pub group_element: Option<GroupElement>,
    pub xml_element: Option<XmlElement>,
}

#[derive(Deserialize, Debug, Clone, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct GroupElement {
    #[serde(rename = "type", deserialize_with = "de::int")]
    pub kind: i32,
    #[serde(deserialize_with = "de::string")]
    pub member_uin: String,
    #[serde(deserialize_with = "de::string")]
    pub admin_uin: String,
    #[serde(deserialize_with = "de::string")]
    pub member_nick: String,
}

#[derive(Deserialize, Debug, Clone, Default)]
#[serde(default)]
pub struct XmlElement {
    #[serde(deserialize_with = "de::string")]
    pub content: String,
}
