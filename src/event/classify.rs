//! `message::recv` 中消息类型到事件类型的分发

use std::sync::OnceLock;

use regex::Regex;

use crate::protocol::message::{GrayTipType, GroupElement, MsgType, RawMessage};

/// 群通知中表示有成员加入
const GROUP_MEMBER_JOINED: i32 = 1;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classified {
    /// 普通消息, 需要解码元素
    Chat,
    /// 群文件, 内容不解码
    FileAdded,
    MemberAdded {
        operator_id: String,
        user_id: String,
    },
    Dropped,
}

pub fn classify(data: &RawMessage) -> Classified {
    match data.msg_type() {
        MsgType::Normal | MsgType::Voice | MsgType::Struct | MsgType::Reply => Classified::Chat,
        MsgType::File => Classified::FileAdded,
        MsgType::GrayTip => classify_gray_tip(data),
        MsgType::Unknown(_) => Classified::Dropped,
    }
}

fn classify_gray_tip(data: &RawMessage) -> Classified {
    let Some(tip) = data
        .elements
        .first()
        .and_then(|elem| elem.gray_tip_element.as_ref())
    else {
        return Classified::Dropped;
    };

    let joined = match GrayTipType::from(data.sub_msg_type) {
        GrayTipType::GroupNotice => tip.group_element.as_ref().and_then(member_joined),
        GrayTipType::XmlNotice => tip
            .xml_element
            .as_ref()
            .and_then(|xml| xml_member_joined(&xml.content)),
        GrayTipType::Unknown(_) => None,
    };

    match joined {
        Some((operator_id, user_id)) => Classified::MemberAdded {
            operator_id,
            user_id,
        },
        None => Classified::Dropped,
    }
}

fn member_joined(group: &GroupElement) -> Option<(String, String)> {
    if group.kind != GROUP_MEMBER_JOINED {
        return None;
    }

    // 操作者与加入者均取 memberUin
    Some((group.member_uin.clone(), group.member_uin.clone()))
}

fn jp_regex() -> &'static Regex {
    static JP: OnceLock<Regex> = OnceLock::new();
    JP.get_or_init(|| Regex::new(r#"jp="([0-9]+)""#).expect("Invalid regex"))
}

/// 邀请入群的 xml 通知中, 第一个 `jp` 为邀请者, 第二个为被邀请者
pub fn xml_member_joined(content: &str) -> Option<(String, String)> {
    let mut ids = jp_regex()
        .captures_iter(content)
        .filter_map(|cap| cap.get(1))
        .map(|m| m.as_str().to_owned());

    let operator = ids.next()?;
    let user = ids.next()?;

    Some((operator, user))
}
