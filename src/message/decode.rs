//! 单个元素到归一化节点的解码

use bytes::Bytes;
use futures::future::BoxFuture;
use futures::FutureExt;
use tracing::debug;

use crate::cache::SequenceIndex;
use crate::error::RedResult;
use crate::media::sniff::sniff_mime;
use crate::media::{MediaFetcher, MediaRequest};
use crate::message::at::At;
use crate::message::face::{Face, FaceLookup};
use crate::message::image::{Media, OCTET_STREAM};
use crate::message::meta::{Quote, QuoteUser};
use crate::message::MessageElement;
use crate::protocol::message::{
    ElementKind, FaceElement, RawElement, RawMessage, ReplyElement, TextElement,
};

/// 引用的展开深度, 被引用消息中的引用不再继续解析
pub const QUOTE_DEPTH: u8 = 1;

const AT_ALL: i32 = 1;
const AT_ONE: i32 = 2;

/// 解码时依赖的外部状态
pub struct DecodeContext<'a> {
    pub platform: &'a str,
    pub index: &'a SequenceIndex,
    pub fetcher: &'a dyn MediaFetcher,
    pub faces: &'a dyn FaceLookup,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Element(MessageElement),
    Quote(Quote),
}

#[derive(Debug, Default)]
pub struct Decoded {
    pub elements: Vec<MessageElement>,
    pub quote: Option<Quote>,
}

/// 按顺序解码一条消息的全部元素
///
/// 任一富媒体拉取失败时整条消息解码失败
pub fn decode_elements<'a>(
    ctx: &'a DecodeContext<'a>,
    data: &'a RawMessage,
    depth: u8,
) -> BoxFuture<'a, RedResult<Decoded>> {
    async move {
        let mut decoded = Decoded::default();

        for elem in &data.elements {
            match decode_element(ctx, data, elem, depth).await? {
                Some(Node::Element(e)) => decoded.elements.push(e),
                Some(Node::Quote(q)) => decoded.quote = Some(q),
                None => {}
            }
        }

        Ok(decoded)
    }
    .boxed()
}

pub async fn decode_element(
    ctx: &DecodeContext<'_>,
    data: &RawMessage,
    elem: &RawElement,
    depth: u8,
) -> RedResult<Option<Node>> {
    let node = match elem.kind() {
        ElementKind::Text(text) => Some(Node::Element(decode_text(text))),
        ElementKind::Image => {
            let bytes = fetch(ctx, data, &elem.element_id).await?;
            let mime = sniff_mime(&bytes);
            Some(Node::Element(MessageElement::Image(Media::new(bytes, mime))))
        }
        ElementKind::Audio => {
            let bytes = fetch(ctx, data, &elem.element_id).await?;
            Some(Node::Element(MessageElement::Audio(Media::new(
                bytes,
                OCTET_STREAM,
            ))))
        }
        ElementKind::Face(face) => Some(Node::Element(decode_face(ctx, face).into())),
        ElementKind::Reply(reply) => decode_quote(ctx, data, reply, depth)
            .await?
            .map(Node::Quote),
        ElementKind::GrayTip(_) | ElementKind::Unknown(_) => None,
    };

    Ok(node)
}

pub fn decode_text(text: &TextElement) -> MessageElement {
    match text.at_type {
        AT_ALL => MessageElement::AtAll,
        AT_ONE => {
            let target = if text.at_nt_uin.is_empty() {
                &text.at_uid
            } else {
                &text.at_nt_uin
            };

            At {
                target: target.clone(),
                display: text
                    .content
                    .strip_prefix('@')
                    .unwrap_or(&text.content)
                    .to_owned(),
            }
            .into()
        }
        _ => MessageElement::Text(text.content.clone()),
    }
}

/// 去掉描述的第一个字符, 如 `/微笑` -> `微笑`
fn strip_label(label: &str) -> String {
    label.chars().skip(1).collect()
}

pub fn decode_face(ctx: &DecodeContext<'_>, face: &FaceElement) -> Face {
    let info = ctx.faces.lookup(face.face_index);

    let name = match (&face.face_text, info) {
        (Some(text), _) if !text.is_empty() => strip_label(text),
        (_, Some(info)) => strip_label(&info.label),
        _ => String::new(),
    };

    Face {
        id: face.face_index,
        name,
        platform: ctx.platform.to_owned(),
        face_type: face.face_type,
        image: info.map(|info| info.image_url.clone()),
    }
}

async fn decode_quote(
    ctx: &DecodeContext<'_>,
    data: &RawMessage,
    reply: &ReplyElement,
    depth: u8,
) -> RedResult<Option<Quote>> {
    if depth == 0 {
        return Ok(None);
    }

    let message_id = match reply.explicit_msg_id() {
        Some(id) => Some(id),
        None => ctx.index.get(&data.peer_uin, &reply.reply_seq),
    };

    let Some(message_id) = message_id else {
        debug!(
            "无法获取由 {}({}) 发送的消息中引用的消息(seq: {}), 被引用的消息可能早于本次连接",
            data.display_name(),
            data.sender_uin,
            reply.reply_seq
        );
        return Ok(None);
    };

    let record = data.records.first();
    let elements = match record {
        Some(record) => decode_elements(ctx, record, depth - 1).await?.elements,
        None => vec![],
    };

    let user = QuoteUser {
        id: reply.sender_id().to_owned(),
        name: record.map(|r| r.display_name().to_owned()),
    };

    Ok(Some(Quote::new(message_id.to_owned(), user, elements)))
}

async fn fetch(ctx: &DecodeContext<'_>, data: &RawMessage, element_id: &str) -> RedResult<Bytes> {
    let request = MediaRequest {
        msg_id: data.msg_id.clone(),
        chat_type: data.chat_type,
        peer_uid: data.peer_uin.clone(),
        element_id: element_id.to_owned(),
    };

    ctx.fetcher.fetch(&request).await
}
