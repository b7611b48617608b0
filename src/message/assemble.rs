use crate::contact::group::resolve_guild_channel;
use crate::contact::member::Member;
use crate::contact::User;
use crate::error::RedResult;
use crate::event::MessageEvent;
use crate::message::decode::{decode_elements, DecodeContext, QUOTE_DEPTH};
use crate::message::Message;
use crate::protocol::message::RawMessage;

/// 协议中的时间戳以秒为单位
pub fn timestamp_millis(secs: i64) -> i64 {
    secs.saturating_mul(1000)
}

/// 解码一条消息, 元素为空时也返回消息
pub async fn decode_message(ctx: &DecodeContext<'_>, data: &RawMessage) -> RedResult<Message> {
    let decoded = decode_elements(ctx, data, QUOTE_DEPTH).await?;

    Ok(Message::new(
        data.msg_id.clone(),
        decoded.elements,
        decoded.quote,
    ))
}

pub async fn message_event(ctx: &DecodeContext<'_>, data: &RawMessage) -> RedResult<MessageEvent> {
    let message = decode_message(ctx, data).await?;
    let (guild, channel) = resolve_guild_channel(data);

    Ok(MessageEvent {
        direct: guild.is_none(),
        message,
        user: User::sender_of(data),
        member: Member::sender_of(data),
        timestamp: timestamp_millis(data.msg_time),
        guild,
        channel,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::SequenceIndex;
    use crate::contact::group::ChannelKind;
    use crate::contact::member::Role;
    use crate::message::decode::tests::{raw, MockFetcher};
    use crate::message::face::FaceTable;
    use serde_json::json;

    #[test]
    fn seconds_to_millis() {
        assert_eq!(timestamp_millis(1700000000), 1700000000000);
    }

    #[tokio::test]
    async fn group_message_event() {
        let (index, fetcher, faces) = (
            SequenceIndex::default(),
            MockFetcher::default(),
            FaceTable::builtin(),
        );
        let ctx = DecodeContext {
            platform: "red",
            index: &index,
            fetcher: &fetcher,
            faces: &faces,
        };

        let data = raw(json!({
            "msgId": "7290",
            "msgSeq": "12",
            "msgTime": "1700000000",
            "chatType": 2,
            "msgType": 2,
            "peerUin": "555",
            "peerName": "Rust",
            "senderUin": "10001",
            "sendNickName": "Alice",
            "sendMemberName": "Alice in Rust",
            "roleType": 4,
            "elements": [
                { "elementType": 1, "textElement": { "content": "hi ", "atType": 0 } },
                { "elementType": 6, "faceElement": { "faceIndex": 14, "faceType": 1 } }
            ]
        }));

        let event = message_event(&ctx, &data).await.unwrap();

        assert!(!event.direct);
        assert_eq!(event.subtype(), "group");
        assert_eq!(event.timestamp, 1700000000000);
        assert_eq!(event.message.id(), "7290");
        assert_eq!(event.message.content(), "hi $[Face:微笑]");
        assert_eq!(event.guild.as_ref().map(|g| g.id.as_str()), Some("555"));
        assert_eq!(event.channel.id, "555");
        assert_eq!(event.user.name.as_deref(), Some("Alice"));
        assert_eq!(event.member.name, "Alice in Rust");
        assert_eq!(event.member.roles, vec![Role::Owner]);
    }

    #[tokio::test]
    async fn direct_message_event() {
        let (index, fetcher, faces) = (
            SequenceIndex::default(),
            MockFetcher::default(),
            FaceTable::builtin(),
        );
        let ctx = DecodeContext {
            platform: "red",
            index: &index,
            fetcher: &fetcher,
            faces: &faces,
        };

        let data = raw(json!({
            "msgId": "7291",
            "chatType": 1,
            "msgType": 2,
            "peerUin": "777",
            "senderUin": "777",
            "elements": []
        }));

        let event = message_event(&ctx, &data).await.unwrap();
        assert!(event.direct);
        assert!(event.guild.is_none());
        assert_eq!(event.channel.id, "private:777");
        assert_eq!(event.channel.kind, ChannelKind::Direct);
        assert!(event.message.is_empty());
    }
}
