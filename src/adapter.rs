use std::sync::Arc;

use tracing::{debug, warn};

use crate::cache::SequenceIndex;
use crate::contact::User;
use crate::error::{RedError, RedResult};
use crate::event::classify::{classify, Classified};
use crate::event::{
    Event, EventKind, GuildFileAddedEvent, GuildMemberAddedEvent, InternalEvent, NoticeMeta,
};
use crate::media::MediaFetcher;
use crate::message::assemble::message_event;
use crate::message::decode::DecodeContext;
use crate::message::face::FaceLookup;
use crate::protocol::{Frame, MetaConnect, RecvBatch};

/// 将一个连接上收到的帧转换为事件
///
/// 每个连接持有一个, 帧需按接收顺序逐个处理
pub struct Adapter {
    self_id: String,
    platform: String,
    index: SequenceIndex,
    fetcher: Arc<dyn MediaFetcher>,
    faces: Arc<dyn FaceLookup>,
}

impl Adapter {
    pub fn new(
        self_id: String,
        platform: String,
        index: SequenceIndex,
        fetcher: Arc<dyn MediaFetcher>,
        faces: Arc<dyn FaceLookup>,
    ) -> Self {
        Self {
            self_id,
            platform,
            index,
            fetcher,
            faces,
        }
    }

    pub fn self_id(&self) -> &str {
        &self.self_id
    }

    pub fn index(&self) -> &SequenceIndex {
        &self.index
    }

    /// 连接上的账号必须与配置的账号一致
    pub fn verify_connect(&self, connect: &MetaConnect) -> RedResult<()> {
        let connected = &connect.auth_data.uin;
        if *connected != self.self_id {
            return Err(RedError::IdentityMismatch {
                configured: self.self_id.clone(),
                connected: connected.clone(),
            });
        }

        Ok(())
    }

    /// `Ok(None)` 表示该帧不产生事件, `Err` 表示该条消息解码失败
    pub async fn adapt(&mut self, frame: &Frame) -> RedResult<Option<Event>> {
        let kind = match frame {
            Frame::MessageRecv(batch) => self.adapt_message(batch).await?,
            Frame::Poke(data) => Some(EventKind::Internal(InternalEvent::notify(data.clone()))),
            Frame::Connect(_) | Frame::Unknown(_) => None,
        };

        Ok(kind.map(|kind| Event::new(&self.self_id, &self.platform, kind)))
    }

    async fn adapt_message(&mut self, batch: &RecvBatch) -> RedResult<Option<EventKind>> {
        if batch.is_empty() {
            return Ok(None);
        }

        if let Some(key) = batch.key() {
            self.index.put(&key.peer_uin, &key.msg_seq, &key.msg_id);
        }

        if batch.extra() > 0 {
            warn!(
                "收到了包含 {} 条记录的消息帧, 只处理第一条",
                batch.extra() + 1
            );
        }

        let Some(message) = batch.message()? else {
            return Ok(None);
        };
        let data = &message;

        let kind = match classify(data) {
            Classified::Chat => {
                let ctx = DecodeContext {
                    platform: &self.platform,
                    index: &self.index,
                    fetcher: self.fetcher.as_ref(),
                    faces: self.faces.as_ref(),
                };

                let event = message_event(&ctx, data).await?;
                if event.message.is_empty() {
                    debug!("消息(msgId: {})内容为空, 忽略", data.msg_id);
                    return Ok(None);
                }

                EventKind::Message(event)
            }
            Classified::FileAdded => EventKind::GuildFileAdded(GuildFileAddedEvent {
                meta: NoticeMeta::from_message(data),
            }),
            Classified::MemberAdded {
                operator_id,
                user_id,
            } => EventKind::GuildMemberAdded(GuildMemberAddedEvent {
                meta: NoticeMeta::from_message(data),
                operator_id,
                user: User::from_id(&user_id),
            }),
            Classified::Dropped => {
                debug!(
                    "忽略消息(msgType: {}, subMsgType: {})",
                    data.msg_type, data.sub_msg_type
                );
                return Ok(None);
            }
        };

        Ok(Some(kind))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::decode::tests::{MockFetcher, PNG};
    use crate::message::face::FaceTable;
    use crate::message::MessageElement;
    use crate::protocol::RawFrame;
    use serde_json::{json, Value};

    fn adapter(fetcher: MockFetcher) -> Adapter {
        Adapter::new(
            "10000".into(),
            "red".into(),
            SequenceIndex::new(64, None),
            Arc::new(fetcher),
            Arc::new(FaceTable::builtin()),
        )
    }

    fn recv(payload: Value) -> Frame {
        serde_json::from_value::<RawFrame>(json!({ "type": "message::recv", "payload": payload }))
            .unwrap()
            .parse()
            .unwrap()
    }

    fn text_message(peer: &str, seq: &str, id: &str, text: &str) -> Value {
        json!({
            "msgId": id,
            "msgSeq": seq,
            "msgTime": "1700000000",
            "chatType": 2,
            "msgType": 2,
            "peerUin": peer,
            "senderUin": "10001",
            "sendNickName": "Alice",
            "elements": [{ "elementType": 1, "textElement": { "content": text, "atType": 0 } }]
        })
    }

    #[tokio::test]
    async fn text_message_event() {
        let mut adapter = adapter(MockFetcher::default());
        let event = adapter
            .adapt(&recv(json!([text_message("555", "1", "100", "hello")])))
            .await
            .unwrap()
            .unwrap();

        assert_eq!(event.self_id, "10000");
        assert_eq!(event.platform, "red");
        let msg = event.as_message().unwrap();
        assert_eq!(msg.message.content(), "hello");
        assert_eq!(msg.timestamp, 1700000000000);
        assert_eq!(adapter.index().get("555", "1"), Some("100"));
    }

    #[tokio::test]
    async fn empty_or_missing_payload_is_no_event() {
        let mut adapter = adapter(MockFetcher::default());

        assert!(adapter.adapt(&recv(json!([]))).await.unwrap().is_none());
        assert!(adapter.adapt(&recv(Value::Null)).await.unwrap().is_none());
        assert!(adapter
            .adapt(&Frame::Unknown("buddy::list".into()))
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn empty_content_is_no_event() {
        let mut adapter = adapter(MockFetcher::default());
        let frame = recv(json!([{
            "msgId": "100",
            "msgSeq": "1",
            "chatType": 2,
            "msgType": 2,
            "peerUin": "555",
            "elements": [{ "elementType": 10, "arkElement": {} }]
        }]));

        assert!(adapter.adapt(&frame).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn dropped_frame_still_indexed() {
        let mut adapter = adapter(MockFetcher::default());

        let dropped = recv(json!([{
            "msgId": "200",
            "msgSeq": "42",
            "chatType": 2,
            "msgType": 11,
            "peerUin": "1000",
            "elements": []
        }]));
        assert!(adapter.adapt(&dropped).await.unwrap().is_none());

        let reply = recv(json!([{
            "msgId": "201",
            "msgSeq": "43",
            "chatType": 2,
            "msgType": 9,
            "peerUin": "1000",
            "elements": [
                { "elementType": 7, "replyElement": { "replayMsgSeq": "42", "replayMsgId": "0", "senderUin": "10002" } },
                { "elementType": 1, "textElement": { "content": "re" } }
            ],
            "records": [{ "msgId": "200", "sendNickName": "Bob", "elements": [] }]
        }]));

        let event = adapter.adapt(&reply).await.unwrap().unwrap();
        let quote = event.as_message().unwrap().message.quote().unwrap();
        assert_eq!(quote.message_id, "200");
        assert_eq!(quote.user.id, "10002");
        assert_eq!(quote.user.name.as_deref(), Some("Bob"));
    }

    #[tokio::test]
    async fn only_first_record_is_decoded() {
        let mut adapter = adapter(MockFetcher::default());
        let frame = recv(json!([
            text_message("555", "1", "100", "first"),
            text_message("555", "2", "101", "second")
        ]));

        let event = adapter.adapt(&frame).await.unwrap().unwrap();
        assert_eq!(event.as_message().unwrap().message.content(), "first");
        assert_eq!(adapter.index().get("555", "2"), None);
    }

    #[tokio::test]
    async fn malformed_extra_record_is_ignored() {
        let mut adapter = adapter(MockFetcher::default());
        let frame = recv(json!([
            text_message("1000", "42", "200", "first"),
            { "msgId": "201", "msgSeq": "43", "sendNickName": null, "elements": "broken" }
        ]));

        let event = adapter.adapt(&frame).await.unwrap().unwrap();
        assert_eq!(event.as_message().unwrap().message.content(), "first");
        assert_eq!(adapter.index().get("1000", "42"), Some("200"));
    }

    #[tokio::test]
    async fn null_member_name_falls_back_to_nickname() {
        let mut adapter = adapter(MockFetcher::default());
        let mut record = text_message("1000", "42", "200", "hi");
        record["sendMemberName"] = Value::Null;

        let event = adapter.adapt(&recv(json!([record]))).await.unwrap().unwrap();
        assert_eq!(event.as_message().unwrap().member.name, "Alice");
        assert_eq!(adapter.index().get("1000", "42"), Some("200"));
    }

    #[tokio::test]
    async fn malformed_record_still_indexed() {
        let mut adapter = adapter(MockFetcher::default());
        let frame = recv(json!([{
            "msgId": "200",
            "msgSeq": "42",
            "peerUin": "1000",
            "elements": 5
        }]));

        assert!(matches!(
            adapter.adapt(&frame).await,
            Err(RedError::Json(_))
        ));
        assert_eq!(adapter.index().get("1000", "42"), Some("200"));
    }

    #[tokio::test]
    async fn fetch_failure_is_an_error() {
        let mut adapter = adapter(MockFetcher::default());
        let frame = recv(json!([{
            "msgId": "100",
            "msgSeq": "1",
            "chatType": 1,
            "msgType": 2,
            "peerUin": "777",
            "elements": [{ "elementType": 2, "elementId": "gone" }]
        }]));

        assert!(matches!(
            adapter.adapt(&frame).await,
            Err(RedError::FetchStatus(404))
        ));
        // 失败的消息同样写入索引
        assert_eq!(adapter.index().get("777", "1"), Some("100"));
    }

    #[tokio::test]
    async fn image_message() {
        let mut adapter = adapter(MockFetcher::with(&[("e1", PNG)]));
        let frame = recv(json!([{
            "msgId": "100",
            "msgSeq": "1",
            "chatType": 1,
            "msgType": 2,
            "peerUin": "777",
            "elements": [{ "elementType": 2, "elementId": "e1" }]
        }]));

        let event = adapter.adapt(&frame).await.unwrap().unwrap();
        let msg = event.as_message().unwrap();
        assert!(msg.direct);
        assert_eq!(msg.channel.id, "private:777");
        assert!(matches!(
            msg.message.elements(),
            [MessageElement::Image(m)] if m.mime == "image/png"
        ));
        assert_eq!(msg.message.content(), "$[Image:image/png]");
    }

    #[tokio::test]
    async fn member_added_from_xml() {
        let mut adapter = adapter(MockFetcher::default());
        let frame = recv(json!([{
            "msgId": "300",
            "msgSeq": "5",
            "msgTime": 1700000000,
            "chatType": 2,
            "msgType": 5,
            "subMsgType": 12,
            "peerUin": "555",
            "senderUin": "0",
            "elements": [{
                "elementType": 8,
                "grayTipElement": {
                    "xmlElement": { "content": "<qq jp=\"111\"/> 邀请 <qq jp=\"222\"/> 加入了群聊" }
                }
            }]
        }]));

        let event = adapter.adapt(&frame).await.unwrap().unwrap();
        match event.kind {
            EventKind::GuildMemberAdded(e) => {
                assert_eq!(e.operator_id, "111");
                assert_eq!(e.user.id, "222");
                assert_eq!(
                    e.user.avatar,
                    "http://q.qlogo.cn/headimg_dl?dst_uin=222&spec=640"
                );
                assert_eq!(e.meta.guild.map(|g| g.id), Some("555".to_owned()));
                assert_eq!(e.meta.timestamp, 1700000000000);
            }
            or => panic!("unexpected event: {or:?}"),
        }
    }

    #[tokio::test]
    async fn file_added() {
        let mut adapter = adapter(MockFetcher::default());
        let frame = recv(json!([{
            "msgId": "400",
            "msgSeq": "6",
            "chatType": 2,
            "msgType": 3,
            "peerUin": "555",
            "senderUin": "10001",
            "elements": [{ "elementType": 3, "elementId": "f1", "fileElement": {} }]
        }]));

        let event = adapter.adapt(&frame).await.unwrap().unwrap();
        match event.kind {
            EventKind::GuildFileAdded(e) => {
                assert_eq!(e.meta.message_id, "400");
                assert_eq!(e.meta.user_id, "10001");
                assert_eq!(e.meta.channel.id, "555");
            }
            or => panic!("unexpected event: {or:?}"),
        }
    }

    #[tokio::test]
    async fn poke_is_forwarded_raw() {
        let mut adapter = adapter(MockFetcher::default());
        let event = adapter
            .adapt(&Frame::Poke(json!({ "peerUin": "555" })))
            .await
            .unwrap()
            .unwrap();

        match event.kind {
            EventKind::Internal(e) => {
                assert_eq!(e.kind, "red/unsafe-notify");
                assert_eq!(e.data, json!({ "peerUin": "555" }));
            }
            or => panic!("unexpected event: {or:?}"),
        }
    }

    #[test]
    fn identity_check() {
        let adapter = adapter(MockFetcher::default());

        let mut connect = MetaConnect::default();
        connect.auth_data.uin = "10000".into();
        assert!(adapter.verify_connect(&connect).is_ok());

        connect.auth_data.uin = "20000".into();
        let err = adapter.verify_connect(&connect).unwrap_err();
        assert_eq!(
            err.to_string(),
            "configured selfId is 10000, but the currently connected account is 20000"
        );
    }
}
