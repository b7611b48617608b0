use crate::protocol::MetaConnect;

/// 握手时得到的账号信息
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AccountInfo {
    pub nickname: String,
    pub uid: String,
    /// 协议端名称, 如 chronocat
    pub implementation: String,
    pub version: String,
}

impl From<&MetaConnect> for AccountInfo {
    fn from(connect: &MetaConnect) -> Self {
        Self {
            nickname: connect.auth_data.nick_name.clone(),
            uid: connect.auth_data.uid.clone(),
            implementation: connect.name.clone(),
            version: connect.version.clone(),
        }
    }
}
