use std::collections::HashMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::RedResult;
use crate::message::MessageElement;

const FACE_IMAGE_BASE: &str = "https://koishi.js.org/QFace/static";

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Face {
    pub id: i32,
    pub name: String,
    pub platform: String,
    /// 原始的表情子类型
    pub face_type: i32,
    /// 静态图片地址, 表情表中不存在时为空
    pub image: Option<String>,
}

impl From<Face> for MessageElement {
    fn from(face: Face) -> Self {
        Self::Face(face)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FaceInfo {
    /// 带前缀的描述, 如 `/微笑`
    pub label: String,
    pub image_url: String,
}

/// 只读的表情表
pub trait FaceLookup: Send + Sync {
    fn lookup(&self, index: i32) -> Option<&FaceInfo>;
}

#[derive(Debug, Default)]
pub struct FaceTable {
    faces: HashMap<i32, FaceInfo>,
}

#[derive(Deserialize)]
struct FaceRecord {
    #[serde(rename = "QSid")]
    id: String,
    #[serde(rename = "QDes")]
    label: String,
}

static BUILTIN: &[(i32, &str)] = &[
    (0, "/惊讶"),
    (1, "/撇嘴"),
    (2, "/色"),
    (3, "/发呆"),
    (4, "/得意"),
    (5, "/流泪"),
    (6, "/害羞"),
    (7, "/闭嘴"),
    (8, "/睡"),
    (9, "/大哭"),
    (10, "/尴尬"),
    (11, "/发怒"),
    (12, "/调皮"),
    (13, "/呲牙"),
    (14, "/微笑"),
    (15, "/难过"),
    (16, "/酷"),
    (18, "/抓狂"),
    (19, "/吐"),
    (20, "/偷笑"),
    (21, "/可爱"),
    (22, "/白眼"),
    (23, "/傲慢"),
    (24, "/饥饿"),
    (25, "/困"),
    (26, "/惊恐"),
    (27, "/流汗"),
    (28, "/憨笑"),
    (29, "/悠闲"),
    (30, "/奋斗"),
    (31, "/咒骂"),
    (32, "/疑问"),
    (33, "/嘘"),
    (34, "/晕"),
    (35, "/折磨"),
    (36, "/衰"),
    (37, "/骷髅"),
    (38, "/敲打"),
    (39, "/再见"),
    (41, "/发抖"),
    (42, "/爱情"),
    (43, "/跳跳"),
    (46, "/猪头"),
    (49, "/拥抱"),
    (53, "/蛋糕"),
    (56, "/刀"),
    (59, "/便便"),
    (60, "/咖啡"),
    (63, "/玫瑰"),
    (64, "/凋谢"),
    (66, "/爱心"),
    (67, "/心碎"),
    (74, "/太阳"),
    (75, "/月亮"),
    (76, "/赞"),
    (77, "/踩"),
    (78, "/握手"),
    (79, "/胜利"),
    (85, "/飞吻"),
    (86, "/怄火"),
    (89, "/西瓜"),
    (96, "/冷汗"),
    (97, "/擦汗"),
    (98, "/抠鼻"),
    (99, "/鼓掌"),
    (100, "/糗大了"),
    (101, "/坏笑"),
    (102, "/左哼哼"),
    (103, "/右哼哼"),
    (104, "/哈欠"),
    (105, "/鄙视"),
    (106, "/委屈"),
    (107, "/快哭了"),
    (108, "/阴险"),
    (109, "/左亲亲"),
    (110, "/吓"),
    (111, "/可怜"),
    (112, "/菜刀"),
    (114, "/篮球"),
    (116, "/示爱"),
    (118, "/抱拳"),
    (119, "/勾引"),
    (120, "/拳头"),
    (121, "/差劲"),
    (123, "/NO"),
    (124, "/OK"),
    (125, "/转圈"),
    (129, "/挥手"),
    (144, "/喝彩"),
    (147, "/棒棒糖"),
    (171, "/茶"),
    (173, "/泪奔"),
    (174, "/无奈"),
    (175, "/卖萌"),
    (176, "/小纠结"),
    (179, "/doge"),
    (180, "/惊喜"),
    (181, "/骚扰"),
    (182, "/笑哭"),
    (183, "/我最美"),
];

fn image_url(id: i32) -> String {
    format!("{FACE_IMAGE_BASE}/s{id}.png")
}

impl FaceTable {
    pub fn builtin() -> Self {
        BUILTIN.iter().map(|&(id, label)| (id, label)).collect()
    }

    /// 读取 `[{ "QSid": "14", "QDes": "/微笑" }, ...]` 格式的表情数据
    pub fn from_json(s: &str) -> RedResult<Self> {
        let records: Vec<FaceRecord> = serde_json::from_str(s)?;

        Ok(records
            .iter()
            .filter_map(|r| r.id.parse::<i32>().ok().map(|id| (id, r.label.as_str())))
            .collect())
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> RedResult<Self> {
        let s = fs::read_to_string(path)?;
        Self::from_json(&s)
    }

    pub fn len(&self) -> usize {
        self.faces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.faces.is_empty()
    }
}

impl<'a> FromIterator<(i32, &'a str)> for FaceTable {
    fn from_iter<T: IntoIterator<Item = (i32, &'a str)>>(iter: T) -> Self {
        let faces = iter
            .into_iter()
            .map(|(id, label)| {
                (
                    id,
                    FaceInfo {
                        label: label.to_owned(),
                        image_url: image_url(id),
                    },
                )
            })
            .collect();

        Self { faces }
    }
}

impl FaceLookup for FaceTable {
    fn lookup(&self, index: i32) -> Option<&FaceInfo> {
        self.faces.get(&index)
    }
}
