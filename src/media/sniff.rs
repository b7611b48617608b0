use crate::message::image::OCTET_STREAM;

const SILK: &str = "audio/silk";

/// QQ 语音使用的 silk 格式, 需先于 `#!` 开头的脚本判断
fn is_silk(buf: &[u8]) -> bool {
    buf.starts_with(b"#!SILK_V3") || buf.starts_with(b"\x02#!SILK_V3")
}

/// 根据文件头推断 MIME, 无法识别时为 `application/octet-stream`
pub fn sniff_mime(data: &[u8]) -> &'static str {
    if is_silk(data) {
        return SILK;
    }

    infer::get(data)
        .map(|kind| kind.mime_type())
        .unwrap_or(OCTET_STREAM)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_images() {
        assert_eq!(sniff_mime(b"\x89PNG\r\n\x1a\n\0\0\0\rIHDR"), "image/png");
        assert_eq!(sniff_mime(b"\xff\xd8\xff\xe0\0\x10JFIF"), "image/jpeg");
        assert_eq!(sniff_mime(b"GIF89a\x01\0\x01\0"), "image/gif");
        assert_eq!(sniff_mime(b"RIFF\x24\0\0\0WEBPVP8 "), "image/webp");
    }

    #[test]
    fn avif() {
        let header = b"\0\0\0\x1cftypavif\0\0\0\0avifmif1miaf";
        assert_eq!(sniff_mime(header), "image/avif");
    }

    #[test]
    fn silk_voice() {
        assert_eq!(sniff_mime(b"\x02#!SILK_V3\x0c\0"), "audio/silk");
        assert_eq!(sniff_mime(b"#!SILK_V3\x0c\0"), "audio/silk");
    }

    #[test]
    fn unknown_bytes() {
        assert_eq!(sniff_mime(b""), OCTET_STREAM);
        assert_eq!(sniff_mime(b"RIFF"), OCTET_STREAM);
        assert_eq!(sniff_mime(b"plain text"), OCTET_STREAM);
    }
}
