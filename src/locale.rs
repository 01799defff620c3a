use std::fmt;

use serde::Serialize;

/// 支持的语言
///
/// 基础语言为 [`Locale::Ja`]，主表中的文本即为日语原文，其余语言存放在各模式的翻译存储中。
///
/// 模式一的翻译表使用 Postgres 枚举类型 `locale`，其标签为 `zh_cn` 这样的下划线形式，
/// 因此这里直接派生 [`sqlx::Type`]。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, sqlx::Type)]
#[sqlx(type_name = "locale", rename_all = "snake_case")]
pub enum Locale {
    #[default]
    #[serde(rename = "ja")]
    Ja,
    #[serde(rename = "en")]
    En,
    #[serde(rename = "zh-CN")]
    ZhCn,
    #[serde(rename = "zh-TW")]
    ZhTw,
    #[serde(rename = "ko")]
    Ko,
}

impl Locale {
    /// 基础语言
    pub const BASE: Locale = Locale::Ja;

    /// 全部支持的语言，顺序固定
    pub const ALL: [Locale; 5] = [
        Locale::Ja,
        Locale::En,
        Locale::ZhCn,
        Locale::ZhTw,
        Locale::Ko,
    ];

    /// 规范的语言标签，如 `zh-CN`
    pub const fn as_str(self) -> &'static str {
        match self {
            Locale::Ja => "ja",
            Locale::En => "en",
            Locale::ZhCn => "zh-CN",
            Locale::ZhTw => "zh-TW",
            Locale::Ko => "ko",
        }
    }

    /// 是否为基础语言
    pub fn is_base(self) -> bool {
        self == Self::BASE
    }

    /// 解析语言标签
    ///
    /// 大小写不敏感，`-` 与 `_` 均可作为分隔符。
    pub fn parse(value: &str) -> Option<Self> {
        let normalized = value.trim().to_ascii_lowercase().replace('_', "-");
        match normalized.as_str() {
            "ja" => Some(Locale::Ja),
            "en" => Some(Locale::En),
            "zh-cn" => Some(Locale::ZhCn),
            "zh-tw" => Some(Locale::ZhTw),
            "ko" => Some(Locale::Ko),
            _ => None,
        }
    }

    /// 根据查询参数和 `Accept-Language` 请求头协商出本次请求的语言
    ///
    /// 1. 查询参数非空时单独决定结果，不支持的值回退到默认语言
    /// 2. 否则按权重依次匹配 `Accept-Language` 中的语言
    /// 3. 都没有命中时使用默认语言
    pub fn negotiate(query: Option<&str>, accept_language: Option<&str>) -> Self {
        if let Some(value) = query.map(str::trim).filter(|v| !v.is_empty()) {
            return Self::parse(value).unwrap_or_default();
        }

        accept_language
            .and_then(Self::from_accept_language)
            .unwrap_or_default()
    }

    fn from_accept_language(header: &str) -> Option<Self> {
        let mut ranges: Vec<(&str, f32)> = header
            .split(',')
            .filter_map(|part| {
                let mut pieces = part.split(';');
                let tag = pieces.next()?.trim();
                if tag.is_empty() {
                    return None;
                }
                let weight = pieces
                    .filter_map(|p| p.trim().strip_prefix("q="))
                    .find_map(|q| q.trim().parse::<f32>().ok())
                    .unwrap_or(1.0);
                Some((tag, weight))
            })
            .filter(|(_, weight)| *weight > 0.0)
            .collect();

        // sort_by 是稳定排序，同权重保持请求头中的顺序
        ranges.sort_by(|a, b| b.1.total_cmp(&a.1));

        ranges.into_iter().find_map(|(tag, _)| Self::match_tag(tag))
    }

    fn match_tag(tag: &str) -> Option<Self> {
        if let Some(locale) = Self::parse(tag) {
            return Some(locale);
        }

        let lower = tag.to_ascii_lowercase().replace('_', "-");
        let mut subtags = lower.split('-');
        match subtags.next()? {
            "zh" => {
                let traditional = subtags.any(|s| matches!(s, "tw" | "hk" | "mo" | "hant"));
                Some(if traditional { Locale::ZhTw } else { Locale::ZhCn })
            }
            primary => Self::parse(primary),
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!(Locale::parse("zh-CN"), Some(Locale::ZhCn));
        assert_eq!(Locale::parse("zh-cn"), Some(Locale::ZhCn));
        assert_eq!(Locale::parse("ZH_TW"), Some(Locale::ZhTw));
        assert_eq!(Locale::parse(" ko "), Some(Locale::Ko));
        assert_eq!(Locale::parse("fr"), None);
        assert_eq!(Locale::parse(""), None);
    }

    #[test]
    fn test_query_wins_over_header() {
        assert_eq!(Locale::negotiate(Some("en"), Some("ko")), Locale::En);
    }

    #[test]
    fn test_unsupported_query_falls_back_to_default() {
        // 查询参数存在时不再查看请求头
        assert_eq!(Locale::negotiate(Some("fr"), Some("ko")), Locale::Ja);
    }

    #[test]
    fn test_empty_query_uses_header() {
        assert_eq!(Locale::negotiate(Some(""), Some("ko-KR,ko;q=0.9")), Locale::Ko);
    }

    #[test]
    fn test_header_first_supported_language() {
        assert_eq!(
            Locale::negotiate(None, Some("fr-FR, de;q=0.9, en-US;q=0.8, ja;q=0.7")),
            Locale::En
        );
    }

    #[test]
    fn test_header_respects_weights() {
        assert_eq!(Locale::negotiate(None, Some("en;q=0.5, ko")), Locale::Ko);
        assert_eq!(Locale::negotiate(None, Some("ko;q=0, en;q=0.1")), Locale::En);
    }

    #[test]
    fn test_header_chinese_variants() {
        assert_eq!(Locale::negotiate(None, Some("zh")), Locale::ZhCn);
        assert_eq!(Locale::negotiate(None, Some("zh-SG")), Locale::ZhCn);
        assert_eq!(Locale::negotiate(None, Some("zh-TW")), Locale::ZhTw);
        assert_eq!(Locale::negotiate(None, Some("zh-HK")), Locale::ZhTw);
        assert_eq!(Locale::negotiate(None, Some("zh-Hant-TW")), Locale::ZhTw);
        assert_eq!(Locale::negotiate(None, Some("zh-Hans")), Locale::ZhCn);
    }

    #[test]
    fn test_default_locale() {
        assert_eq!(Locale::negotiate(None, None), Locale::Ja);
        assert_eq!(Locale::negotiate(None, Some("fr, de")), Locale::Ja);
        assert_eq!(Locale::negotiate(None, Some("")), Locale::Ja);
    }

    #[test]
    fn test_serialize_uses_canonical_tag() {
        assert_eq!(serde_json::to_string(&Locale::ZhTw).unwrap(), "\"zh-TW\"");
        for locale in Locale::ALL {
            let json = serde_json::to_string(&locale).unwrap();
            assert_eq!(json.trim_matches('"'), locale.as_str());
        }
    }
}
