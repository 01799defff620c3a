use std::{env, fmt, str::FromStr};

use serde::Serialize;

use crate::error::{Error, Result};

const DEFAULT_PORT: u16 = 4001;
const DEFAULT_CORS_ORIGINS: &str = "http://localhost:5180,http://localhost:5173,http://localhost:3000";

/// 翻译数据的存储模式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum TranslationPattern {
    /// 主表 + 每个实体专用的翻译表
    #[default]
    #[serde(rename = "pattern1")]
    Dedicated,
    /// 所有实体共用一张翻译表
    #[serde(rename = "pattern2")]
    Unified,
    /// 翻译以 JSON 列存放在主表中
    #[serde(rename = "pattern3")]
    JsonColumns,
}

impl TranslationPattern {
    pub const fn as_str(self) -> &'static str {
        match self {
            TranslationPattern::Dedicated => "pattern1",
            TranslationPattern::Unified => "pattern2",
            TranslationPattern::JsonColumns => "pattern3",
        }
    }

    pub const fn description(self) -> &'static str {
        match self {
            TranslationPattern::Dedicated => "Main + Dedicated Translation Tables",
            TranslationPattern::Unified => "Unified Translation Table",
            TranslationPattern::JsonColumns => "JSON Column Management",
        }
    }

    /// 每个模式专用的数据库连接环境变量
    pub const fn database_url_var(self) -> &'static str {
        match self {
            TranslationPattern::Dedicated => "DATABASE_URL_PATTERN1",
            TranslationPattern::Unified => "DATABASE_URL_PATTERN2",
            TranslationPattern::JsonColumns => "DATABASE_URL_PATTERN3",
        }
    }

    /// 从环境变量 `TRANSLATION_PATTERN` 读取，未设置时为模式一
    pub fn from_env() -> Result<Self> {
        match env::var("TRANSLATION_PATTERN") {
            Ok(value) if !value.trim().is_empty() => value.parse(),
            _ => Ok(Self::default()),
        }
    }
}

impl FromStr for TranslationPattern {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "pattern1" => Ok(TranslationPattern::Dedicated),
            "pattern2" => Ok(TranslationPattern::Unified),
            "pattern3" => Ok(TranslationPattern::JsonColumns),
            other => Err(Error::Config(format!(
                "Unknown translation pattern: {other}"
            ))),
        }
    }
}

impl fmt::Display for TranslationPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 服务配置
#[derive(Debug, Clone)]
pub struct Config {
    pub pattern: TranslationPattern,
    pub database_url: String,
    pub port: u16,
    pub cors_origins: Vec<String>,
}

impl Config {
    /// 从环境变量读取配置
    ///
    /// 数据库地址优先使用当前模式专用的变量，其次为 `DATABASE_URL`。
    pub fn from_env() -> Result<Self> {
        let pattern = TranslationPattern::from_env()?;
        let database_url = database_url(pattern)?;

        let port = match env::var("PORT") {
            Ok(p) => p
                .trim()
                .parse()
                .map_err(|_| Error::Config(format!("Invalid PORT: {p}")))?,
            Err(_) => DEFAULT_PORT,
        };

        let cors_origins = parse_origins(
            &env::var("CORS_ORIGINS").unwrap_or_else(|_| DEFAULT_CORS_ORIGINS.to_string()),
        );

        Ok(Self {
            pattern,
            database_url,
            port,
            cors_origins,
        })
    }
}

/// 读取指定模式的数据库地址
pub fn database_url(pattern: TranslationPattern) -> Result<String> {
    env::var(pattern.database_url_var())
        .or_else(|_| env::var("DATABASE_URL"))
        .map_err(|_| {
            Error::Config(format!(
                "环境变量: `{}` 或 `DATABASE_URL`: NotPresent",
                pattern.database_url_var()
            ))
        })
}

fn parse_origins(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|o| !o.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pattern_from_str() {
        assert_eq!(
            "pattern1".parse::<TranslationPattern>().unwrap(),
            TranslationPattern::Dedicated
        );
        assert_eq!(
            "pattern2".parse::<TranslationPattern>().unwrap(),
            TranslationPattern::Unified
        );
        assert_eq!(
            " pattern3 ".parse::<TranslationPattern>().unwrap(),
            TranslationPattern::JsonColumns
        );
        assert!(matches!(
            "pattern4".parse::<TranslationPattern>(),
            Err(Error::Config(_))
        ));
    }

    #[test]
    fn test_pattern_serializes_as_name() {
        assert_eq!(
            serde_json::to_string(&TranslationPattern::Unified).unwrap(),
            "\"pattern2\""
        );
    }

    #[test]
    fn test_parse_origins() {
        assert_eq!(
            parse_origins("http://a, ,http://b,"),
            vec!["http://a".to_string(), "http://b".to_string()]
        );
        assert_eq!(parse_origins(DEFAULT_CORS_ORIGINS).len(), 3);
    }
}
