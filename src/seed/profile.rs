use clap::ValueEnum;

use crate::locale::Locale;

/// 预置的数据规模
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Profile {
    #[default]
    Default,
    Small,
    Medium,
    Large,
    Benchmark,
    Test,
}

/// 一次生成的参数
#[derive(Debug, Clone, PartialEq)]
pub struct SeedConfig {
    pub categories: usize,
    pub articles: usize,
    /// 实体带有译文的概率
    pub translation_rate: f64,
    pub locales: &'static [Locale],
    pub batch_size: usize,
}

impl Profile {
    pub fn config(self) -> SeedConfig {
        use Locale::*;

        let (categories, articles, translation_rate, locales, batch_size): (
            usize,
            usize,
            f64,
            &'static [Locale],
            usize,
        ) = match self {
            Profile::Default => (50, 500, 0.6, &[En, ZhCn], 50),
            Profile::Small => (10, 50, 0.8, &[En], 20),
            Profile::Medium => (100, 1000, 0.7, &[En, ZhCn, ZhTw], 100),
            Profile::Large => (500, 5000, 0.7, &[En, ZhCn, ZhTw, Ko], 100),
            Profile::Benchmark => (500, 10000, 0.7, &[En, ZhCn, ZhTw, Ko], 200),
            Profile::Test => (5, 20, 1.0, &[En, ZhCn], 10),
        };

        SeedConfig {
            categories,
            articles,
            translation_rate,
            locales,
            batch_size,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profiles_never_translate_base_locale() {
        for profile in Profile::value_variants() {
            let config = profile.config();
            assert!(!config.locales.contains(&Locale::BASE), "{profile:?}");
            assert!((0.0..=1.0).contains(&config.translation_rate));
            assert!(config.batch_size > 0);
        }
    }

    #[test]
    fn test_profile_names() {
        assert_eq!(Profile::from_str("benchmark", false), Ok(Profile::Benchmark));
        assert_eq!(Profile::Test.config().articles, 20);
        assert_eq!(Profile::default().config().categories, 50);
    }
}
