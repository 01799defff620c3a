//! 随机的演示数据

use chrono::{DateTime, Duration, TimeZone, Utc};
use rand::{Rng, seq::SliceRandom};

use crate::{
    locale::Locale,
    service::slugify,
    storage::{ArticlePatch, CategoryPatch, NewArticle, NewCategory},
};

const WORDS: &[&str] = &[
    "lorem", "ipsum", "dolor", "sit", "amet", "consectetur", "adipiscing", "elit", "sed", "do",
    "eiusmod", "tempor", "incididunt", "ut", "labore", "et", "dolore", "magna", "aliqua", "enim",
    "minim", "veniam", "quis", "nostrud", "exercitation", "ullamco", "laboris", "nisi", "aliquip",
    "commodo", "consequat", "duis", "aute", "irure", "reprehenderit", "voluptate", "velit",
    "esse", "cillum", "fugiat", "nulla", "pariatur", "excepteur", "sint", "occaecat",
    "cupidatat", "proident", "sunt", "culpa", "officia", "deserunt", "mollit", "anim", "laborum",
];

const MAIN_CATEGORIES: &[&str] = &[
    "Technology",
    "Business",
    "Science",
    "Health",
    "Education",
    "Entertainment",
    "Sports",
    "Travel",
    "Food",
    "Fashion",
    "Art",
    "Music",
    "Politics",
    "Environment",
    "Finance",
];

const SUB_CATEGORIES: &[&str] = &[
    "Web Development",
    "Mobile Apps",
    "AI & ML",
    "Cybersecurity",
    "Marketing",
    "Management",
    "Startups",
    "E-commerce",
    "Physics",
    "Chemistry",
    "Biology",
    "Medicine",
    "Fitness",
    "Nutrition",
    "Mental Health",
    "Research",
];

/// 部分分类名的人工译文，其余的以 `[LOCALE]` 前缀代替
fn known_name(name: &str, locale: Locale) -> Option<&'static str> {
    let row: [&'static str; 4] = match name {
        "Technology" => ["Technology", "技术", "技術", "기술"],
        "Business" => ["Business", "商业", "商業", "비즈니스"],
        "Science" => ["Science", "科学", "科學", "과학"],
        "Health" => ["Health", "健康", "健康", "건강"],
        _ => return None,
    };
    match locale {
        Locale::En => Some(row[0]),
        Locale::ZhCn => Some(row[1]),
        Locale::ZhTw => Some(row[2]),
        Locale::Ko => Some(row[3]),
        Locale::Ja => None,
    }
}

fn title_prefix(locale: Locale) -> &'static str {
    match locale {
        Locale::Ja => "",
        Locale::En => "EN: ",
        Locale::ZhCn => "中文：",
        Locale::ZhTw => "繁體：",
        Locale::Ko => "한국어: ",
    }
}

fn tag(locale: Locale) -> String {
    format!("[{}]", locale.as_str().to_uppercase())
}

/// 首字母大写、以句号结尾的句子
pub fn sentence(rng: &mut impl Rng, words: usize) -> String {
    let mut text = (0..words.max(1))
        .map(|_| *WORDS.choose(rng).unwrap_or(&"lorem"))
        .collect::<Vec<_>>()
        .join(" ");
    if let Some(first) = text.get(..1).map(str::to_uppercase) {
        text.replace_range(..1, &first);
    }
    text.push('.');
    text
}

pub fn paragraph(rng: &mut impl Rng, sentences: usize) -> String {
    (0..sentences.max(1))
        .map(|_| {
            let words = rng.gen_range(5..=12);
            sentence(rng, words)
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn paragraphs(rng: &mut impl Rng, min: usize, max: usize) -> String {
    let count = rng.gen_range(min..=max);
    (0..count)
        .map(|_| {
            let sentences = rng.gen_range(3..=8);
            paragraph(rng, sentences)
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// 待插入的分类，父分类以在列表中的下标表示
#[derive(Debug, Clone)]
pub struct CategorySeed {
    pub category: NewCategory,
    pub parent: Option<usize>,
    pub translations: Vec<(Locale, CategoryPatch)>,
}

/// 生成分层的分类，每个顶层分类带 2 到 5 个子分类
///
/// 返回的列表中父分类总在子分类之前。
pub fn categories(
    rng: &mut impl Rng,
    top_level: usize,
    translation_rate: f64,
    locales: &[Locale],
) -> Vec<CategorySeed> {
    let mut seeds = Vec::new();

    for _ in 0..top_level.max(1) {
        let parent = seeds.len();
        let name = *MAIN_CATEGORIES.choose(rng).unwrap_or(&"Technology");
        let seed = category(rng, name, parent, None, translation_rate, locales);
        seeds.push(seed);

        let children = rng.gen_range(2..=5);
        for _ in 0..children {
            let name = *SUB_CATEGORIES.choose(rng).unwrap_or(&"Research");
            let seed = category(rng, name, seeds.len(), Some(parent), translation_rate, locales);
            seeds.push(seed);
        }
    }

    seeds
}

fn category(
    rng: &mut impl Rng,
    name: &str,
    index: usize,
    parent: Option<usize>,
    translation_rate: f64,
    locales: &[Locale],
) -> CategorySeed {
    let words = rng.gen_range(5..=15);
    let category = NewCategory {
        name: name.to_string(),
        description: Some(sentence(rng, words)),
        slug: format!("{}-{}", slugify(name, "category"), index + 1),
        parent_id: None,
        display_order: index as i32,
    };

    let mut translations = Vec::new();
    if rng.gen_bool(translation_rate) {
        for &locale in locales {
            if !rng.gen_bool(0.7) {
                continue;
            }
            let words = rng.gen_range(5..=10);
            translations.push((
                locale,
                CategoryPatch {
                    name: Some(
                        known_name(name, locale)
                            .map(str::to_string)
                            .unwrap_or_else(|| format!("{} {name}", tag(locale))),
                    ),
                    description: Some(format!("{} {}", tag(locale), sentence(rng, words))),
                    ..Default::default()
                },
            ));
        }
    }

    CategorySeed {
        category,
        parent,
        translations,
    }
}

/// 待插入的文章及其译文
#[derive(Debug, Clone)]
pub struct ArticleSeed {
    pub article: NewArticle,
    pub translations: Vec<(Locale, ArticlePatch)>,
}

/// 生成一篇随机文章
///
/// 80% 已发布，发布时间在 2023-01-01 到 `now` 之间，浏览量 0 到 10000。
pub fn article(
    rng: &mut impl Rng,
    index: usize,
    category_ids: &[i32],
    translation_rate: f64,
    locales: &[Locale],
    now: DateTime<Utc>,
) -> ArticleSeed {
    let words = rng.gen_range(3..=8);
    let title = sentence(rng, words);
    let start = epoch();
    let span = (now - start).num_seconds().max(1);
    let published_at = start + Duration::seconds(rng.gen_range(0..span));

    let article = NewArticle {
        slug: format!("{}-{}", slugify(&title, "article"), index + 1),
        content: paragraphs(rng, 3, 12),
        summary: Some(paragraph(rng, 2)),
        category_id: category_ids.choose(rng).copied().unwrap_or(1),
        published: rng.gen_bool(0.8),
        published_at: Some(published_at),
        view_count: rng.gen_range(0..=10_000),
        title,
    };

    let mut translations = Vec::new();
    if rng.gen_bool(translation_rate) {
        for &locale in locales {
            if !rng.gen_bool(0.6) {
                continue;
            }
            let words = rng.gen_range(3..=8);
            let count = rng.gen_range(2..=6);
            let content = (0..count)
                .map(|_| format!("{} {}", tag(locale), paragraph(rng, 4)))
                .collect::<Vec<_>>()
                .join("\n\n");
            translations.push((
                locale,
                ArticlePatch {
                    title: Some(format!("{}{}", title_prefix(locale), sentence(rng, words))),
                    content: Some(content),
                    summary: Some(format!("{} {}", tag(locale), paragraph(rng, 2))),
                    ..Default::default()
                },
            ));
        }
    }

    ArticleSeed {
        article,
        translations,
    }
}

/// 用于性能测试的固定数据
///
/// - 1000 篇 `perf-test-article-N`，浏览量 `N * 10`
/// - 100 篇 `high-views-N`，浏览量从 10000 起
/// - 365 篇 `daily-N`，2023 年每天一篇
pub fn performance_articles(category_ids: &[i32], now: DateTime<Utc>) -> Vec<NewArticle> {
    let pick = |i: usize| {
        if category_ids.is_empty() {
            1
        } else {
            category_ids[i % category_ids.len()]
        }
    };
    let mut articles = Vec::with_capacity(1465);

    for i in 0..1000 {
        let n = i + 1;
        articles.push(NewArticle {
            title: format!("Performance Test Article {n}"),
            content: format!("This is performance test content for article {n}. ").repeat(100),
            summary: Some(format!("Performance test summary {n}")),
            slug: format!("perf-test-article-{n}"),
            category_id: pick(i),
            published: true,
            published_at: Some(now),
            view_count: (i * 10) as i32,
        });
    }

    for i in 0..100 {
        let n = i + 1;
        articles.push(NewArticle {
            title: format!("High Views Article {n}"),
            content: format!("High view count content {n}"),
            summary: Some(format!("High view summary {n}")),
            slug: format!("high-views-{n}"),
            category_id: pick(0),
            published: true,
            published_at: Some(now),
            view_count: 10_000 + i as i32,
        });
    }

    let start = epoch();
    for i in 0..365 {
        let n = i + 1;
        let day = start + Duration::days(i as i64);
        articles.push(NewArticle {
            title: format!("Daily Article {n}"),
            content: format!("Daily content for {}", day.format("%a %b %d %Y")),
            summary: Some(format!("Daily summary {n}")),
            slug: format!("daily-{n}"),
            category_id: pick(i),
            published: true,
            published_at: Some(day),
            view_count: i as i32,
        });
    }

    articles
}

/// 随机数据的起始时间 2023-01-01
fn epoch() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2023, 1, 1, 0, 0, 0)
        .single()
        .unwrap_or_default()
}

/// 固定种子时使用的结束时间 2025-01-01，使随机日期的区间与运行时刻无关
pub fn fixed_end() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0)
        .single()
        .unwrap_or_default()
}
