use chrono::Utc;

/// 由标题生成 slug
///
/// 转为小写，只保留 Unicode 字母数字、`_`、`-` 和空白，
/// 连续空白替换为 `-`，合并连续的 `-` 并去掉首尾的 `-`。
/// 结果为空时返回 `fallback`。
pub fn slugify(text: &str, fallback: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut pending_dash = false;

    for c in text.to_lowercase().chars() {
        if c.is_whitespace() || c == '-' {
            pending_dash = true;
        } else if c.is_alphanumeric() || c == '_' {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(c);
        }
    }

    if slug.is_empty() {
        fallback.to_string()
    } else {
        slug
    }
}

/// 给已被占用的 slug 加上毫秒时间戳后缀
pub fn with_timestamp(slug: &str) -> String {
    format!("{slug}-{}", Utc::now().timestamp_millis())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slugify_ascii() {
        assert_eq!(slugify("Hello, World!", "article"), "hello-world");
        assert_eq!(slugify("  Rust  --  async   IO ", "article"), "rust-async-io");
        assert_eq!(slugify("snake_case title", "article"), "snake_case-title");
    }

    #[test]
    fn test_slugify_keeps_unicode_letters() {
        assert_eq!(slugify("日本語 の 記事", "article"), "日本語-の-記事");
        assert_eq!(slugify("Ünïcödé Straße", "article"), "ünïcödé-straße");
    }

    #[test]
    fn test_slugify_empty_uses_fallback() {
        assert_eq!(slugify("!!! ???", "article"), "article");
        assert_eq!(slugify("", "category"), "category");
    }

    #[test]
    fn test_with_timestamp() {
        let slug = with_timestamp("hello");
        let (base, millis) = slug.rsplit_once('-').unwrap();
        assert_eq!(base, "hello");
        assert!(millis.parse::<i64>().unwrap() > 0);
    }
}
