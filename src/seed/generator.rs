use chrono::{DateTime, Utc};
use rand::{SeedableRng, rngs::StdRng};

use super::{SeedConfig, fixtures};
use crate::{
    config::TranslationPattern,
    error::Result,
    locale::Locale,
    storage::{
        ArticleRepository, CategoryRepository, DBPool, Repository,
        bulk_insert_articles,
        schema::{self, TableCounts},
    },
};

/// 批量生成演示和压测数据
///
/// 译文通过仓储的更新接口写入，因此每种模式都以自己的方式保存。
pub struct Seeder {
    repo: Repository,
    config: SeedConfig,
    rng: StdRng,
    /// 随机发布时间的上限
    now: DateTime<Utc>,
}

impl Seeder {
    pub fn new(pattern: TranslationPattern, pool: DBPool, config: SeedConfig) -> Self {
        Self {
            repo: Repository::new(pattern, pool),
            config,
            rng: StdRng::from_entropy(),
            now: Utc::now(),
        }
    }

    /// 使用固定种子，生成的数据可复现
    ///
    /// 时间上限也固定为 [`fixtures::fixed_end`]，否则日期区间随运行时刻变化。
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self.now = fixtures::fixed_end();
        self
    }

    fn pool(&self) -> &DBPool {
        self.repo.pool()
    }

    fn pattern(&self) -> TranslationPattern {
        self.repo.pattern()
    }

    /// 清空数据后依次生成分类、文章和性能测试数据，返回最终的行数统计
    pub async fn run(&mut self) -> Result<TableCounts> {
        tracing::info!(pattern = %self.pattern(), config = ?self.config, "seeding");

        schema::clear(self.pool(), self.pattern()).await?;
        tracing::info!("data cleared");

        let category_ids = self.categories().await?;
        self.articles(&category_ids).await?;
        self.performance(&category_ids).await?;

        let counts = schema::counts(self.pool(), self.pattern()).await?;
        tracing::info!(
            pattern = %self.pattern(),
            categories = counts.categories,
            articles = counts.articles,
            published = counts.published_articles,
            translations = counts.translations,
            "seeding completed"
        );
        Ok(counts)
    }

    async fn categories(&mut self) -> Result<Vec<i32>> {
        let top_level = self.config.categories / 5;
        let seeds = fixtures::categories(
            &mut self.rng,
            top_level,
            self.config.translation_rate,
            self.config.locales,
        );
        tracing::info!(count = seeds.len(), "generating categories");

        let mut ids: Vec<i32> = Vec::with_capacity(seeds.len());
        for (i, seed) in seeds.into_iter().enumerate() {
            let mut category = seed.category;
            category.parent_id = seed.parent.and_then(|p| ids.get(p).copied());

            let created = CategoryRepository::create(&self.repo, &category, Locale::BASE).await?;
            for (locale, patch) in &seed.translations {
                CategoryRepository::update(&self.repo, created.id, patch, *locale).await?;
            }
            ids.push(created.id);

            if (i + 1) % self.config.batch_size == 0 {
                tracing::info!(done = i + 1, "categories");
            }
        }

        Ok(ids)
    }

    async fn articles(&mut self, category_ids: &[i32]) -> Result<()> {
        tracing::info!(count = self.config.articles, "generating articles");
        let now = self.now;

        for i in 0..self.config.articles {
            let seed = fixtures::article(
                &mut self.rng,
                i,
                category_ids,
                self.config.translation_rate,
                self.config.locales,
                now,
            );

            let created = ArticleRepository::create(&self.repo, &seed.article, Locale::BASE).await?;
            for (locale, patch) in &seed.translations {
                ArticleRepository::update(&self.repo, created.id, patch, *locale).await?;
            }

            if (i + 1) % self.config.batch_size == 0 {
                tracing::info!(done = i + 1, total = self.config.articles, "articles");
            }
        }

        Ok(())
    }

    async fn performance(&mut self, category_ids: &[i32]) -> Result<()> {
        if category_ids.is_empty() {
            tracing::warn!("no categories, skipping performance data");
            return Ok(());
        }

        let articles = fixtures::performance_articles(category_ids, self.now);
        let mut inserted = 0;
        for batch in articles.chunks(self.config.batch_size) {
            inserted += bulk_insert_articles(self.pool(), batch).await?;
        }
        tracing::info!(inserted, "performance data generated");
        Ok(())
    }
}
