use serde::Deserialize;

use super::slug;
use crate::{
    error::{Error, Result},
    locale::Locale,
    storage::{CategoryData, CategoryPatch, CategoryRepository, NewCategory, Page, PageRequest},
};

/// 新建分类的请求体
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CategoryInput {
    pub name: Option<String>,
    pub description: Option<String>,
    pub slug: Option<String>,
    pub parent_id: Option<i32>,
    pub display_order: Option<i32>,
}

impl CategoryInput {
    fn validate(self) -> Result<NewCategory> {
        let Some(name) = self.name.filter(|n| !n.trim().is_empty()) else {
            return Err(Error::BadRequest("Name is required".into()));
        };

        let slug = match self.slug.filter(|s| !s.trim().is_empty()) {
            Some(s) => s.trim().to_string(),
            None => slug::slugify(&name, "category"),
        };

        Ok(NewCategory {
            name,
            description: self.description,
            slug,
            parent_id: self.parent_id,
            display_order: self.display_order.unwrap_or(0),
        })
    }
}

/// 分类业务逻辑
#[derive(Debug, Clone)]
pub struct CategoryService<R> {
    repo: R,
}

impl<R: CategoryRepository> CategoryService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    pub async fn list(&self, locale: Locale, page: PageRequest) -> Result<Page<CategoryData>> {
        self.repo.find_many(locale, page).await
    }

    pub async fn get_by_id(&self, id: i32, locale: Locale) -> Result<CategoryData> {
        self.repo
            .find_by_id(id, locale)
            .await?
            .ok_or(Error::NotFound("Category not found"))
    }

    pub async fn create(&self, input: CategoryInput, locale: Locale) -> Result<CategoryData> {
        let mut category = input.validate()?;

        if self
            .repo
            .find_by_slug(&category.slug, Locale::BASE)
            .await?
            .is_some()
        {
            category.slug = slug::with_timestamp(&category.slug);
        }

        self.repo.create(&category, locale).await
    }

    pub async fn update(
        &self,
        id: i32,
        mut patch: CategoryPatch,
        locale: Locale,
    ) -> Result<CategoryData> {
        let existing = self
            .repo
            .find_by_id(id, Locale::BASE)
            .await?
            .ok_or(Error::NotFound("Category not found"))?;

        patch.slug = patch
            .slug
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());

        if let Some(slug) = patch.slug.as_deref().filter(|s| *s != existing.slug) {
            let taken = self.repo.find_by_slug(slug, Locale::BASE).await?;
            if taken.is_some_and(|c| c.id != id) {
                return Err(Error::Conflict("Slug already exists"));
            }
        }

        if patch.parent_id == Some(id) {
            return Err(Error::BadRequest("Category cannot be its own parent".into()));
        }

        self.repo
            .update(id, &patch, locale)
            .await?
            .ok_or(Error::NotFound("Category not found"))
    }

    pub async fn delete(&self, id: i32) -> Result<()> {
        if !self.repo.delete(id).await? {
            return Err(Error::NotFound("Category not found"));
        }
        Ok(())
    }

    pub async fn remove_translation(&self, id: i32, locale: Locale) -> Result<CategoryData> {
        if locale.is_base() {
            return Err(Error::BadRequest(format!(
                "Cannot remove base locale ({locale}) content"
            )));
        }

        self.repo
            .remove_translation(id, locale)
            .await?
            .ok_or(Error::NotFound("Category not found"))
    }
}

#[cfg(test)]
mod tests {
    use std::{collections::HashMap, sync::Mutex};

    use chrono::Utc;

    use super::*;
    use crate::storage::{CategoryRow, CategoryText};

    #[derive(Default)]
    struct MemoryCategories {
        rows: Mutex<Vec<CategoryRow>>,
        translations: Mutex<HashMap<(i32, Locale), CategoryText>>,
    }

    impl MemoryCategories {
        fn view(&self, row: CategoryRow, locale: Locale) -> CategoryData {
            let text = self
                .translations
                .lock()
                .unwrap()
                .get(&(row.id, locale))
                .cloned()
                .unwrap_or_default();
            row.localize(locale, text)
        }

        fn row(&self, id: i32) -> Option<CategoryRow> {
            self.rows.lock().unwrap().iter().find(|r| r.id == id).cloned()
        }
    }

    impl CategoryRepository for MemoryCategories {
        async fn find_many(&self, locale: Locale, page: PageRequest) -> Result<Page<CategoryData>> {
            let mut rows = self.rows.lock().unwrap().clone();
            rows.sort_by_key(|r| (r.display_order, r.id));
            let all = rows.into_iter().map(|r| self.view(r, locale)).collect();
            Ok(Page::slice(all, page))
        }

        async fn find_by_id(&self, id: i32, locale: Locale) -> Result<Option<CategoryData>> {
            Ok(self.row(id).map(|r| self.view(r, locale)))
        }

        async fn find_by_slug(&self, slug: &str, locale: Locale) -> Result<Option<CategoryData>> {
            let row = self
                .rows
                .lock()
                .unwrap()
                .iter()
                .find(|r| r.slug == slug)
                .cloned();
            Ok(row.map(|r| self.view(r, locale)))
        }

        async fn create(&self, category: &NewCategory, locale: Locale) -> Result<CategoryData> {
            let now = Utc::now();
            let row = {
                let mut rows = self.rows.lock().unwrap();
                let row = CategoryRow {
                    id: rows.len() as i32 + 1,
                    name: category.name.clone(),
                    description: category.description.clone(),
                    slug: category.slug.clone(),
                    parent_id: category.parent_id,
                    display_order: category.display_order,
                    created_at: now,
                    updated_at: now,
                };
                rows.push(row.clone());
                row
            };
            Ok(self.view(row, locale))
        }

        async fn update(
            &self,
            id: i32,
            patch: &CategoryPatch,
            locale: Locale,
        ) -> Result<Option<CategoryData>> {
            {
                let mut rows = self.rows.lock().unwrap();
                let Some(row) = rows.iter_mut().find(|r| r.id == id) else {
                    return Ok(None);
                };
                if locale.is_base() {
                    if let Some(v) = patch.name.clone() {
                        row.name = v;
                    }
                }
                if let Some(v) = patch.slug.clone() {
                    row.slug = v;
                }
                if let Some(v) = patch.display_order {
                    row.display_order = v;
                }
            }
            if !locale.is_base() {
                let text = patch.text().non_empty();
                if !text.is_empty() {
                    self.translations.lock().unwrap().insert((id, locale), text);
                }
            }
            Ok(self.row(id).map(|r| self.view(r, locale)))
        }

        async fn delete(&self, id: i32) -> Result<bool> {
            let mut rows = self.rows.lock().unwrap();
            let before = rows.len();
            rows.retain(|r| r.id != id);
            Ok(rows.len() != before)
        }

        async fn remove_translation(
            &self,
            id: i32,
            locale: Locale,
        ) -> Result<Option<CategoryData>> {
            self.translations.lock().unwrap().remove(&(id, locale));
            Ok(self.row(id).map(|r| self.view(r, Locale::BASE)))
        }
    }

    fn service() -> CategoryService<MemoryCategories> {
        CategoryService::new(MemoryCategories::default())
    }

    fn input(name: &str, order: i32) -> CategoryInput {
        CategoryInput {
            name: Some(name.into()),
            display_order: Some(order),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_create_requires_name() {
        let err = service()
            .create(CategoryInput::default(), Locale::Ja)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::BadRequest(m) if m == "Name is required"));
    }

    #[tokio::test]
    async fn test_create_slug_from_name() {
        let service = service();
        let a = service.create(input("Web Dev", 0), Locale::Ja).await.unwrap();
        assert_eq!(a.slug, "web-dev");
        let b = service.create(input("Web Dev", 1), Locale::Ja).await.unwrap();
        assert!(b.slug.starts_with("web-dev-"));

        let c = service
            .create(input("!!!", 2), Locale::Ja)
            .await
            .unwrap();
        assert_eq!(c.slug, "category");
    }

    #[tokio::test]
    async fn test_list_ordered_by_display_order() {
        let service = service();
        service.create(input("b", 2), Locale::Ja).await.unwrap();
        service.create(input("a", 1), Locale::Ja).await.unwrap();

        let page = service
            .list(Locale::Ja, PageRequest::default())
            .await
            .unwrap();
        let names: Vec<_> = page.data.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, ["a", "b"]);
        assert_eq!(page.total, 2);
    }

    #[tokio::test]
    async fn test_translation_lifecycle() {
        let service = service();
        let created = service
            .create(input("テクノロジー", 0), Locale::Ja)
            .await
            .unwrap();

        let patch = CategoryPatch {
            name: Some("Technology".into()),
            ..Default::default()
        };
        let en = service.update(created.id, patch, Locale::En).await.unwrap();
        assert_eq!(en.name, "Technology");
        assert_eq!(
            service.get_by_id(created.id, Locale::Ja).await.unwrap().name,
            "テクノロジー"
        );

        service
            .remove_translation(created.id, Locale::En)
            .await
            .unwrap();
        assert_eq!(
            service.get_by_id(created.id, Locale::En).await.unwrap().name,
            "テクノロジー"
        );
    }

    #[tokio::test]
    async fn test_update_validation() {
        let service = service();
        let a = service.create(input("a", 0), Locale::Ja).await.unwrap();
        let b = service.create(input("b", 0), Locale::Ja).await.unwrap();

        let patch = CategoryPatch {
            slug: Some(a.slug.clone()),
            ..Default::default()
        };
        assert!(matches!(
            service.update(b.id, patch, Locale::Ja).await,
            Err(Error::Conflict(_))
        ));

        let patch = CategoryPatch {
            parent_id: Some(b.id),
            ..Default::default()
        };
        assert!(matches!(
            service.update(b.id, patch, Locale::Ja).await,
            Err(Error::BadRequest(_))
        ));

        assert!(matches!(
            service.get_by_id(99, Locale::Ja).await,
            Err(Error::NotFound("Category not found"))
        ));
        assert!(matches!(service.delete(99).await, Err(Error::NotFound(_))));
    }
}
