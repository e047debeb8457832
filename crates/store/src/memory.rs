//! In-memory repository.

use std::collections::HashMap;
use std::hash::Hash;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use pennyplan_core::budget::{
    Category, CategoryInput, CategoryWithExpenses, Expense, ExpenseInput, Project,
    ProjectHierarchy, ProjectInput,
};
use pennyplan_shared::types::{CategoryId, ExpenseId, ProjectId};
use tokio::sync::RwLock;

use crate::error::{StoreError, StoreResult};
use crate::repository::ProjectRepository;

/// A record plus its insertion sequence, for stable listing order.
#[derive(Debug, Clone)]
struct Row<T> {
    seq: u64,
    record: T,
}

/// Map of rows keyed by ID.
type Table<K, T> = HashMap<K, Row<T>>;

#[derive(Debug, Default)]
struct Tables {
    next_seq: u64,
    projects: Table<ProjectId, Project>,
    categories: Table<CategoryId, Category>,
    expenses: Table<ExpenseId, Expense>,
}

impl Tables {
    fn insert<K: Eq + Hash, T>(table: &mut Table<K, T>, seq: &mut u64, key: K, record: T) {
        *seq += 1;
        table.insert(key, Row { seq: *seq, record });
    }

    fn categories_of(&self, project_id: ProjectId) -> Vec<Category> {
        sorted(
            self.categories
                .values()
                .filter(|r| r.record.project_id == project_id),
        )
    }

    fn expenses_of(&self, category_id: CategoryId) -> Vec<Expense> {
        sorted(
            self.expenses
                .values()
                .filter(|r| r.record.category_id == category_id),
        )
    }

    /// Removes a category's expenses, returning how many went.
    fn drop_expenses_of(&mut self, category_id: CategoryId) -> usize {
        let before = self.expenses.len();
        self.expenses
            .retain(|_, r| r.record.category_id != category_id);
        before - self.expenses.len()
    }
}

fn sorted<'a, T: Clone + 'a>(rows: impl Iterator<Item = &'a Row<T>>) -> Vec<T> {
    let mut rows: Vec<&Row<T>> = rows.collect();
    rows.sort_by_key(|r| r.seq);
    rows.into_iter().map(|r| r.record.clone()).collect()
}

/// Repository keeping everything in process memory.
///
/// Cloning shares the same underlying tables.
#[derive(Debug, Clone, Default)]
pub struct InMemoryRepository {
    tables: Arc<RwLock<Tables>>,
}

impl InMemoryRepository {
    /// Creates an empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ProjectRepository for InMemoryRepository {
    async fn create_project(&self, input: ProjectInput) -> StoreResult<Project> {
        input.validate()?;
        let project = Project::new(input, Utc::now());

        let mut tables = self.tables.write().await;
        let Tables {
            next_seq, projects, ..
        } = &mut *tables;
        Tables::insert(projects, next_seq, project.id, project.clone());

        tracing::info!(project_id = %project.id, name = %project.name, "project created");
        Ok(project)
    }

    async fn get_project(&self, id: ProjectId) -> StoreResult<Project> {
        let tables = self.tables.read().await;
        tables
            .projects
            .get(&id)
            .map(|r| r.record.clone())
            .ok_or(StoreError::ProjectNotFound(id))
    }

    async fn list_projects(&self) -> StoreResult<Vec<Project>> {
        let tables = self.tables.read().await;
        Ok(sorted(tables.projects.values()))
    }

    async fn update_project(&self, id: ProjectId, input: ProjectInput) -> StoreResult<Project> {
        input.validate()?;

        let mut tables = self.tables.write().await;
        let row = tables
            .projects
            .get_mut(&id)
            .ok_or(StoreError::ProjectNotFound(id))?;
        row.record.apply(input, Utc::now());

        tracing::debug!(project_id = %id, "project updated");
        Ok(row.record.clone())
    }

    async fn delete_project(&self, id: ProjectId) -> StoreResult<()> {
        let mut tables = self.tables.write().await;
        if tables.projects.remove(&id).is_none() {
            return Err(StoreError::ProjectNotFound(id));
        }

        let category_ids: Vec<CategoryId> = tables
            .categories
            .values()
            .filter(|r| r.record.project_id == id)
            .map(|r| r.record.id)
            .collect();
        let mut expenses_removed = 0;
        for category_id in &category_ids {
            tables.categories.remove(category_id);
            expenses_removed += tables.drop_expenses_of(*category_id);
        }

        tracing::info!(
            project_id = %id,
            categories_removed = category_ids.len(),
            expenses_removed,
            "project deleted"
        );
        Ok(())
    }

    async fn create_category(
        &self,
        project_id: ProjectId,
        input: CategoryInput,
    ) -> StoreResult<Category> {
        input.validate()?;

        let mut tables = self.tables.write().await;
        if !tables.projects.contains_key(&project_id) {
            return Err(StoreError::ProjectNotFound(project_id));
        }
        let category = Category::new(project_id, input, Utc::now());
        let Tables {
            next_seq,
            categories,
            ..
        } = &mut *tables;
        Tables::insert(categories, next_seq, category.id, category.clone());

        tracing::debug!(category_id = %category.id, %project_id, "category created");
        Ok(category)
    }

    async fn get_category(&self, id: CategoryId) -> StoreResult<Category> {
        let tables = self.tables.read().await;
        tables
            .categories
            .get(&id)
            .map(|r| r.record.clone())
            .ok_or(StoreError::CategoryNotFound(id))
    }

    async fn list_categories(&self, project_id: ProjectId) -> StoreResult<Vec<Category>> {
        let tables = self.tables.read().await;
        if !tables.projects.contains_key(&project_id) {
            return Err(StoreError::ProjectNotFound(project_id));
        }
        Ok(tables.categories_of(project_id))
    }

    async fn update_category(
        &self,
        id: CategoryId,
        input: CategoryInput,
    ) -> StoreResult<Category> {
        input.validate()?;

        let mut tables = self.tables.write().await;
        let row = tables
            .categories
            .get_mut(&id)
            .ok_or(StoreError::CategoryNotFound(id))?;
        row.record.apply(input, Utc::now());

        tracing::debug!(category_id = %id, "category updated");
        Ok(row.record.clone())
    }

    async fn delete_category(&self, id: CategoryId) -> StoreResult<()> {
        let mut tables = self.tables.write().await;
        if tables.categories.remove(&id).is_none() {
            return Err(StoreError::CategoryNotFound(id));
        }
        let expenses_removed = tables.drop_expenses_of(id);

        tracing::info!(category_id = %id, expenses_removed, "category deleted");
        Ok(())
    }

    async fn create_expense(
        &self,
        category_id: CategoryId,
        input: ExpenseInput,
    ) -> StoreResult<Expense> {
        input.validate()?;

        let mut tables = self.tables.write().await;
        if !tables.categories.contains_key(&category_id) {
            return Err(StoreError::CategoryNotFound(category_id));
        }
        let expense = Expense::new(category_id, input, Utc::now());
        let Tables {
            next_seq, expenses, ..
        } = &mut *tables;
        Tables::insert(expenses, next_seq, expense.id, expense.clone());

        tracing::debug!(expense_id = %expense.id, %category_id, amount = %expense.amount, "expense logged");
        Ok(expense)
    }

    async fn get_expense(&self, id: ExpenseId) -> StoreResult<Expense> {
        let tables = self.tables.read().await;
        tables
            .expenses
            .get(&id)
            .map(|r| r.record.clone())
            .ok_or(StoreError::ExpenseNotFound(id))
    }

    async fn list_expenses(&self, category_id: CategoryId) -> StoreResult<Vec<Expense>> {
        let tables = self.tables.read().await;
        if !tables.categories.contains_key(&category_id) {
            return Err(StoreError::CategoryNotFound(category_id));
        }
        Ok(tables.expenses_of(category_id))
    }

    async fn update_expense(&self, id: ExpenseId, input: ExpenseInput) -> StoreResult<Expense> {
        input.validate()?;

        let mut tables = self.tables.write().await;
        let row = tables
            .expenses
            .get_mut(&id)
            .ok_or(StoreError::ExpenseNotFound(id))?;
        row.record.apply(input, Utc::now());

        tracing::debug!(expense_id = %id, "expense updated");
        Ok(row.record.clone())
    }

    async fn delete_expense(&self, id: ExpenseId) -> StoreResult<()> {
        let mut tables = self.tables.write().await;
        tables
            .expenses
            .remove(&id)
            .ok_or(StoreError::ExpenseNotFound(id))?;

        tracing::debug!(expense_id = %id, "expense deleted");
        Ok(())
    }

    async fn load_hierarchy(&self, id: ProjectId) -> StoreResult<ProjectHierarchy> {
        let tables = self.tables.read().await;
        let project = tables
            .projects
            .get(&id)
            .map(|r| r.record.clone())
            .ok_or(StoreError::ProjectNotFound(id))?;

        let categories = tables
            .categories_of(id)
            .into_iter()
            .map(|category| {
                let expenses = tables.expenses_of(category.id);
                CategoryWithExpenses { category, expenses }
            })
            .collect();

        Ok(ProjectHierarchy {
            project,
            categories,
        })
    }
}
