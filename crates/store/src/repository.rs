//! Repository port.

use async_trait::async_trait;
use pennyplan_core::budget::{
    Category, CategoryInput, Expense, ExpenseInput, Project, ProjectHierarchy, ProjectInput,
};
use pennyplan_shared::types::{CategoryId, ExpenseId, ProjectId};

use crate::error::StoreResult;

/// CRUD access to the project hierarchy.
///
/// Writes validate their input and check that the parent exists. Deleting a
/// project removes its categories and their expenses; deleting a category
/// removes its expenses. Listings come back in creation order.
#[async_trait]
pub trait ProjectRepository: Send + Sync {
    /// Create a project.
    async fn create_project(&self, input: ProjectInput) -> StoreResult<Project>;

    /// Find a project by ID.
    async fn get_project(&self, id: ProjectId) -> StoreResult<Project>;

    /// List all projects.
    async fn list_projects(&self) -> StoreResult<Vec<Project>>;

    /// Replace a project's editable fields.
    async fn update_project(&self, id: ProjectId, input: ProjectInput) -> StoreResult<Project>;

    /// Delete a project and everything under it.
    async fn delete_project(&self, id: ProjectId) -> StoreResult<()>;

    /// Create a category under a project.
    async fn create_category(
        &self,
        project_id: ProjectId,
        input: CategoryInput,
    ) -> StoreResult<Category>;

    /// Find a category by ID.
    async fn get_category(&self, id: CategoryId) -> StoreResult<Category>;

    /// List the categories of a project.
    async fn list_categories(&self, project_id: ProjectId) -> StoreResult<Vec<Category>>;

    /// Replace a category's editable fields.
    async fn update_category(&self, id: CategoryId, input: CategoryInput)
    -> StoreResult<Category>;

    /// Delete a category and its expenses.
    async fn delete_category(&self, id: CategoryId) -> StoreResult<()>;

    /// Log an expense under a category.
    async fn create_expense(
        &self,
        category_id: CategoryId,
        input: ExpenseInput,
    ) -> StoreResult<Expense>;

    /// Find an expense by ID.
    async fn get_expense(&self, id: ExpenseId) -> StoreResult<Expense>;

    /// List the expenses of a category.
    async fn list_expenses(&self, category_id: CategoryId) -> StoreResult<Vec<Expense>>;

    /// Replace an expense's editable fields.
    async fn update_expense(&self, id: ExpenseId, input: ExpenseInput) -> StoreResult<Expense>;

    /// Delete an expense.
    async fn delete_expense(&self, id: ExpenseId) -> StoreResult<()>;

    /// Read a project with all its categories and expenses in one
    /// consistent snapshot.
    async fn load_hierarchy(&self, id: ProjectId) -> StoreResult<ProjectHierarchy>;
}
