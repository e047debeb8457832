//! JSON import and export of whole project trees.
//!
//! The document keeps the plan as a `plan_type` name plus an untyped
//! `extra_config` bag, so hand-written files can name any plan type and
//! leave parameters out:
//!
//! ```json
//! {
//!   "projects": [{
//!     "name": "Holiday",
//!     "budget": 500000,
//!     "plan_type": "hybrid",
//!     "extra_config": { "annual_rate": 0.05 },
//!     "categories": [{
//!       "name": "Flights",
//!       "budget": 200000,
//!       "expenses": [{ "name": "Outbound", "amount": 80000 }]
//!     }]
//!   }]
//! }
//! ```

use pennyplan_core::budget::{CategoryInput, ExpenseInput, ProjectInput};
use pennyplan_core::plan::PlanConfig;
use pennyplan_shared::config::PlanDefaults;
use pennyplan_shared::types::{Money, ProjectId};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::StoreResult;
use crate::repository::ProjectRepository;

/// A set of project trees.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Projects with everything under them.
    #[serde(default)]
    pub projects: Vec<ProjectDoc>,
}

/// A project as written in a snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectDoc {
    /// Display name.
    pub name: String,
    /// Total budget in minor units.
    pub budget: Money,
    /// Plan type name.
    pub plan_type: String,
    /// Plan parameters; missing ones come from the configured defaults.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extra_config: Option<Value>,
    /// Optional description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Categories.
    #[serde(default)]
    pub categories: Vec<CategoryDoc>,
}

/// A category as written in a snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryDoc {
    /// Display name.
    pub name: String,
    /// Category budget in minor units.
    pub budget: Money,
    /// Optional description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Expenses.
    #[serde(default)]
    pub expenses: Vec<ExpenseInput>,
}

impl Snapshot {
    /// Parses a snapshot document.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Snapshot` if the text is not a valid document.
    pub fn from_json(text: &str) -> StoreResult<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// Renders the snapshot as pretty JSON.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Snapshot` if serialization fails.
    pub fn to_json(&self) -> StoreResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Writes every project tree into `repo`, returning the new project IDs
    /// in document order.
    ///
    /// Plan parameters are resolved against `defaults` before anything is
    /// written, so a bad plan leaves the repository untouched.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Validation` for an unknown plan type or any
    /// input the repository rejects.
    pub async fn import_into<R: ProjectRepository + ?Sized>(
        &self,
        repo: &R,
        defaults: &PlanDefaults,
    ) -> StoreResult<Vec<ProjectId>> {
        let plans = self
            .projects
            .iter()
            .map(|p| PlanConfig::from_parts(&p.plan_type, p.extra_config.as_ref(), defaults))
            .collect::<Result<Vec<_>, _>>()?;

        let mut ids = Vec::with_capacity(self.projects.len());
        for (doc, plan) in self.projects.iter().zip(plans) {
            let project = repo
                .create_project(ProjectInput {
                    name: doc.name.clone(),
                    budget: doc.budget,
                    plan,
                    description: doc.description.clone(),
                })
                .await?;

            for cat in &doc.categories {
                let category = repo
                    .create_category(
                        project.id,
                        CategoryInput {
                            name: cat.name.clone(),
                            budget: cat.budget,
                            description: cat.description.clone(),
                        },
                    )
                    .await?;
                for expense in &cat.expenses {
                    repo.create_expense(category.id, expense.clone()).await?;
                }
            }
            ids.push(project.id);
        }

        tracing::info!(projects = ids.len(), "snapshot imported");
        Ok(ids)
    }

    /// Reads every project tree out of `repo`.
    ///
    /// # Errors
    ///
    /// Propagates repository errors.
    pub async fn capture<R: ProjectRepository + ?Sized>(repo: &R) -> StoreResult<Self> {
        let mut projects = Vec::new();
        for project in repo.list_projects().await? {
            let hierarchy = repo.load_hierarchy(project.id).await?;
            let extra = hierarchy.project.plan.extra_config();
            projects.push(ProjectDoc {
                name: hierarchy.project.name,
                budget: hierarchy.project.budget,
                plan_type: hierarchy.project.plan.plan_type().to_string(),
                extra_config: extra.as_object().filter(|m| !m.is_empty()).map(|_| extra.clone()),
                description: hierarchy.project.description,
                categories: hierarchy
                    .categories
                    .into_iter()
                    .map(|c| CategoryDoc {
                        name: c.category.name,
                        budget: c.category.budget,
                        description: c.category.description,
                        expenses: c
                            .expenses
                            .into_iter()
                            .map(|e| ExpenseInput {
                                name: e.name,
                                amount: e.amount,
                            })
                            .collect(),
                    })
                    .collect(),
            });
        }
        Ok(Self { projects })
    }
}
