//! Project, category and expense records.

use chrono::{DateTime, Utc};
use pennyplan_shared::types::{CategoryId, ExpenseId, Money, ProjectId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};
use crate::plan::PlanConfig;

/// A savings goal with a total budget.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    /// Project ID.
    pub id: ProjectId,
    /// Display name.
    pub name: String,
    /// Total budget in minor units.
    pub budget: Money,
    /// Plan type and its parameters.
    pub plan: PlanConfig,
    /// Optional description.
    pub description: Option<String>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

impl Project {
    /// Creates a project from validated input.
    #[must_use]
    pub fn new(input: ProjectInput, now: DateTime<Utc>) -> Self {
        Self {
            id: ProjectId::new(),
            name: input.name,
            budget: input.budget,
            plan: input.plan,
            description: input.description,
            created_at: now,
            updated_at: now,
        }
    }

    /// Replaces every editable field with `input`.
    pub fn apply(&mut self, input: ProjectInput, now: DateTime<Utc>) {
        self.name = input.name;
        self.budget = input.budget;
        self.plan = input.plan;
        self.description = input.description;
        self.updated_at = now;
    }
}

/// A spending category inside a project.
///
/// Category budgets are independent of the project budget; over- or
/// under-allocation is reported, never rejected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    /// Category ID.
    pub id: CategoryId,
    /// Owning project.
    pub project_id: ProjectId,
    /// Display name.
    pub name: String,
    /// Category budget in minor units.
    pub budget: Money,
    /// Optional description.
    pub description: Option<String>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

impl Category {
    /// Creates a category under `project_id` from validated input.
    #[must_use]
    pub fn new(project_id: ProjectId, input: CategoryInput, now: DateTime<Utc>) -> Self {
        Self {
            id: CategoryId::new(),
            project_id,
            name: input.name,
            budget: input.budget,
            description: input.description,
            created_at: now,
            updated_at: now,
        }
    }

    /// Replaces every editable field with `input`.
    pub fn apply(&mut self, input: CategoryInput, now: DateTime<Utc>) {
        self.name = input.name;
        self.budget = input.budget;
        self.description = input.description;
        self.updated_at = now;
    }
}

/// A logged expense inside a category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Expense {
    /// Expense ID.
    pub id: ExpenseId,
    /// Owning category.
    pub category_id: CategoryId,
    /// Display name.
    pub name: String,
    /// Amount in minor units.
    pub amount: Money,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

impl Expense {
    /// Creates an expense under `category_id` from validated input.
    #[must_use]
    pub fn new(category_id: CategoryId, input: ExpenseInput, now: DateTime<Utc>) -> Self {
        Self {
            id: ExpenseId::new(),
            category_id,
            name: input.name,
            amount: input.amount,
            created_at: now,
            updated_at: now,
        }
    }

    /// Replaces every editable field with `input`.
    pub fn apply(&mut self, input: ExpenseInput, now: DateTime<Utc>) {
        self.name = input.name;
        self.amount = input.amount;
        self.updated_at = now;
    }
}

/// Input for creating or replacing a project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectInput {
    /// Display name.
    pub name: String,
    /// Total budget in minor units.
    pub budget: Money,
    /// Plan type and its parameters.
    pub plan: PlanConfig,
    /// Optional description.
    #[serde(default)]
    pub description: Option<String>,
}

impl ProjectInput {
    /// Checks the input before it is stored.
    ///
    /// # Errors
    ///
    /// Returns `EngineError::InvalidInput` for a blank name, a negative
    /// budget, or out-of-range plan parameters.
    pub fn validate(&self) -> EngineResult<()> {
        validate_name("project", &self.name)?;
        validate_amount("project budget", self.budget)?;
        self.plan.validate()
    }
}

/// Input for creating or replacing a category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryInput {
    /// Display name.
    pub name: String,
    /// Category budget in minor units.
    pub budget: Money,
    /// Optional description.
    #[serde(default)]
    pub description: Option<String>,
}

impl CategoryInput {
    /// Checks the input before it is stored.
    ///
    /// # Errors
    ///
    /// Returns `EngineError::InvalidInput` for a blank name or a negative
    /// budget.
    pub fn validate(&self) -> EngineResult<()> {
        validate_name("category", &self.name)?;
        validate_amount("category budget", self.budget)
    }
}

/// Input for creating or replacing an expense.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpenseInput {
    /// Display name.
    pub name: String,
    /// Amount in minor units.
    pub amount: Money,
}

impl ExpenseInput {
    /// Checks the input before it is stored.
    ///
    /// # Errors
    ///
    /// Returns `EngineError::InvalidInput` for a blank name or a negative
    /// amount.
    pub fn validate(&self) -> EngineResult<()> {
        validate_name("expense", &self.name)?;
        validate_amount("expense amount", self.amount)
    }
}

fn validate_name(kind: &str, name: &str) -> EngineResult<()> {
    if name.trim().is_empty() {
        return Err(EngineError::InvalidInput(format!("{kind} name is required")));
    }
    Ok(())
}

fn validate_amount(what: &str, amount: Money) -> EngineResult<()> {
    if amount.is_negative() {
        return Err(EngineError::InvalidInput(format!(
            "{what} cannot be negative, got {amount}"
        )));
    }
    Ok(())
}

/// A category together with its expenses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryWithExpenses {
    /// The category.
    pub category: Category,
    /// Its expenses.
    pub expenses: Vec<Expense>,
}

/// Snapshot of a project and everything under it, as handed to the
/// aggregator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectHierarchy {
    /// The project.
    pub project: Project,
    /// Its categories, each with expenses.
    pub categories: Vec<CategoryWithExpenses>,
}

/// Consumption classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConsumptionStatus {
    /// Below 80% of the budget.
    Normal,
    /// At least 80% but below 100%.
    Warning,
    /// 100% or more.
    Danger,
}

impl ConsumptionStatus {
    /// Wire name of the status.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::Warning => "warning",
            Self::Danger => "danger",
        }
    }
}

impl std::fmt::Display for ConsumptionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Roll-up of one category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategorySummary {
    /// Category ID.
    pub category_id: CategoryId,
    /// Category name.
    pub name: String,
    /// Category budget.
    pub budget: Money,
    /// Sum of expense amounts.
    pub consumed: Money,
    /// `budget - consumed`; negative when overspent.
    pub remaining: Money,
    /// `consumed / budget`, `None` when the budget is zero.
    pub ratio: Option<Decimal>,
    /// Ratio as a percentage clamped to `[0, 100]`, two decimals.
    pub progress_percent: Decimal,
    /// Threshold classification.
    pub status: ConsumptionStatus,
}

/// Roll-up of a project and its categories.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectSummary {
    /// Project ID.
    pub project_id: ProjectId,
    /// Project name.
    pub name: String,
    /// Project budget.
    pub budget: Money,
    /// Sum of category budgets.
    pub allocated: Money,
    /// `budget - allocated`; negative when categories over-allocate.
    pub unallocated: Money,
    /// Sum of all expenses in all categories.
    pub consumed: Money,
    /// `budget - consumed`; negative when overspent.
    pub remainder: Money,
    /// `consumed / allocated`, `None` when nothing is allocated.
    pub ratio: Option<Decimal>,
    /// Ratio as a percentage clamped to `[0, 100]`, two decimals.
    pub progress_percent: Decimal,
    /// Threshold classification against the allocated total.
    pub status: ConsumptionStatus,
    /// Per-category roll-ups, in input order.
    pub categories: Vec<CategorySummary>,
}
