//! Project hierarchy records and consumption roll-ups.

pub mod service;
pub mod types;


pub use service::BudgetAggregator;
pub use types::{
    Category, CategoryInput, CategorySummary, CategoryWithExpenses, ConsumptionStatus, Expense,
    ExpenseInput, Project, ProjectHierarchy, ProjectInput, ProjectSummary,
};
