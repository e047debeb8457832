//! `pennyplan report`: project roll-ups and remainder allocation.

use std::fmt::Write as _;
use std::sync::Arc;

use anyhow::{Context, bail};
use pennyplan_client::HttpAllocationStrategy;
use pennyplan_core::EngineError;
use pennyplan_core::allocation::{
    AllocationBucket, AllocationStrategy, RemainderAllocator, WeightedAllocationStrategy,
};
use pennyplan_core::budget::{BudgetAggregator, ProjectSummary};
use pennyplan_core::chart::{ChartPoint, ChartSeries};
use pennyplan_core::plan::PlanConfig;
use pennyplan_shared::AppConfig;
use pennyplan_shared::config::AllocationConfig;
use pennyplan_shared::types::Currency;
use pennyplan_store::{InMemoryRepository, ProjectRepository, Snapshot};
use serde::Serialize;
use tracing::{info, warn};

use crate::cli::{OutputFormat, ReportArgs};

/// Bucket reported in place of a breakdown the strategy could not provide.
const UNALLOCATED_BUCKET: &str = "unallocated";

#[derive(Serialize)]
struct ProjectReport {
    plan: PlanConfig,
    summary: ProjectSummary,
    allocation: Vec<AllocationBucket>,
    #[serde(skip_serializing_if = "Option::is_none")]
    allocation_error: Option<String>,
    charts: ProjectCharts,
}

#[derive(Serialize)]
struct ProjectCharts {
    category_budgets: Vec<ChartPoint>,
    category_spending: Vec<ChartPoint>,
    allocation: Vec<ChartPoint>,
}

pub async fn run(args: &ReportArgs, config: &AppConfig) -> anyhow::Result<String> {
    let text = std::fs::read_to_string(&args.snapshot)
        .with_context(|| format!("failed to read snapshot {}", args.snapshot.display()))?;
    let snapshot = Snapshot::from_json(&text).context("failed to parse snapshot")?;

    let repo = InMemoryRepository::new();
    snapshot
        .import_into(&repo, &config.plan)
        .await
        .context("failed to import snapshot")?;

    let allocator = build_allocator(&config.allocation)?;

    let mut projects = repo.list_projects().await?;
    if let Some(name) = &args.project {
        projects.retain(|p| &p.name == name);
        if projects.is_empty() {
            bail!("no project named '{name}' in {}", args.snapshot.display());
        }
    }

    let mut reports = Vec::with_capacity(projects.len());
    for project in projects {
        let hierarchy = repo.load_hierarchy(project.id).await?;
        let summary = BudgetAggregator::summarize_project(&hierarchy)
            .with_context(|| format!("failed to summarize project '{}'", project.name))?;

        let (allocation, allocation_error) = match allocator
            .allocate(summary.budget, summary.consumed, &hierarchy.project.plan)
            .await
        {
            Ok(buckets) => (buckets, None),
            Err(EngineError::AllocationUnavailable(reason)) => {
                warn!(project = %summary.name, %reason, "allocation unavailable, reporting remainder as unallocated");
                (
                    vec![AllocationBucket::new(UNALLOCATED_BUCKET, summary.remainder)],
                    Some(reason),
                )
            }
            Err(e) => return Err(e).context("failed to allocate remainder"),
        };

        reports.push(ProjectReport {
            plan: hierarchy.project.plan.clone(),
            charts: ProjectCharts {
                category_budgets: ChartSeries::category_budgets(&hierarchy),
                category_spending: ChartSeries::category_spending(&summary),
                allocation: ChartSeries::allocation(&allocation),
            },
            summary,
            allocation,
            allocation_error,
        });
    }

    info!(projects = reports.len(), "report generated");

    match args.format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(&reports)?),
        OutputFormat::Text => Ok(render_text(&reports, args.currency)),
    }
}

fn build_allocator(config: &AllocationConfig) -> anyhow::Result<RemainderAllocator> {
    let strategy: Arc<dyn AllocationStrategy> = match HttpAllocationStrategy::from_config(config)
        .context("invalid allocation configuration")?
    {
        Some(http) => Arc::new(http),
        None => Arc::new(WeightedAllocationStrategy),
    };
    Ok(RemainderAllocator::new(strategy))
}

fn render_text(reports: &[ProjectReport], currency: Currency) -> String {
    let mut out = String::new();

    for report in reports {
        let s = &report.summary;
        let _ = writeln!(
            out,
            "{} [{}]  budget {}  consumed {}  remainder {}  ({}%, {})",
            s.name,
            report.plan.plan_type(),
            s.budget.format_major(currency),
            s.consumed.format_major(currency),
            s.remainder.format_major(currency),
            s.progress_percent,
            s.status
        );
        if s.unallocated.is_negative() {
            let _ = writeln!(
                out,
                "  categories over-allocate the budget by {}",
                s.unallocated.abs().format_major(currency)
            );
        }

        for c in &s.categories {
            let _ = writeln!(
                out,
                "  {:<20} {:>16}  spent {:>16}  {:>6}%  {}",
                c.name,
                c.budget.format_major(currency),
                c.consumed.format_major(currency),
                c.progress_percent,
                c.status
            );
        }

        let buckets: Vec<String> = report
            .allocation
            .iter()
            .map(|b| format!("{} {}", b.name, b.value.format_major(currency)))
            .collect();
        let _ = writeln!(out, "  allocation: {}", buckets.join(", "));
        if let Some(reason) = &report.allocation_error {
            let _ = writeln!(out, "  allocation unavailable: {reason}");
        }
        out.push('\n');
    }

    out.trim_end().to_string()
}
