//! `pennyplan plan`: schedule generation and progress reconciliation.

use std::fmt::Write as _;

use anyhow::{Context, bail};
use pennyplan_core::chart::{ChartPoint, ChartSeries};
use pennyplan_core::plan::{PlanConfig, PlanGenerator, PlanScheduleEntry};
use pennyplan_core::progress::{LoggedActuals, ProgressReconciler};
use pennyplan_shared::AppConfig;
use pennyplan_shared::types::{Currency, Money};
use serde::Serialize;
use serde_json::{Map, Value};

use crate::cli::{OutputFormat, PlanArgs};

#[derive(Serialize)]
struct PlanOutput {
    goal: Money,
    months: u32,
    plan: PlanConfig,
    rebalanced: bool,
    schedule: Vec<PlanScheduleEntry>,
    chart: ScheduleCharts,
}

#[derive(Serialize)]
struct ScheduleCharts {
    targets: Vec<ChartPoint>,
    actuals: Vec<ChartPoint>,
}

pub fn run(args: &PlanArgs, config: &AppConfig) -> anyhow::Result<String> {
    let goal = resolve_goal(args)?;

    let mut extra = Map::new();
    if let Some(rate) = args.annual_rate {
        extra.insert("annual_rate".into(), Value::String(rate.to_string()));
    }
    if let Some(share) = args.savings_share {
        extra.insert("savings_share_percent".into(), Value::from(share));
    }
    let extra = Value::Object(extra);

    let (plan, ideal) = PlanGenerator::generate_from_parts(
        goal,
        args.months,
        &args.plan_type,
        Some(&extra),
        &config.plan,
    )
    .context("failed to generate schedule")?;

    let actuals: LoggedActuals = args.actuals.iter().copied().collect();
    let schedule = if args.rebalance {
        ProgressReconciler::rebalance(&ideal, &actuals)
    } else {
        ProgressReconciler::reconcile(&ideal, &actuals)
    }
    .context("failed to reconcile logged amounts")?;

    let output = PlanOutput {
        goal,
        months: args.months,
        plan,
        rebalanced: args.rebalance,
        chart: ScheduleCharts {
            targets: ChartSeries::schedule_targets(&schedule),
            actuals: ChartSeries::schedule_actuals(&schedule),
        },
        schedule,
    };

    match args.format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(&output)?),
        OutputFormat::Text => Ok(render_text(&output, args.currency)),
    }
}

fn resolve_goal(args: &PlanArgs) -> anyhow::Result<Money> {
    match (args.goal, args.goal_major) {
        (Some(minor), _) => Ok(Money::from_minor(minor)),
        (None, Some(major)) => Money::from_major(major, args.currency)
            .with_context(|| format!("goal {major} {} is out of range", args.currency)),
        (None, None) => bail!("either --goal or --goal-major is required"),
    }
}

fn render_text(output: &PlanOutput, currency: Currency) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{} plan: {} over {} months{}",
        output.plan.plan_type(),
        output.goal.format_major(currency),
        output.months,
        if output.rebalanced { " (rebalanced)" } else { "" }
    );

    for entry in &output.schedule {
        let _ = write!(
            out,
            "Month {:>3}  target {:>16}",
            entry.month,
            entry.ideal_target.format_major(currency)
        );
        if let (Some(ideal), Some(actual), Some(pace)) = (
            entry.cumulative_ideal,
            entry.cumulative_actual,
            entry.pace_status,
        ) {
            let _ = write!(
                out,
                "  saved {:>16} of {:>16}  {pace}",
                actual.format_major(currency),
                ideal.format_major(currency),
            );
        }
        out.push('\n');
    }

    out.trim_end().to_string()
}
