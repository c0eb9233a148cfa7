use crate::PackArgs;
use anyhow::{Context, Result};
use gropack_core::NormalizedPath;
use gropack_infra::{AssemblyProgress, AssemblyReport};
use gropack_pipeline::{PackEngine, PackPlan, PlanSummary};
use humansize::{format_size, DECIMAL};
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use std::time::Duration;

#[derive(Serialize)]
struct ArchiveView<'a> {
    output: String,
    written: &'a [String],
    missing: &'a [NormalizedPath],
    bytes_in: u64,
    archive_size: u64,
}

#[derive(Serialize)]
struct PackOutput<'a> {
    plan: PlanSummary<'a>,
    archive: ArchiveView<'a>,
}

#[derive(Serialize)]
struct DepsOutput<'a> {
    plan: PlanSummary<'a>,
    not_on_disk: &'a [NormalizedPath],
}

pub fn cmd_pack(args: &PackArgs) -> Result<AssemblyReport> {
    let engine = PackEngine::new(args.to_request()?);
    let plan = run_plan(&engine, args.json)?;

    let output = engine.request().output_path();
    if !args.json {
        print_plan(&plan);
        println!("\n:: Packing into {}", output);
    }

    let pb = if args.json {
        ProgressBar::hidden()
    } else {
        ProgressBar::new(plan.files.len() as u64)
    };
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{bar:40.cyan/blue} {pos}/{len} {wide_msg}")?
            .progress_chars("=> "),
    );
    let on_progress = |p: AssemblyProgress<'_>| {
        pb.set_position(p.index as u64 + 1);
        pb.set_message(p.entry.to_string());
    };

    let report = engine
        .execute(&plan, Some(&on_progress))
        .with_context(|| format!("Failed to pack {}", output))?;
    pb.finish_and_clear();

    if args.json {
        let view = PackOutput {
            plan: plan.summary(),
            archive: ArchiveView {
                output: output.to_string(),
                written: &report.written,
                missing: &report.missing,
                bytes_in: report.bytes_in,
                archive_size: report.archive_size,
            },
        };
        println!("{}", serde_json::to_string_pretty(&view)?);
        return Ok(report);
    }

    print_list("Couldn't pack these files:", &report.missing);
    println!(
        "\n:: {} is ready ({} files, {} -> {})",
        output,
        report.written.len(),
        format_size(report.bytes_in, DECIMAL),
        format_size(report.archive_size, DECIMAL)
    );
    Ok(report)
}

/// Scan only and check which dependencies exist on disk.
pub fn cmd_deps(args: &PackArgs) -> Result<Vec<NormalizedPath>> {
    let engine = PackEngine::new(args.to_request()?);
    let plan = run_plan(&engine, args.json)?;
    let missing = engine.verify(&plan);

    if args.json {
        let view = DepsOutput {
            plan: plan.summary(),
            not_on_disk: &missing,
        };
        println!("{}", serde_json::to_string_pretty(&view)?);
        return Ok(missing);
    }

    print_plan(&plan);
    println!("\n:: Checking for physical existence of files...");
    if !print_list("Files that aren't on disk:", &missing) {
        println!("   All files exist!");
    }
    Ok(missing)
}

fn run_plan(engine: &PackEngine, quiet: bool) -> Result<PackPlan> {
    let req = engine.request();
    if !quiet {
        println!(":: Scanning {} input(s)", req.inputs.len());
        println!("   Root:   {}", req.root);
    }

    let pb = if quiet {
        ProgressBar::hidden()
    } else {
        ProgressBar::new_spinner()
    };
    pb.set_style(ProgressStyle::default_spinner().template("{spinner:.green} {msg}")?);
    pb.enable_steady_tick(Duration::from_millis(100));
    pb.set_message("Resolving dependencies...");

    let plan = engine.plan();
    pb.finish_and_clear();
    Ok(plan?)
}

fn print_plan(plan: &PackPlan) {
    if let Some(game) = plan.game {
        println!("   Game:   {}", game);
    }
    println!("   Standard dependencies: {}", plan.standard.keys);
    for name in &plan.standard.missing {
        println!("   (not found: {})", name);
    }
    if plan.is_alternate() {
        println!("   Alternate engine: {}", plan.flags);
    }

    for report in &plan.reports {
        println!("\n:: Extra dependencies for '{}'", report.source);
        if report.is_empty() {
            println!("   No dependencies");
        }
        for file in &report.added {
            println!("   {}. {}", file.ordinal, file.path);
        }
    }

    if !plan.failures.is_empty() {
        println!("\n:: Could not scan:");
        for failure in &plan.failures {
            println!("   - {}: {}", failure.path, failure.error);
        }
    }

    println!("\n:: {} files scheduled", plan.files.len());
}

/// Print a titled list; returns false when there was nothing to print.
fn print_list(title: &str, items: &[NormalizedPath]) -> bool {
    if items.is_empty() {
        return false;
    }
    println!("\n:: {}", title);
    for item in items {
        println!("   - {}", item);
    }
    true
}
