//! CLI command for full GUID resolution over an asset graph

use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use rayon::prelude::*;

use crate::assets::AssetGraph;
use crate::catalog::{CatalogCrossReference, load_catalog_dir};
use crate::cli::progress::{DISK, GEAR, LINK, LOOKING_GLASS, print_done, print_step, simple_bar};
use crate::config::RelinkConfig;
use crate::dependency::{CollectingReporter, DependencyResolver};
use crate::resolve::{GuidOrigin, GuidResolver, ResolutionContext, write_report};

pub fn execute(
    graph: &Path,
    catalogs: Option<&Path>,
    config: Option<&Path>,
    report: Option<&Path>,
    quiet: bool,
) -> anyhow::Result<()> {
    let start = Instant::now();
    let total_steps = if report.is_some() { 5 } else { 4 };

    print_step(1, total_steps, LOOKING_GLASS, "Loading asset graph...");
    let config = RelinkConfig::load_or_default(config)?;
    let graph = AssetGraph::load(graph)?;

    let xref = match catalogs {
        Some(dir) => {
            print_step(2, total_steps, LOOKING_GLASS, &format!("Loading catalogs from {}...", dir.display()));
            let result = load_catalog_dir(dir, &config.catalog);
            println!(
                "  {} catalogs loaded, {} skipped, {} GUIDs",
                result.loaded,
                result.skipped,
                result.cross_reference.len()
            );
            result.cross_reference
        }
        None => {
            print_step(2, total_steps, LOOKING_GLASS, "No catalog directory given, skipping catalogs");
            CatalogCrossReference::new()
        }
    };

    print_step(3, total_steps, GEAR, "Indexing assets and leveldata...");
    let context = ResolutionContext::process(&graph, xref, config);
    println!(
        "  {} assets in {} groups, {} leveldata associations",
        context.index().len(),
        context.index().group_count(),
        context.leveldata().len()
    );

    let dependencies = DependencyResolver::new(&graph.packages, CollectingReporter::new());
    dependencies.resolve_all(&graph.external_references);
    let missing = dependencies.reporter().missing();
    if !missing.is_empty() {
        println!("  {} unresolved package references:", missing.len());
        for reference in &missing {
            println!("    {reference}");
        }
    }

    print_step(4, total_steps, LINK, "Resolving GUIDs...");
    let identities = context.index().identities();
    let resolver = GuidResolver::new(Arc::new(context));
    let pb = simple_bar(identities.len() as u64, "Resolving", quiet);
    identities.par_iter().for_each(|identity| {
        resolver.resolve(identity);
        pb.inc(1);
    });
    pb.finish_and_clear();

    let mapping = resolver.report();
    for origin in GuidOrigin::ALL {
        println!("  {:<22} {:>8}", origin.as_str(), mapping.count(origin));
    }

    if let Some(path) = report {
        print_step(5, total_steps, DISK, &format!("Writing report to {}...", path.display()));
        write_report(path, &mapping)?;
    }

    print_done(start.elapsed());
    Ok(())
}
