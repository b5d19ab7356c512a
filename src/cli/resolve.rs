//! `resolve` command: print the include list for a set of resources.

use super::ResolveArgs;
use anyhow::Result;
use serde::Serialize;
use vitrine::config::{AssetsConfig, Declared};
use vitrine::{NeededResources, debug};

#[derive(Debug, Serialize)]
struct Entry {
    library: String,
    path: String,
    url: String,
}

/// Resolve `args.resources` and print their URLs in include order.
pub fn resolve(args: &ResolveArgs, config: &AssetsConfig, declared: &Declared) -> Result<()> {
    let mut needed = NeededResources::new()
        .with_minified(args.minified)
        .with_compile(args.compile);
    for reference in &args.resources {
        needed.need(&declared.resource(reference)?);
    }

    let rendered = needed.render()?;
    debug!("resolve"; "{} stage runs", rendered.invocations.len());

    let entries: Vec<_> = rendered
        .resources
        .iter()
        .map(|resource| Entry {
            library: resource.library().name().to_owned(),
            path: resource.relpath().to_owned(),
            url: resource.url(&config.serve.prefix, args.versioned),
        })
        .collect();

    if args.json {
        println!("{}", serde_json::to_string_pretty(&entries)?);
    } else {
        for entry in &entries {
            println!("{}", entry.url);
        }
    }
    Ok(())
}
