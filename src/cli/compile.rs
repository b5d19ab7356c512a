//! `compile` command: build every declared resource.

use anyhow::Result;
use vitrine::config::Declared;
use vitrine::logger::ProgressLine;
use vitrine::{Invocation, Role, debug, log};

/// Run stale (or, with `force`, all) stages of every declared resource.
/// Stops at the first failing stage.
pub fn compile_all(declared: &Declared, force: bool) -> Result<()> {
    let total = declared.len();
    if total == 0 {
        log!("compile"; "no resources declared");
        return Ok(());
    }

    let progress = ProgressLine::new("compile", &[("resources", total)]);
    let invocations = declared.compile(force, |_| progress.inc("resources"))?;
    progress.finish();

    for run in &invocations {
        debug!("compile"; "{} `{}` {}:{}", run.role, run.stage, run.library, run.relpath);
    }

    let compiled = count(&invocations, Role::Compiler);
    let minified = count(&invocations, Role::Minifier);
    log!("compile"; "{} resources: {} compiled, {} minified", total, compiled, minified);
    Ok(())
}

fn count(invocations: &[Invocation], role: Role) -> usize {
    invocations.iter().filter(|run| run.role == role).count()
}
