#![forbid(unsafe_code)]

//! `catalog` and `verdict` commands.

use std::io::Write;

use clap::Args;
use serde::Serialize;

use scalelab::{BalanceEngine, Fact, Factor, Status, Verdict, facts, find_factor, synthesize};
use scalelab::{forces_factors, relations_factors};

use crate::error::{CliError, Result};
use crate::render::{factor_row, verdict_block};

#[derive(Debug, Clone, Default, Args)]
pub struct CatalogArgs {
    /// Emit JSON instead of a table.
    #[arg(long)]
    pub json: bool,
}

#[derive(Serialize)]
struct CatalogDoc {
    forces: &'static [Factor],
    relations: &'static [Factor],
    facts: &'static [Fact],
}

pub fn run_catalog(args: &CatalogArgs, out: &mut dyn Write) -> Result<()> {
    if args.json {
        let doc = CatalogDoc {
            forces: forces_factors(),
            relations: relations_factors(),
            facts: facts(),
        };
        writeln!(out, "{}", serde_json::to_string_pretty(&doc)?)?;
        return Ok(());
    }

    writeln!(out, "LLSX, production forces (left pan)")?;
    for factor in forces_factors() {
        writeln!(out, "{}", factor_row(factor))?;
    }
    writeln!(out)?;
    writeln!(out, "QHSX, production relations (right pan)")?;
    for factor in relations_factors() {
        writeln!(out, "{}", factor_row(factor))?;
    }
    writeln!(out)?;
    writeln!(out, "Facts")?;
    for fact in facts() {
        writeln!(out, "  {}. {} [{}]", fact.id, fact.content, fact.source)?;
    }
    Ok(())
}

#[derive(Debug, Clone, Default, Args)]
pub struct VerdictArgs {
    /// Catalog ids to weigh; each goes onto its own category's pan.
    pub factors: Vec<String>,
    #[arg(long)]
    pub json: bool,
}

#[derive(Serialize)]
struct VerdictDoc {
    left_weight: i32,
    right_weight: i32,
    difference: i32,
    status: Status,
    verdict: &'static Verdict,
}

pub fn run_verdict(args: &VerdictArgs, out: &mut dyn Write) -> Result<()> {
    let mut engine = BalanceEngine::new();
    for id in &args.factors {
        let factor =
            find_factor(id).ok_or_else(|| CliError::Usage(format!("unknown factor id {id:?}")))?;
        engine.place(factor, factor.category.side());
    }
    let verdict = synthesize(engine.left().len(), engine.right().len(), engine.difference());

    if args.json {
        let doc = VerdictDoc {
            left_weight: engine.left_weight(),
            right_weight: engine.right_weight(),
            difference: engine.difference(),
            status: engine.status(),
            verdict,
        };
        writeln!(out, "{}", serde_json::to_string_pretty(&doc)?)?;
    } else {
        writeln!(
            out,
            "difference {:+} ({})",
            engine.difference(),
            engine.status().label()
        )?;
        writeln!(out, "{}", verdict_block(verdict))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(run: impl FnOnce(&mut Vec<u8>) -> Result<()>) -> String {
        let mut buf = Vec::new();
        run(&mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn catalog_lists_both_sides_and_facts() {
        let out = text(|b| run_catalog(&CatalogArgs::default(), b));
        assert!(out.contains("l-2"));
        assert!(out.contains("q-8"));
        assert!(out.contains("Facts"));
    }

    #[test]
    fn catalog_json_has_sixteen_factors() {
        let out = text(|b| run_catalog(&CatalogArgs { json: true }, b));
        let doc: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(doc["forces"].as_array().unwrap().len(), 8);
        assert_eq!(doc["relations"].as_array().unwrap().len(), 8);
        assert_eq!(doc["facts"].as_array().unwrap().len(), 3);
    }

    #[test]
    fn verdict_places_by_category() {
        let args = VerdictArgs {
            factors: vec!["q-4".into(), "l-6".into()],
            json: true,
        };
        let doc: serde_json::Value = serde_json::from_str(&text(|b| run_verdict(&args, b))).unwrap();
        assert_eq!(doc["difference"], -5);
        assert_eq!(doc["verdict"]["kind"], "ideal_equilibrium");
    }

    #[test]
    fn verdict_without_factors_is_stagnation() {
        let out = text(|b| run_verdict(&VerdictArgs::default(), b));
        assert!(out.contains("SỰ TRÌ TRỆ TUYỆT ĐỐI"));
    }

    #[test]
    fn unknown_id_is_usage_error() {
        let args = VerdictArgs {
            factors: vec!["z-9".into()],
            json: false,
        };
        let err = run_verdict(&args, &mut Vec::new()).unwrap_err();
        assert_eq!(err.exit_code(), crate::error::EXIT_USAGE);
    }
}
