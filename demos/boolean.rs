//! Runs the three Boolean operations on a pair of overlapping boxes and
//! a drilled bar, printing face counts and volumes.
//!
//! ```text
//! cargo run --example boolean
//! RUST_LOG=brepbool=debug cargo run --example boolean
//! ```

use brepbool::math::{Point3, Vector3};
use brepbool::operations::boolean::{Intersect, Subtract, Union};
use brepbool::operations::creation::MakeBox;
use brepbool::operations::query::{IsValid, Volume};
use brepbool::operations::transform::Translate;
use brepbool::topology::{SolidId, TopologyStore};
use brepbool::Result;

fn report(store: &TopologyStore, name: &str, solid: Option<SolidId>) -> Result<()> {
    match solid {
        Some(id) => println!(
            "{name:>12}: {} faces, volume {:.4}, valid {}",
            store.solid(id)?.faces.len(),
            Volume::new(id).execute(store)?,
            IsValid::new(id).execute(store)?,
        ),
        None => println!("{name:>12}: empty"),
    }
    Ok(())
}

fn main() -> Result<()> {
    // Default: WARN for everything, INFO for brepbool.
    // Override with RUST_LOG env var.
    let env_filter = tracing_subscriber::EnvFilter::from_default_env()
        .add_directive(tracing_subscriber::filter::LevelFilter::WARN.into())
        .add_directive("brepbool=info".parse().unwrap_or_default());
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let mut store = TopologyStore::new();
    let a = MakeBox::new(Point3::new(0.0, 0.0, 0.0), Point3::new(1.0, 1.0, 1.0)).execute(&mut store)?;
    let b = Translate::new(a, Vector3::new(0.5, 0.0, 0.0)).execute(&mut store)?;

    let intersection = Intersect::new(a, b).execute(&mut store)?;
    report(&store, "a & b", intersection)?;
    let difference = Subtract::new(a, b).execute(&mut store)?;
    report(&store, "a - b", difference)?;
    let union = Union::new(a, b).execute(&mut store)?;
    report(&store, "a | b", union)?;

    let bar = MakeBox::new(Point3::new(0.0, 0.0, 0.0), Point3::new(3.0, 3.0, 1.0)).execute(&mut store)?;
    let drill = MakeBox::new(Point3::new(1.0, 1.0, -1.0), Point3::new(2.0, 2.0, 2.0)).execute(&mut store)?;
    let drilled = Subtract::new(bar, drill).execute(&mut store)?;
    report(&store, "drilled bar", drilled)?;
    Ok(())
}
