use std::env;
use std::fs;
use std::path::PathBuf;

use anyhow::Result;
use log::info;

use facetmap::{render_map, MapConfig, Projector, SvgDocument};

fn main() -> Result<()> {
    env_logger::init();

    let mut args = env::args().skip(1);
    let data_dir = PathBuf::from(args.next().unwrap_or_else(|| "data".into()));
    let out_path = PathBuf::from(args.next().unwrap_or_else(|| "map.svg".into()));

    let proj = Projector::standard();
    let mut doc = SvgDocument::new(MapConfig::default());
    render_map(&proj, &mut doc, &data_dir)?;

    fs::write(&out_path, doc.to_svg())?;
    info!("wrote {}", out_path.display());
    Ok(())
}
