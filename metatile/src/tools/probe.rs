use anyhow::{Context, Result, ensure};
use metatile::{HEADER_SIZE, MetaLayout, TileLayout};
use metatile_core::Blob;
use std::fs;

#[derive(clap::Args, Debug)]
#[command(arg_required_else_help = true, disable_version_flag = true)]
pub struct Subcommand {
	/// address of a container or of any tile inside it
	#[arg()]
	name: String,

	/// root directory of the tile tree
	#[arg(long, short, value_name = "DIR", default_value = ".")]
	root: String,

	/// also list every index entry
	#[arg(long)]
	entries: bool,
}

pub fn run(arguments: &Subcommand) -> Result<()> {
	let layout = TileLayout::new(&arguments.root);
	let coord = layout.parse_address(&arguments.name)?;
	let (path, _) = layout.meta_path(&coord);

	let bytes = fs::read(&path).with_context(|| format!("reading container {}", path.display()))?;
	ensure!(
		bytes.len() >= HEADER_SIZE,
		"{} is too small to be a container ({} bytes)",
		path.display(),
		bytes.len()
	);
	let meta = MetaLayout::from_blob(&Blob::from(bytes.as_slice()), &path)?;

	let used = meta.iter().filter(|range| !range.is_empty()).count();
	let payload: u64 = meta.iter().map(|range| range.length).sum();

	println!("container: {}", path.display());
	println!("block: z={} x={} y={}", meta.block.z, meta.block.x, meta.block.y);
	println!("entries: {} ({used} used)", meta.len());
	println!("payload: {payload} bytes of {} on disk", bytes.len());

	if arguments.entries {
		for (slot, range) in meta.iter().enumerate() {
			println!("  slot {slot:2}: offset {:7}, size {:6}", range.offset, range.length);
		}
	}

	Ok(())
}
