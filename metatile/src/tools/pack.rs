use anyhow::Result;
use metatile::TileLayout;

#[derive(clap::Args, Debug)]
#[command(arg_required_else_help = true, disable_version_flag = true)]
pub struct Subcommand {
	/// address of a standalone tile, e.g. "12/2048/1024.png"
	#[arg()]
	tile: String,

	/// root directory of the tile tree
	#[arg(long, short, value_name = "DIR", default_value = ".")]
	root: String,
}

pub fn run(arguments: &Subcommand) -> Result<()> {
	let layout = TileLayout::new(&arguments.root);
	let coord = layout.parse_address(&arguments.tile)?;

	// only the origin tile of a block triggers the pack; callers walking a
	// tile tree invoke this once per tile
	let (_, slot) = layout.meta_path(&coord);
	if slot != 0 {
		log::debug!("{} is not the origin of its block, nothing to do", arguments.tile);
		return Ok(());
	}

	metatile::pack(&layout, &coord)?;
	eprintln!("packed block at {}", arguments.tile);

	Ok(())
}
