use anyhow::Result;
use metatile::TileLayout;

#[derive(clap::Args, Debug)]
#[command(arg_required_else_help = true, disable_version_flag = true)]
pub struct Subcommand {
	/// address of a container or of any tile inside it,
	/// e.g. "12/2048/1024.meta" or "12/2051/1027.png"
	#[arg()]
	name: String,

	/// root directory of the tile tree
	#[arg(long, short, value_name = "DIR", default_value = ".")]
	root: String,
}

pub fn run(arguments: &Subcommand) -> Result<()> {
	let layout = TileLayout::new(&arguments.root);
	let coord = layout.parse_address(&arguments.name)?;

	metatile::unpack(&layout, &coord)?;
	eprintln!("unpacked block at {}", arguments.name);

	Ok(())
}
