mod cli;
mod logging;
mod progress;
mod scene;

use std::error::Error;

use clap::Parser;
use voxler_host::{AppearanceLibrary, MemoryHost, ProgressReporter, ScriptedProgress};
use voxler_world::VoxelWorld;

use crate::progress::LogProgress;
use crate::scene::SceneFile;

fn reporter(cancel_after: Option<usize>) -> Box<dyn ProgressReporter> {
    match cancel_after {
        Some(k) => Box::new(ScriptedProgress::cancel_after(k)),
        None => Box::new(LogProgress::default()),
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let args = cli::Args::parse();
    logging::init();

    let library = match &args.appearances {
        Some(path) => AppearanceLibrary::from_path(path)?,
        None => AppearanceLibrary::stock(),
    };
    log::info!("appearance library: {} entries", library.len());
    let mut host = MemoryHost::new(library);
    let component = host.add_component(&args.component);

    let mut world: Option<VoxelWorld> = None;
    for path in &args.scenes {
        let scene = SceneFile::from_path(path)?;
        let def = scene.world_def();
        log::info!("scene {}: {} voxels", path.display(), def.len());

        let mut w = match world.take() {
            Some(mut w) => {
                // Later scenes may move or rescale the world before reconciling.
                w.set_progress_settings(scene.world.progress.clone());
                w.set_grid_size(&mut host, scene.world.grid_size, None)?;
                w.set_offset(&mut host, scene.world.offset, None)?;
                w
            }
            None => VoxelWorld::new(component, scene.world.clone())?,
        };

        let mut progress = reporter(args.cancel_after);
        if !w.update(&mut host, &def, Some(progress.as_mut()))? {
            log::warn!("scene {} cancelled; world is partially applied", path.display());
        }
        world = Some(w);
    }

    let Some(mut world) = world else {
        return Ok(());
    };

    if let Some(size) = args.grid_size {
        let mut progress = reporter(args.cancel_after);
        world.set_grid_size(&mut host, size, Some(progress.as_mut()))?;
    }
    if let Some(offset) = args.offset {
        let mut progress = reporter(args.cancel_after);
        world.set_offset(&mut host, offset, Some(progress.as_mut()))?;
    }

    let stats = world.stats();
    let host_stats = host.stats();
    println!(
        "world: {} voxels ({} cubes, {} spheres), grid {} offset {}",
        stats.voxels,
        stats.cubes,
        stats.spheres,
        world.grid_size(),
        world.offset()
    );
    println!(
        "host: {} bodies, {} document appearances, {} kernel calls ({} creations, {} deletions)",
        host_stats.bodies,
        host_stats.document_appearances,
        host_stats.journal_entries,
        host.creations(),
        host.deletions()
    );

    if args.dump {
        print!("{}", SceneFile::from_world(&world).to_toml_string()?);
    }
    Ok(())
}
