//! Entry point for objmesh.
//! Loads OBJ meshes and reports what was built.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use asset::{DEFAULT_COLOR, Mesh, ObjError, ObjLoadOptions, obj};

#[derive(Debug)]
struct Args {
    options: ObjLoadOptions,
    dump: bool,
    paths: Vec<PathBuf>,
}

fn parse_color(val: &str) -> Option<[f32; 4]> {
    let parts: Vec<f32> = val
        .split(',')
        .map(|p| p.trim().parse::<f32>())
        .collect::<Result<Vec<_>, _>>()
        .ok()?;
    match parts.as_slice() {
        [r, g, b] => Some([*r, *g, *b, 1.0]),
        [r, g, b, a] => Some([*r, *g, *b, *a]),
        _ => None,
    }
}

fn parse_args(args: impl Iterator<Item = String>) -> Args {
    let mut options = ObjLoadOptions::default();
    let mut dump = false;
    let mut paths = Vec::new();

    for arg in args {
        if arg == "--dedup" {
            options.deduplicate = true;
        } else if arg == "--dump" {
            dump = true;
        } else if let Some(val) = arg.strip_prefix("--color=") {
            options.default_color = parse_color(val).unwrap_or_else(|| {
                log::warn!("Invalid color '{}', falling back to white.", val);
                DEFAULT_COLOR
            });
        } else if arg.starts_with("--") {
            log::warn!("Unknown flag '{}', ignoring.", arg);
        } else {
            paths.push(PathBuf::from(arg));
        }
    }

    Args {
        options,
        dump,
        paths,
    }
}

fn report(path: &Path, mesh: &Mesh, dump: bool) {
    log::info!(
        "{}: {} vertices, {} indices, {} triangles, {} bytes of vertex data",
        path.display(),
        mesh.vertex_count(),
        mesh.index_count(),
        mesh.triangle_count(),
        mesh.vertex_bytes().len()
    );
    if let Some(bounds) = mesh.bounds() {
        log::info!(
            "{}: bounds min={:?} max={:?} size={:?} center={:?}",
            path.display(),
            bounds.min,
            bounds.max,
            bounds.size(),
            bounds.center()
        );
    }

    if dump {
        for (i, v) in mesh.vertices().iter().enumerate() {
            println!(
                "{:>6}  pos={:?} normal={:?} uv={:?} color={:?}",
                i, v.position, v.normal, v.uv, v.color
            );
        }
    }
}

fn load(path: &Path, options: &ObjLoadOptions) -> Result<Mesh> {
    obj::load_obj_from_path(path, options)
        .with_context(|| format!("Failed to load mesh {}", path.display()))
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = parse_args(std::env::args().skip(1));
    if args.paths.is_empty() {
        bail!("usage: objmesh [--dedup] [--dump] [--color=r,g,b[,a]] <file.obj>...");
    }
    log::info!(
        "Starting objmesh. dedup={}, color={:?}, files={}",
        args.options.deduplicate,
        args.options.default_color,
        args.paths.len()
    );

    let mut failed = 0usize;
    for path in &args.paths {
        match load(path, &args.options) {
            Ok(mesh) => report(path, &mesh, args.dump),
            Err(err) => {
                // A failed mesh is skipped; the remaining files still load.
                let kind = err.downcast_ref::<ObjError>().map(ObjError::kind);
                log::error!("{:#} (kind: {:?})", err, kind);
                failed += 1;
            }
        }
    }

    if failed > 0 {
        bail!("{} of {} meshes failed to load", failed, args.paths.len());
    }
    log::info!("All meshes loaded. Bye!");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Args {
        parse_args(list.iter().map(|s| s.to_string()))
    }

    #[test]
    fn flags_and_paths_are_separated() {
        let a = args(&["--dedup", "models/tank.obj", "--dump", "models/arena.obj"]);
        assert!(a.options.deduplicate);
        assert!(a.dump);
        assert_eq!(
            a.paths,
            vec![PathBuf::from("models/tank.obj"), PathBuf::from("models/arena.obj")]
        );
    }

    #[test]
    fn color_flag_accepts_rgb_and_rgba() {
        assert_eq!(parse_color("1,0,0"), Some([1.0, 0.0, 0.0, 1.0]));
        assert_eq!(parse_color("0.5, 0.5, 0.5, 0.25"), Some([0.5, 0.5, 0.5, 0.25]));
        assert_eq!(parse_color("red"), None);
        assert_eq!(parse_color("1,2"), None);

        let a = args(&["--color=bogus", "x.obj"]);
        assert_eq!(a.options.default_color, DEFAULT_COLOR);
    }

    #[test]
    fn load_failure_keeps_path_and_kind() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tank.obj");
        let err = load(&path, &ObjLoadOptions::default()).unwrap_err();

        assert!(err.to_string().contains("tank.obj"));
        let obj_err = err.downcast_ref::<ObjError>().expect("ObjError in chain");
        assert_eq!(obj_err.kind(), asset::ObjErrorKind::FileAccess);
    }

    #[test]
    fn load_reads_a_mesh_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bullet.obj");
        std::fs::write(&path, "v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 3\n").unwrap();

        let mesh = load(&path, &ObjLoadOptions::default()).unwrap();
        assert_eq!(mesh.indices(), &[0, 1, 2]);
        assert_eq!(mesh.bounds().unwrap().center(), [0.5, 0.5, 0.0]);
    }
}
