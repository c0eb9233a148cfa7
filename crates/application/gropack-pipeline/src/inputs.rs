use crate::PackError;
use camino::{Utf8Path, Utf8PathBuf};
use gropack_core::{NormalizedPath, ResourcePath};
use walkdir::WalkDir;

/// Turn user-supplied inputs into root-relative resource paths.
///
/// Directories expand to the files below them in name order. Inputs that
/// do not exist are passed through so the scan reports them.
pub fn expand(root: &Utf8Path, inputs: &[Utf8PathBuf]) -> Result<Vec<NormalizedPath>, PackError> {
    let mut out = Vec::new();

    for input in inputs {
        let relative = relative_to_root(root, input)?;
        let on_disk = root.join(&relative);

        if !on_disk.is_dir() {
            out.push(to_resource(&relative));
            continue;
        }

        for entry in WalkDir::new(&on_disk).sort_by_file_name() {
            let entry = entry.map_err(|source| PackError::Walk {
                path: on_disk.clone(),
                source,
            })?;
            if !entry.file_type().is_file() {
                continue;
            }

            let path = Utf8PathBuf::from_path_buf(entry.into_path())
                .map_err(PackError::NonUtf8Path)?;
            let relative = path.strip_prefix(root).map_err(|_| PackError::OutsideRoot {
                path: path.clone(),
                root: root.to_path_buf(),
            })?;
            out.push(to_resource(relative));
        }
    }

    Ok(out)
}

fn relative_to_root(root: &Utf8Path, input: &Utf8Path) -> Result<Utf8PathBuf, PackError> {
    if !input.is_absolute() {
        return Ok(input.to_path_buf());
    }
    input
        .strip_prefix(root)
        .map(Utf8Path::to_path_buf)
        .map_err(|_| PackError::OutsideRoot {
            path: input.to_path_buf(),
            root: root.to_path_buf(),
        })
}

/// Paths from the local filesystem say nothing about the engine that wrote
/// the resources, so the observed flags are dropped.
fn to_resource(path: &Utf8Path) -> NormalizedPath {
    ResourcePath::normalize(path.as_str()).0
}
