//! Locating the resources directory.

use std::{
    env,
    path::{
        Path,
        PathBuf,
    },
};


/// Name of the directory assets and the config file are read from.
pub const RESOURCES_DIR_NAME: &str = "resources";

/// How many ancestors of the executable's directory are searched.
const MAX_EXE_ANCESTORS: usize = 3;

/// Places a resources directory named `name` is looked for, in order: the
/// working directory, the executable's directory, then ancestors of the
/// executable's directory.
pub fn candidate_dirs(cwd: Option<&Path>, exe_dir: Option<&Path>, name: &str) -> Vec<PathBuf> {
    let mut candidates = Vec::new();
    if let Some(cwd) = cwd {
        candidates.push(cwd.join(name));
    }
    if let Some(exe_dir) = exe_dir {
        for dir in exe_dir.ancestors().take(MAX_EXE_ANCESTORS + 1) {
            candidates.push(dir.join(name));
        }
    }
    candidates
}

/// Find the resources directory, or fall back to the working directory.
///
/// After the usual candidates, the one shipped in this crate's source tree is
/// tried, so that `cargo run` works from anywhere in the workspace.
pub fn find_resource_dir(name: &str) -> PathBuf {
    let cwd = env::current_dir().ok();
    let exe_dir = env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_owned));

    let mut candidates = candidate_dirs(cwd.as_deref(), exe_dir.as_deref(), name);
    candidates.push(Path::new(env!("CARGO_MANIFEST_DIR")).join(name));
    if let Some(dir) = candidates.iter().find(|dir| dir.is_dir()) {
        debug!(dir = %dir.display(), "found resources directory");
        return dir.clone();
    }

    let fallback = cwd.unwrap_or_else(|| PathBuf::from("."));
    warn!(
        searched = ?candidates,
        fallback = %fallback.display(),
        "could not find {} directory, falling back to working directory",
        name,
    );
    fallback
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cwd_comes_before_exe_ancestors() {
        let candidates = candidate_dirs(
            Some(Path::new("/work")),
            Some(Path::new("/opt/taal/target/debug")),
            "resources",
        );
        assert_eq!(candidates, vec![
            PathBuf::from("/work/resources"),
            PathBuf::from("/opt/taal/target/debug/resources"),
            PathBuf::from("/opt/taal/target/resources"),
            PathBuf::from("/opt/taal/resources"),
            PathBuf::from("/opt/resources"),
        ]);
    }

    #[test]
    fn ancestors_stop_at_root() {
        let candidates = candidate_dirs(None, Some(Path::new("/bin")), "res");
        assert_eq!(candidates, vec![
            PathBuf::from("/bin/res"),
            PathBuf::from("/res"),
        ]);
    }

    #[test]
    fn nothing_to_search_without_locations() {
        assert!(candidate_dirs(None, None, "resources").is_empty());
    }
}
