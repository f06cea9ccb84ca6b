//! Vendor layout normalisation.
//!
//! Release archives usually unpack into a single versioned folder
//! (`imgui-1.92.1/`, `SDL3-3.2.18/`). The compiler invocation expects headers
//! and libraries directly under the vendor directory, so that folder is
//! flattened into its parent after extraction.

use crate::dependency::NestedRoot;
use crate::error::Result;
use camino::{Utf8Path, Utf8PathBuf};
use log::debug;

/// Locate the nested root folder inside `target_dir`, if present.
///
/// [`NestedRoot::Prefix`] matches with a glob and picks the first directory in
/// alphabetical order.
#[must_use]
pub fn find_nested_root(target_dir: &Utf8Path, root: &NestedRoot) -> Option<Utf8PathBuf> {
    match root {
        NestedRoot::Exact(name) => {
            let candidate = target_dir.join(name);
            candidate.is_dir().then_some(candidate)
        }
        NestedRoot::Prefix(prefix) => {
            let pattern = format!(
                "{}/{}*",
                glob::Pattern::escape(target_dir.as_str()),
                glob::Pattern::escape(prefix)
            );
            glob::glob(&pattern)
                .ok()?
                .filter_map(std::result::Result::ok)
                .filter(|path| path.is_dir())
                .find_map(|path| Utf8PathBuf::from_path_buf(path).ok())
        }
    }
}

/// Move every child of the nested root folder up into `target_dir` and remove
/// the emptied folder.
///
/// Returns the folder that was flattened, or `None` when no matching folder
/// exists. A missing folder is not an error: archives with a differently
/// named root are left as they are.
///
/// # Errors
///
/// Returns an error if a child cannot be moved or the folder cannot be
/// removed.
pub fn flatten_nested_root(target_dir: &Utf8Path, root: &NestedRoot) -> Result<Option<Utf8PathBuf>> {
    let Some(nested) = find_nested_root(target_dir, root) else {
        debug!("no nested root matching {root:?} in {target_dir}");
        return Ok(None);
    };

    for entry in nested.read_dir_utf8()? {
        let entry = entry?;
        let destination = target_dir.join(entry.file_name());
        debug!("moving {} -> {destination}", entry.path());
        std::fs::rename(entry.path(), &destination)?;
    }
    std::fs::remove_dir_all(&nested)?;

    Ok(Some(nested))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn utf8_temp_dir() -> (tempfile::TempDir, Utf8PathBuf) {
        let temp = tempfile::tempdir().expect("temp dir");
        let path = Utf8PathBuf::try_from(temp.path().to_path_buf()).expect("UTF-8 path");
        (temp, path)
    }

    fn touch(path: &Utf8Path) {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("create parent");
        }
        std::fs::write(path, b"x").expect("write file");
    }

    #[test]
    fn flattens_exact_root() {
        let (_temp, root) = utf8_temp_dir();
        touch(&root.join("imgui-1.92.1/imgui.cpp"));
        touch(&root.join("imgui-1.92.1/backends/imgui_impl_sdl3.cpp"));

        let flattened = flatten_nested_root(&root, &NestedRoot::Exact("imgui-1.92.1".to_owned()))
            .expect("flatten");

        assert_eq!(flattened, Some(root.join("imgui-1.92.1")));
        assert!(root.join("imgui.cpp").is_file());
        assert!(root.join("backends/imgui_impl_sdl3.cpp").is_file());
        assert!(!root.join("imgui-1.92.1").exists());
    }

    #[test]
    fn flattens_first_prefix_match() {
        let (_temp, root) = utf8_temp_dir();
        touch(&root.join("SDL3-3.2.18/lib/arm64/SDL3.dll"));
        touch(&root.join("SDL3-3.2.18/include/SDL3/SDL.h"));

        let flattened =
            flatten_nested_root(&root, &NestedRoot::Prefix("SDL3".to_owned())).expect("flatten");

        assert_eq!(flattened, Some(root.join("SDL3-3.2.18")));
        assert!(root.join("lib/arm64/SDL3.dll").is_file());
        assert!(root.join("include/SDL3/SDL.h").is_file());
        assert!(!root.join("SDL3-3.2.18").exists());
    }

    #[test]
    fn prefix_ignores_files() {
        let (_temp, root) = utf8_temp_dir();
        touch(&root.join("SDL3-devel-3.2.18-VC.zip"));

        assert!(find_nested_root(&root, &NestedRoot::Prefix("SDL3".to_owned())).is_none());
    }

    #[rstest]
    #[case::exact(NestedRoot::Exact("imgui-1.92.1".to_owned()))]
    #[case::prefix(NestedRoot::Prefix("SDL3".to_owned()))]
    fn missing_root_is_a_no_op(#[case] nested: NestedRoot) {
        let (_temp, root) = utf8_temp_dir();
        touch(&root.join("imgui-docking/imgui.cpp"));

        let flattened = flatten_nested_root(&root, &nested).expect("flatten");

        assert_eq!(flattened, None);
        assert!(root.join("imgui-docking/imgui.cpp").is_file());
    }
}
